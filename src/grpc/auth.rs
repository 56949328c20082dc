use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{error, info, warn};

use super::auth_service_server::AuthService;
use super::messages::{LoginRequest, LoginResponse};
use crate::auth::TokenManager;
use crate::store::UserStore;

/// `AuthService` handler: trades a username and password for an access token.
pub struct AuthHandler<U> {
    users: Arc<U>,
    tokens: Arc<TokenManager>,
}

impl<U> AuthHandler<U> {
    pub fn new(users: Arc<U>, tokens: Arc<TokenManager>) -> Self {
        Self { users, tokens }
    }
}

#[tonic::async_trait]
impl<U: UserStore + 'static> AuthService for AuthHandler<U> {
    async fn login(&self, request: Request<LoginRequest>) -> Result<Response<LoginResponse>, Status> {
        let LoginRequest { username, password } = request.into_inner();

        let users = Arc::clone(&self.users);
        let name = username.clone();
        let user = tokio::task::spawn_blocking(move || users.find(&name))
            .await
            .map_err(|e| Status::internal(format!("user lookup failed: {e}")))?
            .map_err(|e| {
                error!(error = %e, "cannot find user");
                Status::internal(format!("cannot find user: {e}"))
            })?;

        let user = match user {
            Some(user) if user.is_correct_password(&password) => user,
            _ => {
                warn!(%username, "login refused");
                return Err(Status::not_found("incorrect username/password"));
            }
        };

        let access_token = self.tokens.generate(&user).map_err(|e| {
            error!(error = %e, "cannot generate access token");
            Status::internal("cannot generate access token")
        })?;

        info!(%username, role = user.role(), "login succeeded");
        Ok(Response::new(LoginResponse { access_token }))
    }
}
