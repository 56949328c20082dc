//! Server-side access control.
//!
//! [`AccessLayer`] wraps the whole tonic router. For each inbound call it looks
//! up the request path in [`AccessRules`]:
//!
//! - path not listed → the call goes through untouched;
//! - no `authorization` metadata, or a token that fails verification →
//!   `UNAUTHENTICATED`;
//! - verified role not among the method's roles → `PERMISSION_DENIED`.
//!
//! Verified [`Claims`] are inserted into the request extensions, where
//! `CallContext::from_request` picks them up.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::{HeaderMap, HeaderValue, Request, Response};
use serde::{Deserialize, Serialize};
use tonic::Status;
use tower::{Layer, Service};

use super::token::{Claims, TokenManager};

/// Metadata key carrying the access token.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Static method → allowed-roles table.
///
/// Keys are full gRPC paths such as `/catalog.v1.CatalogService/CreateItem`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    methods: HashMap<String, HashSet<String>>,
}

impl AccessRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require one of `roles` for `method`. Returns `self` for chaining.
    pub fn allow(mut self, method: &str, roles: &[&str]) -> Self {
        self.methods
            .entry(method.to_string())
            .or_default()
            .extend(roles.iter().map(|role| role.to_string()));
        self
    }

    /// Roles accepted for `method`, or `None` when it needs no credentials.
    pub fn required_roles(&self, method: &str) -> Option<&HashSet<String>> {
        self.methods.get(method)
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|m| m.as_str())
    }
}

/// The authorization decision, independent of the tower plumbing.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Arc<TokenManager>,
    rules: Arc<AccessRules>,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenManager>, rules: AccessRules) -> Self {
        Self {
            tokens,
            rules: Arc::new(rules),
        }
    }

    /// `Ok(None)` for open methods, `Ok(Some(claims))` for an authorized call.
    pub fn authorize(&self, method: &str, headers: &HeaderMap) -> Result<Option<Claims>, Status> {
        let Some(roles) = self.rules.required_roles(method) else {
            return Ok(None);
        };

        let token = headers
            .get(AUTHORIZATION_HEADER)
            .ok_or_else(|| Status::unauthenticated("authorization token is not provided"))?
            .to_str()
            .map_err(|_| Status::unauthenticated("authorization token is not valid ASCII"))?;
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

        let claims = self
            .tokens
            .verify(token)
            .map_err(|e| Status::unauthenticated(format!("access token is invalid: {e}")))?;

        if !roles.contains(&claims.role) {
            return Err(Status::permission_denied("no permission to access this RPC"));
        }
        Ok(Some(claims))
    }
}

#[derive(Clone)]
pub struct AccessLayer {
    guard: AccessGuard,
}

impl AccessLayer {
    pub fn new(tokens: Arc<TokenManager>, rules: AccessRules) -> Self {
        Self {
            guard: AccessGuard::new(tokens, rules),
        }
    }
}

impl<S> Layer<S> for AccessLayer {
    type Service = AccessService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessService {
            inner,
            guard: self.guard.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AccessService<S> {
    inner: S,
    guard: AccessGuard,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let method = request.uri().path().to_string();
        tracing::debug!(%method, "access check");

        match self.guard.authorize(&method, request.headers()) {
            Ok(Some(claims)) => {
                request.extensions_mut().insert(claims);
            }
            Ok(None) => {}
            Err(status) => {
                tracing::warn!(%method, code = ?status.code(), message = status.message(), "call rejected");
                return Box::pin(async move { Ok(rejection(&status)) });
            }
        }

        // The clone may not be ready; keep the one that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}

/// A trailers-only gRPC response carrying `status`.
fn rejection<B: Default>(status: &Status) -> Response<B> {
    let mut response = Response::new(B::default());
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/grpc"),
    );
    if status.add_header(response.headers_mut()).is_err() {
        response
            .headers_mut()
            .insert("grpc-status", HeaderValue::from(tonic::Code::Internal as i32));
    }
    response
}
