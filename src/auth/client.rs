//! Client-side credential handling.
//!
//! A [`TokenSlot`] holds the last token obtained from the login RPC. The
//! [`AuthAttachLayer`] wraps the client channel and stamps that token onto
//! calls whose path is in its "needs-auth" set. [`TokenRefresher`] keeps the
//! slot fresh from a background task.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use std::time::Duration;

use http::{HeaderValue, Request};
use tokio::task::JoinHandle;
use tonic::Status;
use tower::{Layer, Service};

use super::server::AUTHORIZATION_HEADER;

/// Delay before retrying a failed refresh.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Shared, swappable access token. Clones see the same value.
#[derive(Debug, Clone, Default)]
pub struct TokenSlot {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    pub fn set(&self, token: String) {
        match self.token.write() {
            Ok(mut slot) => *slot = Some(token),
            Err(_) => tracing::error!("token slot lock poisoned, keeping previous token"),
        }
    }
}

/// Something that can trade configured credentials for a fresh token.
#[tonic::async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self) -> Result<String, Status>;
}

// ---------------------------------------------------------------------------
// Refresh loop
// ---------------------------------------------------------------------------

/// Re-authenticates every `period` until dropped.
pub struct TokenRefresher {
    task: JoinHandle<()>,
}

impl TokenRefresher {
    /// Log in once, fill `slot`, then keep refreshing in the background.
    ///
    /// The first login happens before this returns, so its failure is the
    /// caller's to handle. Later failures are logged and retried after
    /// [`RETRY_DELAY`]; the normal period resumes after the next success.
    pub async fn start<A>(auth: Arc<A>, slot: TokenSlot, period: Duration) -> Result<Self, Status>
    where
        A: Authenticator + 'static,
    {
        slot.set(auth.login().await?);
        tracing::info!(period_secs = period.as_secs(), "token obtained, scheduling refresh");

        let task = tokio::spawn(async move {
            let mut wait = period;
            loop {
                tokio::time::sleep(wait).await;
                match auth.login().await {
                    Ok(token) => {
                        slot.set(token);
                        tracing::debug!("token refreshed");
                        wait = period;
                    }
                    Err(status) => {
                        tracing::warn!(code = ?status.code(), message = status.message(), "token refresh failed");
                        wait = RETRY_DELAY;
                    }
                }
            }
        });
        Ok(Self { task })
    }
}

impl Drop for TokenRefresher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ---------------------------------------------------------------------------
// Tower layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AuthAttachLayer {
    token: TokenSlot,
    methods: Arc<HashSet<String>>,
}

impl AuthAttachLayer {
    pub fn new<I, M>(token: TokenSlot, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            token,
            methods: Arc::new(methods.into_iter().map(Into::into).collect()),
        }
    }
}

impl<S> Layer<S> for AuthAttachLayer {
    type Service = AuthAttach<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthAttach {
            inner,
            token: self.token.clone(),
            methods: self.methods.clone(),
        }
    }
}

/// Adds `authorization: Bearer <token>` to calls on the needs-auth paths.
#[derive(Debug, Clone)]
pub struct AuthAttach<S> {
    inner: S,
    token: TokenSlot,
    methods: Arc<HashSet<String>>,
}

impl<S, B> Service<Request<B>> for AuthAttach<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if self.methods.contains(request.uri().path()) {
            let value = self
                .token
                .get()
                .and_then(|token| HeaderValue::from_str(&format!("Bearer {token}")).ok());
            match value {
                Some(value) => {
                    request.headers_mut().insert(AUTHORIZATION_HEADER, value);
                }
                None => tracing::warn!(path = request.uri().path(), "no token to attach"),
            }
        }
        self.inner.call(request)
    }
}
