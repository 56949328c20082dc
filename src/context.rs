//! Per-call context passed from the transport down into the stores.
//!
//! Carries the caller's deadline, a cancellation flag shared by every clone of
//! the context, and the claims the access layer verified for this call (if the
//! method required any). Long-running loops call [`CallContext::check`] once
//! per iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::auth::Claims;

/// Metadata key gRPC clients use to announce their deadline.
pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Why a call stopped before finishing its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("request is canceled")]
    Canceled,
    #[error("deadline is exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
    claims: Option<Claims>,
}

impl CallContext {
    /// A context with no deadline that is never cancelled unless asked to.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    /// Build the context for an inbound tonic request.
    ///
    /// The deadline comes from `grpc-timeout`; the claims from the request
    /// extensions, where the access layer leaves them.
    pub fn from_request<T>(request: &tonic::Request<T>) -> Self {
        let mut ctx = Self::new();
        let timeout = request
            .metadata()
            .get(GRPC_TIMEOUT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_grpc_timeout);
        if let Some(timeout) = timeout {
            ctx = ctx.with_timeout(timeout);
        }
        if let Some(claims) = request.extensions().get::<Claims>() {
            ctx = ctx.with_claims(claims.clone());
        }
        ctx
    }

    /// Mark the call as cancelled. Visible through every clone.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// Subject of the verified claims, or `"anonymous"` for open methods.
    pub fn subject(&self) -> &str {
        self.claims
            .as_ref()
            .map(|claims| claims.sub.as_str())
            .unwrap_or("anonymous")
    }

    /// Fails once the call has been cancelled or its deadline has passed.
    /// Cancellation wins when both hold.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            return Err(Interrupted::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Parse a `grpc-timeout` value: up to eight ASCII digits followed by one of
/// `H M S m u n`.
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 || value.len() > 9 || !value.is_ascii() {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;
    let timeout = match unit {
        "H" => Duration::from_secs(amount.saturating_mul(3600)),
        "M" => Duration::from_secs(amount.saturating_mul(60)),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(timeout)
}
