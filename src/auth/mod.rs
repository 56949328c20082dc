//! Token issuance plus the server and client halves of access control.

pub mod client;
pub mod server;
pub mod token;

pub use client::{AuthAttach, AuthAttachLayer, Authenticator, TokenRefresher, TokenSlot};
pub use server::{AccessGuard, AccessLayer, AccessRules, AccessService};
pub use token::{Claims, TokenError, TokenManager};
