pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod dump;
mod error;
pub mod grpc;
pub mod logging;
pub mod model;
pub mod sample;
pub mod store;

pub use auth::{AccessLayer, AccessRules, Claims, TokenManager};
pub use client::{AuthClient, CatalogClient};
pub use context::{CallContext, Interrupted};
pub use error::StoreError;
pub use grpc::{AuthHandler, CatalogHandler};
pub use model::{Cpu, Filter, Item, Memory, MemoryUnit};
pub use store::{CatalogStore, ImageStore, RatingStore, UserStore};
