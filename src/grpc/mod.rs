//! gRPC transport for the catalog: package `catalog.v1`.
//!
//! Uses tonic for the server and client stubs and prost for message
//! serialization (standard protobuf wire format, no `.proto` file).
//!
//! ## Services
//!
//! - `CatalogService`: `CreateItem`, `SearchItems`, `UploadImage`, `RateItem`
//!   (see [`CatalogHandler`]).
//! - `AuthService`: `Login` (see [`AuthHandler`]).
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use catalog_rpc::auth::{AccessLayer, TokenManager};
//! use catalog_rpc::store::{
//!     BlobImageStore, DirectoryBlobWriter, InMemoryCatalogStore, InMemoryRatingStore,
//!     InMemoryUserStore, User, UserStore,
//! };
//! use catalog_rpc::{config, grpc};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = InMemoryUserStore::new();
//! users.save(&User::new("admin1", "secret", "admin"))?;
//!
//! let tokens = Arc::new(TokenManager::new("secret", Duration::from_secs(900)));
//! let catalog = grpc::CatalogHandler::new(
//!     Arc::new(InMemoryCatalogStore::new()),
//!     Arc::new(InMemoryRatingStore::new()),
//!     Arc::new(BlobImageStore::new(DirectoryBlobWriter::new("img"))),
//! );
//! let auth = grpc::AuthHandler::new(Arc::new(users), tokens.clone());
//! let access = AccessLayer::new(tokens, config::default_access_rules());
//!
//! grpc::router(catalog, auth, access)
//!     .serve("[::1]:8080".parse()?)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod catalog;
mod convert;
mod error;
pub mod messages;

pub use auth::AuthHandler;
pub use catalog::{CatalogHandler, MAX_IMAGE_SIZE};

use tonic::transport::server::Router;
use tonic::transport::Server;
use tower::layer::util::{Identity, Stack};

use crate::auth::AccessLayer;
use crate::store::{CatalogStore, ImageStore, RatingStore, UserStore};

// ---------------------------------------------------------------------------
// Generated service traits + servers/clients
// ---------------------------------------------------------------------------

include!(concat!(env!("OUT_DIR"), "/catalog.v1.CatalogService.rs"));
include!(concat!(env!("OUT_DIR"), "/catalog.v1.AuthService.rs"));

pub use auth_service_client::AuthServiceClient;
pub use auth_service_server::{AuthService, AuthServiceServer};
pub use catalog_service_client::CatalogServiceClient;
pub use catalog_service_server::{CatalogService, CatalogServiceServer};

/// Full request paths, as seen by the access layers.
pub mod methods {
    pub const CREATE_ITEM: &str = "/catalog.v1.CatalogService/CreateItem";
    pub const SEARCH_ITEMS: &str = "/catalog.v1.CatalogService/SearchItems";
    pub const UPLOAD_IMAGE: &str = "/catalog.v1.CatalogService/UploadImage";
    pub const RATE_ITEM: &str = "/catalog.v1.CatalogService/RateItem";
    pub const LOGIN: &str = "/catalog.v1.AuthService/Login";
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

pub type CatalogRouter = Router<Stack<AccessLayer, Identity>>;

/// Both services behind the access-control layer, ready to `serve`.
pub fn router<C, R, I, U>(
    catalog: CatalogHandler<C, R, I>,
    auth: AuthHandler<U>,
    access: AccessLayer,
) -> CatalogRouter
where
    C: CatalogStore + 'static,
    R: RatingStore + 'static,
    I: ImageStore + 'static,
    U: UserStore + 'static,
{
    Server::builder()
        .layer(access)
        .add_service(CatalogServiceServer::new(catalog))
        .add_service(AuthServiceServer::new(auth))
}
