use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_rpc::config::{self, ServerConfig};
use catalog_rpc::grpc::{self, AuthHandler, CatalogHandler, MAX_IMAGE_SIZE};
use catalog_rpc::store::{
    BlobImageStore, DirectoryBlobWriter, InMemoryCatalogStore, InMemoryRatingStore,
    InMemoryUserStore, User, UserStore,
};
use catalog_rpc::{logging, AccessLayer, TokenManager};

/// Serve the catalog and auth gRPC services.
#[derive(Debug, Parser)]
#[command(name = "catalog-server", version)]
struct Cli {
    #[arg(long, env = "CATALOG_PORT", default_value_t = 8080)]
    port: u16,

    /// Folder uploaded images are written to.
    #[arg(long, env = "CATALOG_IMAGE_DIR", default_value = "img")]
    image_dir: PathBuf,

    /// Secret used to sign access tokens.
    #[arg(long, env = "CATALOG_TOKEN_SECRET", default_value = "secret")]
    secret: String,

    #[arg(long, env = "CATALOG_TOKEN_TTL_SECS", default_value_t = 15 * 60)]
    token_ttl_secs: u64,

    #[arg(long, env = "CATALOG_MAX_IMAGE_SIZE", default_value_t = MAX_IMAGE_SIZE)]
    max_image_size: usize,
}

impl Cli {
    fn config(self) -> ServerConfig {
        ServerConfig {
            port: self.port,
            image_dir: self.image_dir,
            token_secret: self.secret,
            token_ttl_secs: self.token_ttl_secs,
            max_image_size: self.max_image_size,
        }
    }
}

fn seed_users(users: &InMemoryUserStore) -> Result<()> {
    for (username, password, role) in [("admin1", "secret", "admin"), ("user1", "secret", "user")] {
        users
            .save(&User::new(username, password, role))
            .with_context(|| format!("cannot seed user {username}"))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info")?;

    let config = Cli::parse().config();
    config.validate()?;

    let users = InMemoryUserStore::new();
    seed_users(&users)?;

    let tokens = Arc::new(TokenManager::new(&config.token_secret, config.token_ttl()));
    let catalog = CatalogHandler::new(
        Arc::new(InMemoryCatalogStore::new()),
        Arc::new(InMemoryRatingStore::new()),
        Arc::new(BlobImageStore::new(DirectoryBlobWriter::new(&config.image_dir))),
    )
    .with_max_image_size(config.max_image_size);
    let auth = AuthHandler::new(Arc::new(users), tokens.clone());
    let access = AccessLayer::new(tokens, config::default_access_rules());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, image_dir = %config.image_dir.display(), "starting catalog server");

    grpc::router(catalog, auth, access)
        .serve(addr)
        .await
        .context("gRPC server failed")
}
