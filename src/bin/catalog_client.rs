use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_rpc::auth::{AuthAttachLayer, TokenRefresher, TokenSlot};
use catalog_rpc::client::{self, AuthClient, CatalogClient};
use catalog_rpc::config::{self, ClientConfig};
use catalog_rpc::{logging, sample};

/// Log in, then create, search, upload to and rate catalog items.
#[derive(Debug, Parser)]
#[command(name = "catalog-client", version)]
struct Cli {
    #[arg(long, env = "CATALOG_ADDRESS", default_value = "http://127.0.0.1:8080")]
    address: String,

    #[arg(long, env = "CATALOG_USERNAME", default_value = "admin1")]
    username: String,

    #[arg(long, env = "CATALOG_PASSWORD", default_value = "secret")]
    password: String,

    /// Seconds between token refreshes.
    #[arg(long, env = "CATALOG_REFRESH_SECS", default_value_t = 30)]
    refresh_secs: u64,

    /// Number of random items to create.
    #[arg(long, default_value_t = 10)]
    items: usize,

    /// Image to upload for the first created item.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Per-call deadline in seconds.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        ClientConfig {
            address: self.address.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            refresh_secs: self.refresh_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info")?;

    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;

    let channel = client::connect(&config.address)
        .await
        .with_context(|| format!("cannot connect to {}", config.address))?;

    let slot = TokenSlot::new();
    let auth = Arc::new(AuthClient::new(
        channel.clone(),
        config.username.as_str(),
        config.password.as_str(),
    ));
    let _refresher = TokenRefresher::start(auth, slot.clone(), config.refresh_period())
        .await
        .context("cannot log in")?;

    let catalog = CatalogClient::new(
        channel,
        AuthAttachLayer::new(slot, config::default_auth_methods()),
    )
    .with_timeout(Duration::from_secs(cli.timeout_secs));

    let mut ids = Vec::with_capacity(cli.items);
    for _ in 0..cli.items {
        ids.push(catalog.create_item(sample::new_item()).await?);
    }

    let found = catalog.search_items(sample::demo_filter()).await?;
    tracing::info!(found = found.len(), "search complete");

    if let (Some(path), Some(id)) = (&cli.image, ids.first()) {
        catalog.upload_image_file(id, path).await?;
    }

    let scores = ids
        .iter()
        .map(|id| (id.clone(), sample::random_score()))
        .collect();
    catalog.rate_items(scores).await?;

    Ok(())
}
