//! Test server wiring shared by every integration test.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use catalog_rpc::auth::{AuthAttachLayer, TokenSlot};
use catalog_rpc::client::{self, CatalogClient};
use catalog_rpc::config;
use catalog_rpc::grpc::{self, AuthHandler, CatalogHandler, CatalogServiceClient, MAX_IMAGE_SIZE};
use catalog_rpc::model::{Cpu, Item, Memory, MemoryUnit};
use catalog_rpc::store::{
    BlobImageStore, InMemoryCatalogStore, InMemoryRatingStore, InMemoryUserStore,
    MemoryBlobWriter, User, UserStore,
};
use catalog_rpc::{AccessLayer, CatalogStore, TokenManager};
use chrono::Utc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;
use tonic::Request;

pub const SECRET: &str = "test-secret";

pub struct TestServer {
    pub addr: SocketAddr,
    pub tokens: Arc<TokenManager>,
    pub items: Arc<InMemoryCatalogStore>,
    pub blobs: MemoryBlobWriter,
}

/// Bind to port 0, spawn the server with both seeded users, and return handles
/// to its stores.
pub async fn start_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let users = InMemoryUserStore::new();
    users.save(&User::new("admin1", "secret", "admin")).unwrap();
    users.save(&User::new("user1", "secret", "user")).unwrap();

    let tokens = Arc::new(TokenManager::new(SECRET, Duration::from_secs(900)));
    let items = Arc::new(InMemoryCatalogStore::new());
    let blobs = MemoryBlobWriter::new();

    let catalog = CatalogHandler::new(
        items.clone(),
        Arc::new(InMemoryRatingStore::new()),
        Arc::new(BlobImageStore::new(blobs.clone())),
    )
    .with_max_image_size(MAX_IMAGE_SIZE);
    let auth = AuthHandler::new(Arc::new(users), tokens.clone());
    let access = AccessLayer::new(tokens.clone(), config::default_access_rules());

    tokio::spawn(async move {
        grpc::router(catalog, auth, access)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    TestServer {
        addr,
        tokens,
        items,
        blobs,
    }
}

impl TestServer {
    pub async fn channel(&self) -> Channel {
        client::connect(&format!("http://{}", self.addr)).await.unwrap()
    }

    /// Generated client with no credentials attached.
    pub async fn raw_client(&self) -> CatalogServiceClient<Channel> {
        CatalogServiceClient::new(self.channel().await)
    }

    pub fn token(&self, subject: &str, role: &str) -> String {
        self.tokens.generate_at(subject, role, Utc::now()).unwrap()
    }

    /// Typed client whose token slot already holds a token for `role`.
    pub async fn client_as(&self, subject: &str, role: &str) -> CatalogClient {
        let slot = TokenSlot::new();
        slot.set(self.token(subject, role));
        CatalogClient::new(
            self.channel().await,
            AuthAttachLayer::new(slot, config::default_auth_methods()),
        )
    }

    pub async fn admin(&self) -> CatalogClient {
        self.client_as("admin1", "admin").await
    }

    /// Store `item` directly, bypassing the RPC layer.
    pub fn seed(&self, item: &Item) -> String {
        self.items.save(item).unwrap()
    }
}

pub fn with_token<T>(message: T, token: &str) -> Request<T> {
    let mut request = Request::new(message);
    request
        .metadata_mut()
        .insert("authorization", format!("Bearer {token}").parse().unwrap());
    request
}

pub fn laptop(price_usd: f64, cores: u32, ghz: f64, ram: Memory) -> Item {
    Item {
        id: String::new(),
        brand: "Lenovo".into(),
        name: "Thinkpad P1".into(),
        cpu: Cpu {
            brand: "Intel".into(),
            name: "Core i9-9980HK".into(),
            number_cores: cores,
            number_threads: cores * 2,
            min_ghz: ghz,
            max_ghz: ghz + 2.0,
        },
        ram,
        price_usd,
    }
}

pub fn gigabytes(value: u64) -> Memory {
    Memory::new(value, MemoryUnit::Gigabyte)
}
