//! Typed client for the catalog services.
//!
//! [`CatalogClient`] talks through an [`AuthAttach`] channel, so calls on the
//! needs-auth paths carry whatever token the [`TokenSlot`] holds at the time.
//!
//! [`TokenSlot`]: crate::auth::TokenSlot

use std::path::Path;
use std::time::Duration;

use tokio_stream::StreamExt;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status};
use tower::Layer;
use tracing::{debug, info};

use crate::auth::{AuthAttach, AuthAttachLayer, Authenticator};
use crate::grpc::messages::{
    CreateItemRequest, LoginRequest, RateItemRequest, RateItemResponse, SearchItemsRequest,
    UploadImageRequest, UploadImageResponse,
};
use crate::grpc::{AuthServiceClient, CatalogServiceClient};
use crate::model::{Filter, Item};

/// Size of each `UploadImage` data frame.
pub const CHUNK_SIZE: usize = 1024;

/// Open a channel to `address` (e.g. `http://127.0.0.1:8080`).
pub async fn connect(address: &str) -> Result<Channel, tonic::transport::Error> {
    Endpoint::from_shared(address.to_string())?.connect().await
}

/// Logs in with fixed credentials over `AuthService`.
#[derive(Clone)]
pub struct AuthClient {
    client: AuthServiceClient<Channel>,
    username: String,
    password: String,
}

impl AuthClient {
    pub fn new(channel: Channel, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client: AuthServiceClient::new(channel),
            username: username.into(),
            password: password.into(),
        }
    }
}

#[tonic::async_trait]
impl Authenticator for AuthClient {
    async fn login(&self) -> Result<String, Status> {
        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        let response = self.client.clone().login(request).await?;
        debug!(username = %self.username, "logged in");
        Ok(response.into_inner().access_token)
    }
}

#[derive(Clone)]
pub struct CatalogClient {
    inner: CatalogServiceClient<AuthAttach<Channel>>,
    timeout: Option<Duration>,
}

impl CatalogClient {
    pub fn new(channel: Channel, auth: AuthAttachLayer) -> Self {
        Self {
            inner: CatalogServiceClient::new(auth.layer(channel)),
            timeout: None,
        }
    }

    /// Deadline sent with every call (`grpc-timeout`).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        request
    }

    /// Returns the id the server stored the item under.
    pub async fn create_item(&self, item: Item) -> Result<String, Status> {
        let request = self.request(CreateItemRequest {
            item: Some(item.into()),
        });
        let id = self.inner.clone().create_item(request).await?.into_inner().id;
        info!(%id, "item created");
        Ok(id)
    }

    pub async fn search_items(&self, filter: Filter) -> Result<Vec<Item>, Status> {
        let request = self.request(SearchItemsRequest {
            filter: Some(filter.into()),
        });
        let mut stream = self.inner.clone().search_items(request).await?.into_inner();

        let mut found = Vec::new();
        while let Some(response) = stream.message().await? {
            if let Some(item) = response.item {
                let item = Item::from(item);
                debug!(id = %item.id, brand = %item.brand, name = %item.name, "found item");
                found.push(item);
            }
        }
        Ok(found)
    }

    /// Send `data` as one info frame followed by [`CHUNK_SIZE`] data frames.
    pub async fn upload_image(
        &self,
        item_id: &str,
        image_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadImageResponse, Status> {
        let frames: Vec<UploadImageRequest> =
            std::iter::once(UploadImageRequest::info(item_id, image_type))
                .chain(data.chunks(CHUNK_SIZE).map(UploadImageRequest::chunk))
                .collect();
        let request = self.request(tokio_stream::iter(frames));
        let response = self.inner.clone().upload_image(request).await?.into_inner();
        info!(id = %response.id, size = response.size, "image uploaded");
        Ok(response)
    }

    /// Upload a file; its extension (with the dot) becomes the image type.
    pub async fn upload_image_file(
        &self,
        item_id: &str,
        path: &Path,
    ) -> Result<UploadImageResponse, Status> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Status::invalid_argument(format!("cannot read {}: {e}", path.display())))?;
        let image_type = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        self.upload_image(item_id, &image_type, data).await
    }

    /// Rate each `(item_id, score)` pair on one stream; responses come back in
    /// the same order.
    pub async fn rate_items(
        &self,
        scores: Vec<(String, f64)>,
    ) -> Result<Vec<RateItemResponse>, Status> {
        let requests = scores
            .into_iter()
            .map(|(item_id, score)| RateItemRequest { item_id, score });
        let request = self.request(tokio_stream::iter(requests));
        let mut stream = self.inner.clone().rate_item(request).await?.into_inner();

        let mut responses = Vec::new();
        while let Some(response) = stream.next().await {
            let response = response?;
            info!(
                item_id = %response.item_id,
                rated_count = response.rated_count,
                average_score = response.average_score,
                "rating recorded"
            );
            responses.push(response);
        }
        Ok(responses)
    }
}
