//! `CatalogService` handler: one RPC per interaction pattern.
//!
//! | RPC           | Pattern          |
//! |---------------|------------------|
//! | `CreateItem`  | unary            |
//! | `SearchItems` | server streaming |
//! | `UploadImage` | client streaming |
//! | `RateItem`    | bidirectional    |
//!
//! Store calls take std locks that a running search holds until its consumer
//! has drained every match, so every store call runs on the blocking pool.
//! Inbound messages are awaited no longer than the caller's deadline.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};
use tracing::{error, info, warn};

use super::catalog_service_server::CatalogService;
use super::messages::{
    upload_image_request, CreateItemRequest, CreateItemResponse, RateItemRequest,
    RateItemResponse, SearchItemsRequest, SearchItemsResponse, UploadImageRequest,
    UploadImageResponse,
};
use crate::context::{CallContext, Interrupted};
use crate::error::StoreError;
use crate::model::{Filter, Item};
use crate::store::{assign_id, CatalogStore, ImageStore, RatingStore};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_SIZE: usize = 1 << 20;

const STREAM_BUFFER: usize = 16;

pub struct CatalogHandler<C, R, I> {
    items: Arc<C>,
    ratings: Arc<R>,
    images: Arc<I>,
    max_image_size: usize,
}

impl<C, R, I> CatalogHandler<C, R, I> {
    pub fn new(items: Arc<C>, ratings: Arc<R>, images: Arc<I>) -> Self {
        Self {
            items,
            ratings,
            images,
            max_image_size: MAX_IMAGE_SIZE,
        }
    }

    pub fn with_max_image_size(mut self, max_image_size: usize) -> Self {
        self.max_image_size = max_image_size;
        self
    }
}

#[tonic::async_trait]
impl<C, R, I> CatalogService for CatalogHandler<C, R, I>
where
    C: CatalogStore + 'static,
    R: RatingStore + 'static,
    I: ImageStore + 'static,
{
    async fn create_item(
        &self,
        request: Request<CreateItemRequest>,
    ) -> Result<Response<CreateItemResponse>, Status> {
        let ctx = CallContext::from_request(&request);
        let mut item: Item = request
            .into_inner()
            .item
            .map(Into::into)
            .ok_or_else(|| Status::invalid_argument("item is required"))?;
        info!(subject = ctx.subject(), id = %item.id, "create item");

        assign_id(&mut item).map_err(|e| Status::invalid_argument(e.to_string()))?;

        if let Err(interrupted) = ctx.check() {
            warn!(id = %item.id, %interrupted, "create item abandoned");
            return Err(interrupted.into());
        }

        let items = Arc::clone(&self.items);
        let id = blocking(move || items.save(&item)).await?.map_err(|e| match e {
            StoreError::AlreadyExists(_) => Status::already_exists(e.to_string()),
            other => {
                error!(error = %other, "cannot save item");
                Status::internal(format!("cannot save item to the store: {other}"))
            }
        })?;

        info!(%id, "item created");
        Ok(Response::new(CreateItemResponse { id }))
    }

    type SearchItemsStream = ReceiverStream<Result<SearchItemsResponse, Status>>;

    async fn search_items(
        &self,
        request: Request<SearchItemsRequest>,
    ) -> Result<Response<Self::SearchItemsStream>, Status> {
        let ctx = CallContext::from_request(&request);
        let filter: Filter = request
            .into_inner()
            .filter
            .map(Into::into)
            .unwrap_or_default();
        info!(subject = ctx.subject(), ?filter, "search items");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let items = Arc::clone(&self.items);

        tokio::spawn(async move {
            // A dropped response stream cancels the scan.
            let watcher = {
                let tx = tx.clone();
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    tx.closed().await;
                    ctx.cancel();
                })
            };

            let scan_tx = tx.clone();
            let scan = tokio::task::spawn_blocking(move || {
                let mut found = 0usize;
                let result = items.search(&ctx, &filter, |item| {
                    let message = SearchItemsResponse {
                        item: Some(item.into()),
                    };
                    scan_tx
                        .blocking_send(Ok(message))
                        .map_err(|_| Status::cancelled("search results receiver is gone"))?;
                    found += 1;
                    Ok::<(), Status>(())
                });
                result.map(|()| found)
            })
            .await;
            watcher.abort();

            let status = match scan {
                Ok(Ok(found)) => {
                    info!(found, "search finished");
                    return;
                }
                Ok(Err(status)) => status,
                Err(join_error) => {
                    error!(error = %join_error, "search worker failed");
                    Status::internal("search worker failed")
                }
            };
            warn!(code = ?status.code(), message = status.message(), "search aborted");
            let _ = tx.send(Err(status)).await;
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn upload_image(
        &self,
        request: Request<Streaming<UploadImageRequest>>,
    ) -> Result<Response<UploadImageResponse>, Status> {
        let ctx = CallContext::from_request(&request);
        let response = self.receive_image(&ctx, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    type RateItemStream = ReceiverStream<Result<RateItemResponse, Status>>;

    async fn rate_item(
        &self,
        request: Request<Streaming<RateItemRequest>>,
    ) -> Result<Response<Self::RateItemStream>, Status> {
        let ctx = CallContext::from_request(&request);
        let inbound = request.into_inner();
        info!(subject = ctx.subject(), "rate items");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let items = Arc::clone(&self.items);
        let ratings = Arc::clone(&self.ratings);

        tokio::spawn(async move {
            match rate_stream(&ctx, inbound, &tx, &items, &ratings).await {
                Ok(rated) => info!(rated, "rating stream finished"),
                Err(status) => {
                    warn!(code = ?status.code(), message = status.message(), "rating stream aborted");
                    let _ = tx.send(Err(status)).await;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

impl<C, R, I> CatalogHandler<C, R, I>
where
    C: CatalogStore + 'static,
    R: RatingStore + 'static,
    I: ImageStore + 'static,
{
    /// Image info first, then chunks until the client closes its side.
    async fn receive_image<S>(
        &self,
        ctx: &CallContext,
        stream: S,
    ) -> Result<UploadImageResponse, Status>
    where
        S: Stream<Item = Result<UploadImageRequest, Status>> + Send,
    {
        let mut stream = std::pin::pin!(stream);

        let info = match next_message(ctx, stream.as_mut()).await?.and_then(|m| m.data) {
            Some(upload_image_request::Data::Info(info)) => info,
            _ => return Err(Status::invalid_argument("first message must carry image info")),
        };
        info!(
            subject = ctx.subject(),
            item_id = %info.item_id,
            image_type = %info.image_type,
            "upload image"
        );

        let items = Arc::clone(&self.items);
        let item_id = info.item_id.clone();
        match blocking(move || items.find(&item_id)).await? {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(Status::not_found(format!(
                    "item {} does not exist",
                    info.item_id
                )))
            }
            Err(e) => {
                error!(error = %e, "cannot find item");
                return Err(Status::internal(format!("cannot find item: {e}")));
            }
        }

        let mut data = Vec::new();
        loop {
            ctx.check()?;
            let Some(message) = next_message(ctx, stream.as_mut()).await? else {
                break;
            };
            match message.data {
                Some(upload_image_request::Data::ChunkData(chunk)) => {
                    let size = data.len() + chunk.len();
                    if size > self.max_image_size {
                        warn!(size, max = self.max_image_size, "image rejected");
                        return Err(Status::invalid_argument(format!(
                            "image is too large: {size} > {}",
                            self.max_image_size
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }
                Some(upload_image_request::Data::Info(_)) => {
                    return Err(Status::invalid_argument("image info sent twice"));
                }
                None => return Err(Status::invalid_argument("empty upload message")),
            }
        }
        ctx.check()?;

        let size = u32::try_from(data.len())
            .map_err(|_| Status::invalid_argument("image size does not fit in u32"))?;
        let images = Arc::clone(&self.images);
        let id = blocking(move || images.save(&info.item_id, &info.image_type, &data))
            .await?
            .map_err(|e| {
                error!(error = %e, "cannot save image");
                Status::internal(format!("cannot save image to the store: {e}"))
            })?;

        info!(%id, size, "image saved");
        Ok(UploadImageResponse { id, size })
    }
}

/// Run a store call on the blocking pool.
async fn blocking<T, F>(call: F) -> Result<T, Status>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call).await.map_err(|e| {
        error!(error = %e, "store worker failed");
        Status::internal(format!("store worker failed: {e}"))
    })
}

/// Next inbound message, or `DeadlineExceeded` if the call's deadline passes
/// while waiting for it.
async fn next_message<S, T>(
    ctx: &CallContext,
    mut stream: Pin<&mut S>,
) -> Result<Option<T>, Status>
where
    S: Stream<Item = Result<T, Status>>,
{
    let next = stream.next();
    let message = match ctx.deadline() {
        Some(deadline) => tokio::time::timeout_at(deadline.into(), next)
            .await
            .map_err(|_| Status::from(Interrupted::DeadlineExceeded))?,
        None => next.await,
    };
    message.transpose()
}

/// Receive one rating, answer it, repeat. Returns the number of ratings
/// answered once the client closes its side.
async fn rate_stream<C, R, S>(
    ctx: &CallContext,
    inbound: S,
    tx: &mpsc::Sender<Result<RateItemResponse, Status>>,
    items: &Arc<C>,
    ratings: &Arc<R>,
) -> Result<u32, Status>
where
    C: CatalogStore + 'static,
    R: RatingStore + 'static,
    S: Stream<Item = Result<RateItemRequest, Status>> + Send,
{
    let mut inbound = std::pin::pin!(inbound);
    let mut rated = 0;
    loop {
        if tx.is_closed() {
            ctx.cancel();
        }
        ctx.check()?;

        let Some(request) = next_message(ctx, inbound.as_mut()).await? else {
            return Ok(rated);
        };
        info!(item_id = %request.item_id, score = request.score, "rating received");

        let lookup = Arc::clone(items);
        let item_id = request.item_id.clone();
        match blocking(move || lookup.find(&item_id)).await? {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(Status::not_found(format!(
                    "item {} is not found",
                    request.item_id
                )))
            }
            Err(e) => return Err(Status::internal(format!("cannot find item: {e}"))),
        }

        let store = Arc::clone(ratings);
        let (item_id, score) = (request.item_id.clone(), request.score);
        let rating = blocking(move || store.add(&item_id, score))
            .await?
            .map_err(|e| Status::internal(format!("cannot add rating to the store: {e}")))?;

        let response = RateItemResponse {
            item_id: request.item_id,
            rated_count: rating.count,
            average_score: rating.average(),
        };
        tx.send(Ok(response))
            .await
            .map_err(|_| Status::cancelled("rating response receiver is gone"))?;
        rated += 1;
    }
}
