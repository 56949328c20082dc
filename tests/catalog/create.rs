use std::sync::Arc;

use catalog_rpc::grpc::messages::CreateItemRequest;
use catalog_rpc::grpc::CatalogService;
use catalog_rpc::store::{BlobImageStore, InMemoryCatalogStore, InMemoryRatingStore, MemoryBlobWriter};
use catalog_rpc::{CatalogHandler, CatalogStore};
use tonic::{Code, Request};
use uuid::Uuid;

use crate::support::{gigabytes, laptop, start_server, with_token};

#[tokio::test]
async fn item_without_id_gets_fresh_uuid() {
    let server = start_server().await;
    let item = laptop(2500.0, 8, 3.0, gigabytes(16));

    let id = server.admin().await.create_item(item.clone()).await.unwrap();

    assert!(Uuid::parse_str(&id).is_ok());
    let stored = server.items.find(&id).unwrap().unwrap();
    assert_eq!(stored, catalog_rpc::Item { id: id.clone(), ..item });
}

#[tokio::test]
async fn caller_supplied_id_is_kept() {
    let server = start_server().await;
    let id = Uuid::new_v4().to_string();
    let item = catalog_rpc::Item {
        id: id.clone(),
        ..laptop(1800.0, 4, 2.6, gigabytes(8))
    };

    let returned = server.admin().await.create_item(item).await.unwrap();
    assert_eq!(returned, id);
}

#[tokio::test]
async fn duplicate_id_is_already_exists() {
    let server = start_server().await;
    let client = server.admin().await;
    let item = catalog_rpc::Item {
        id: Uuid::new_v4().to_string(),
        ..laptop(1800.0, 4, 2.6, gigabytes(8))
    };

    client.create_item(item.clone()).await.unwrap();
    let status = client.create_item(item).await.unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);
    assert_eq!(server.items.len().unwrap(), 1);
}

#[tokio::test]
async fn malformed_id_is_invalid_argument() {
    let server = start_server().await;
    let item = catalog_rpc::Item {
        id: "not-a-uuid".into(),
        ..laptop(1800.0, 4, 2.6, gigabytes(8))
    };

    let status = server.admin().await.create_item(item).await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(server.items.is_empty().unwrap());
}

#[tokio::test]
async fn missing_item_is_invalid_argument() {
    let server = start_server().await;
    let token = server.token("admin1", "admin");

    let status = server
        .raw_client()
        .await
        .create_item(with_token(CreateItemRequest { item: None }, &token))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn elapsed_deadline_stores_nothing() {
    let items = Arc::new(InMemoryCatalogStore::new());
    let handler = CatalogHandler::new(
        items.clone(),
        Arc::new(InMemoryRatingStore::new()),
        Arc::new(BlobImageStore::new(MemoryBlobWriter::new())),
    );

    let mut request = Request::new(CreateItemRequest {
        item: Some(laptop(1800.0, 4, 2.6, gigabytes(8)).into()),
    });
    request
        .metadata_mut()
        .insert("grpc-timeout", "0n".parse().unwrap());

    let status = handler.create_item(request).await.unwrap_err();
    assert_eq!(status.code(), Code::DeadlineExceeded);
    assert!(items.is_empty().unwrap());
}
