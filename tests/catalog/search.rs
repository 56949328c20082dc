use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use catalog_rpc::grpc::messages::{SearchItemsRequest, SearchItemsResponse};
use catalog_rpc::grpc::CatalogService;
use catalog_rpc::model::{Memory, MemoryUnit};
use catalog_rpc::sample;
use catalog_rpc::store::{BlobImageStore, InMemoryCatalogStore, InMemoryRatingStore, MemoryBlobWriter};
use catalog_rpc::{CatalogHandler, CatalogStore};
use tokio_stream::StreamExt;
use tonic::{Code, Request, Streaming};

use crate::support::{gigabytes, laptop, start_server, TestServer};

#[tokio::test]
async fn streams_exactly_the_matching_items() {
    let server = start_server().await;

    let expected: HashSet<String> = [
        server.seed(&laptop(2999.0, 4, 2.5, gigabytes(8))),
        server.seed(&laptop(1500.0, 8, 3.2, Memory::new(1, MemoryUnit::Terabyte))),
        server.seed(&laptop(3000.0, 6, 2.8, Memory::new(8192, MemoryUnit::Megabyte))),
    ]
    .into_iter()
    .collect();

    server.seed(&laptop(3000.01, 8, 3.0, gigabytes(32)));
    server.seed(&laptop(2000.0, 2, 3.0, gigabytes(32)));
    server.seed(&laptop(2000.0, 8, 2.4, gigabytes(32)));
    server.seed(&laptop(2000.0, 8, 3.0, gigabytes(4)));
    server.seed(&laptop(2000.0, 8, 3.0, Memory::new(64, MemoryUnit::Unknown)));

    let found = server
        .admin()
        .await
        .search_items(sample::demo_filter())
        .await
        .unwrap();

    let ids: HashSet<String> = found.iter().map(|item| item.id.clone()).collect();
    assert_eq!(found.len(), 3);
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn empty_store_ends_stream_cleanly() {
    let server = start_server().await;
    let found = server
        .admin()
        .await
        .search_items(sample::demo_filter())
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn search_needs_no_token() {
    let server = start_server().await;
    server.seed(&laptop(1000.0, 4, 3.0, gigabytes(16)));

    let mut stream = server
        .raw_client()
        .await
        .search_items(SearchItemsRequest {
            filter: Some(sample::demo_filter().into()),
        })
        .await
        .unwrap()
        .into_inner();

    let first = stream.message().await.unwrap().unwrap();
    assert_eq!(first.item.unwrap().brand, "Lenovo");
    assert!(stream.message().await.unwrap().is_none());
}

#[tokio::test]
async fn elapsed_deadline_ends_stream_with_status() {
    let items = Arc::new(InMemoryCatalogStore::new());
    items.save(&laptop(1000.0, 4, 3.0, gigabytes(16))).unwrap();
    let handler = CatalogHandler::new(
        items,
        Arc::new(InMemoryRatingStore::new()),
        Arc::new(BlobImageStore::new(MemoryBlobWriter::new())),
    );

    let mut request = Request::new(SearchItemsRequest {
        filter: Some(sample::demo_filter().into()),
    });
    request
        .metadata_mut()
        .insert("grpc-timeout", "0n".parse().unwrap());

    let mut stream = handler.search_items(request).await.unwrap().into_inner();
    let status = stream.next().await.unwrap().unwrap_err();
    assert_eq!(status.code(), Code::DeadlineExceeded);
    assert!(stream.next().await.is_none());
}

async fn open_search(server: &TestServer) -> Streaming<SearchItemsResponse> {
    server
        .raw_client()
        .await
        .search_items(SearchItemsRequest {
            filter: Some(sample::demo_filter().into()),
        })
        .await
        .unwrap()
        .into_inner()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn writers_queued_behind_a_paused_search_all_complete() {
    let server = start_server().await;
    for _ in 0..60_000 {
        server.seed(&laptop(2000.0, 8, 3.0, gigabytes(16)));
    }

    let mut stream = open_search(&server).await;
    assert!(stream.message().await.unwrap().is_some());

    let admin = server.admin().await;
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let admin = admin.clone();
            tokio::spawn(async move {
                admin
                    .create_item(laptop(5000.0, 8, 3.0, gigabytes(16)))
                    .await
            })
        })
        .collect();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let drained = tokio::time::timeout(Duration::from_secs(60), async {
        let mut count = 1usize;
        while stream.message().await.unwrap().is_some() {
            count += 1;
        }
        count
    })
    .await
    .expect("search stalled behind queued writers");
    assert_eq!(drained, 60_000);

    for writer in writers {
        let id = tokio::time::timeout(Duration::from_secs(10), writer)
            .await
            .expect("create item never finished")
            .unwrap()
            .unwrap();
        assert!(server.items.find(&id).unwrap().is_some());
    }
    assert_eq!(server.items.len().unwrap(), 60_004);
}

#[tokio::test]
async fn dropping_a_search_mid_scan_lets_writers_in() {
    let server = start_server().await;
    for _ in 0..20_000 {
        server.seed(&laptop(2000.0, 8, 3.0, gigabytes(16)));
    }

    let mut stream = open_search(&server).await;
    assert!(stream.message().await.unwrap().is_some());
    drop(stream);

    let admin = server.admin().await;
    let id = tokio::time::timeout(
        Duration::from_secs(5),
        admin.create_item(laptop(5000.0, 8, 3.0, gigabytes(16))),
    )
    .await
    .expect("create item waited on an abandoned search")
    .unwrap();
    assert!(server.items.find(&id).unwrap().is_some());
}
