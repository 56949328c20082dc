use tonic::Code;

use crate::support::{gigabytes, laptop, start_server};

#[tokio::test]
async fn running_average_per_response() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));

    let responses = server
        .client_as("user1", "user")
        .await
        .rate_items(vec![(item_id.clone(), 4.0), (item_id.clone(), 5.0)])
        .await
        .unwrap();

    let summary: Vec<(String, u32, f64)> = responses
        .into_iter()
        .map(|r| (r.item_id, r.rated_count, r.average_score))
        .collect();
    assert_eq!(
        summary,
        vec![(item_id.clone(), 1, 4.0), (item_id, 2, 4.5)]
    );
}

#[tokio::test]
async fn ratings_accumulate_per_item_across_streams() {
    let server = start_server().await;
    let a = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));
    let b = server.seed(&laptop(2100.0, 4, 3.0, gigabytes(16)));
    let client = server.admin().await;

    let first = client
        .rate_items(vec![(a.clone(), 10.0), (b.clone(), 2.0)])
        .await
        .unwrap();
    assert_eq!((first[0].rated_count, first[0].average_score), (1, 10.0));
    assert_eq!((first[1].rated_count, first[1].average_score), (1, 2.0));

    let second = client.rate_items(vec![(a.clone(), 6.0)]).await.unwrap();
    assert_eq!(second[0].item_id, a);
    assert_eq!((second[0].rated_count, second[0].average_score), (2, 8.0));
}

#[tokio::test]
async fn unknown_item_aborts_stream() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));

    let status = server
        .admin()
        .await
        .rate_items(vec![
            (item_id, 3.0),
            ("6f1d9a52-0c4b-4d8e-8f7a-3e5b1c2d4a6f".to_string(), 5.0),
        ])
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn empty_stream_yields_no_responses() {
    let server = start_server().await;
    let responses = server.admin().await.rate_items(Vec::new()).await.unwrap();
    assert!(responses.is_empty());
}
