use catalog_rpc::grpc::messages::UploadImageRequest;
use catalog_rpc::grpc::MAX_IMAGE_SIZE;
use tonic::Code;

use crate::support::{gigabytes, laptop, start_server, with_token};

#[tokio::test]
async fn image_is_stored_and_size_reported() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));
    let image: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

    let response = server
        .admin()
        .await
        .upload_image(&item_id, ".jpg", image.clone())
        .await
        .unwrap();

    assert_eq!(response.size, 5000);
    assert_eq!(server.blobs.len(), 1);
    assert_eq!(server.blobs.get(&format!("{}.jpg", response.id)), Some(image));
}

#[tokio::test]
async fn image_at_the_limit_is_accepted() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));

    let response = server
        .admin()
        .await
        .upload_image(&item_id, ".png", vec![7; MAX_IMAGE_SIZE])
        .await
        .unwrap();
    assert_eq!(response.size as usize, MAX_IMAGE_SIZE);
}

#[tokio::test]
async fn oversized_image_is_rejected_and_not_written() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));

    let status = server
        .admin()
        .await
        .upload_image(&item_id, ".jpg", vec![0; MAX_IMAGE_SIZE + 1])
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(server.blobs.is_empty());
}

#[tokio::test]
async fn unknown_item_is_not_found() {
    let server = start_server().await;

    let status = server
        .admin()
        .await
        .upload_image("9b5c3fd4-4f84-4b3e-9d6c-2b8f2a8b7c11", ".jpg", vec![1, 2, 3])
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert!(server.blobs.is_empty());
}

#[tokio::test]
async fn chunk_before_info_is_invalid_argument() {
    let server = start_server().await;
    let token = server.token("admin1", "admin");
    let frames = vec![UploadImageRequest::chunk(vec![1, 2, 3])];

    let status = server
        .raw_client()
        .await
        .upload_image(with_token(tokio_stream::iter(frames), &token))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn second_info_is_invalid_argument() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));
    let token = server.token("admin1", "admin");
    let frames = vec![
        UploadImageRequest::info(&item_id, ".jpg"),
        UploadImageRequest::chunk(vec![1, 2, 3]),
        UploadImageRequest::info(&item_id, ".png"),
    ];

    let status = server
        .raw_client()
        .await
        .upload_image(with_token(tokio_stream::iter(frames), &token))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(server.blobs.is_empty());
}

#[tokio::test]
async fn user_role_cannot_upload() {
    let server = start_server().await;
    let item_id = server.seed(&laptop(2000.0, 4, 3.0, gigabytes(16)));

    let status = server
        .client_as("user1", "user")
        .await
        .upload_image(&item_id, ".jpg", vec![1])
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);
}
