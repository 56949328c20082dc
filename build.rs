use tonic_build::manual::{Builder, Method, Service};

fn main() {
    // Messages are hand-written prost structs in `src/grpc/messages.rs`, so only
    // the service stubs are generated here (no `.proto` file, no protoc).
    let catalog = Service::builder()
        .name("CatalogService")
        .package("catalog.v1")
        .method(
            Method::builder()
                .name("create_item")
                .route_name("CreateItem")
                .input_type("crate::grpc::messages::CreateItemRequest")
                .output_type("crate::grpc::messages::CreateItemResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .method(
            Method::builder()
                .name("search_items")
                .route_name("SearchItems")
                .input_type("crate::grpc::messages::SearchItemsRequest")
                .output_type("crate::grpc::messages::SearchItemsResponse")
                .codec_path("tonic::codec::ProstCodec")
                .server_streaming()
                .build(),
        )
        .method(
            Method::builder()
                .name("upload_image")
                .route_name("UploadImage")
                .input_type("crate::grpc::messages::UploadImageRequest")
                .output_type("crate::grpc::messages::UploadImageResponse")
                .codec_path("tonic::codec::ProstCodec")
                .client_streaming()
                .build(),
        )
        .method(
            Method::builder()
                .name("rate_item")
                .route_name("RateItem")
                .input_type("crate::grpc::messages::RateItemRequest")
                .output_type("crate::grpc::messages::RateItemResponse")
                .codec_path("tonic::codec::ProstCodec")
                .client_streaming()
                .server_streaming()
                .build(),
        )
        .build();

    let auth = Service::builder()
        .name("AuthService")
        .package("catalog.v1")
        .method(
            Method::builder()
                .name("login")
                .route_name("Login")
                .input_type("crate::grpc::messages::LoginRequest")
                .output_type("crate::grpc::messages::LoginResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    Builder::new().compile(&[catalog, auth]);
}
