use super::helpers::{
    STORE_BASE_URI, expect_status, get, listed_uris, multipart_request, read_json, read_text,
    send, spawn_app,
};
use axum::http::{StatusCode, header};
use serde_json::Value;

#[tokio::test]
async fn startup_creates_public_container() {
    let app = spawn_app().await;
    assert!(app.store.is_public(), "container should allow public reads");
}

#[tokio::test]
async fn empty_gallery_page_renders_upload_form() {
    let app = spawn_app().await;

    let res = expect_status(send(&app.app, get("/")).await, StatusCode::OK).await;
    assert!(
        res.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let page = read_text(res).await;
    assert!(page.contains("action=\"/upload\""));
    assert!(page.contains("No images yet"));
}

#[tokio::test]
async fn gallery_page_shows_each_uploaded_image() {
    let app = spawn_app().await;
    let req = multipart_request("/upload", &[("a.png", b"aaa"), ("b.jpg", b"bbb")]);
    send(&app.app, req).await;

    let page = read_text(expect_status(send(&app.app, get("/")).await, StatusCode::OK).await).await;
    for name in app.store.names() {
        assert!(
            page.contains(&format!("src=\"{}/{}\"", STORE_BASE_URI, name)),
            "page should show {}",
            name
        );
    }
    assert_eq!(page.matches("<figure>").count(), 2);
}

#[tokio::test]
async fn listing_skips_virtual_directories() {
    let app = spawn_app().await;
    app.store.add_virtual_directory("thumbnails/");
    send(&app.app, multipart_request("/upload", &[("only.gif", b"gif")])).await;

    let uris = listed_uris(&app.app).await;
    assert_eq!(uris.len(), 1);
    assert!(uris[0].ends_with(".gif"));
}

#[tokio::test]
async fn listing_count_matches_images() {
    let app = spawn_app().await;
    send(
        &app.app,
        multipart_request("/upload", &[("1.png", b"1"), ("2.png", b"2"), ("3.png", b"3")]),
    )
    .await;

    let res = expect_status(send(&app.app, get("/api/v1/images")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["images"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn store_outage_renders_error_page_with_trace() {
    let app = spawn_app().await;
    app.store.set_unavailable(true);

    let res = expect_status(
        send(&app.app, get("/")).await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
    let page = read_text(res).await;
    assert!(page.contains("Blob storage unavailable"));
    assert!(page.contains("503 Service Unavailable"));
    assert!(page.contains("Trace"));
}

#[tokio::test]
async fn store_outage_on_api_returns_json_error() {
    let app = spawn_app().await;
    app.store.set_unavailable(true);

    let res = expect_status(
        send(&app.app, get("/api/v1/images")).await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
    let body: Value = read_json(res).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Blob storage unavailable")
    );
}

#[tokio::test]
async fn health_reports_storage_state() {
    let app = spawn_app().await;

    let res = expect_status(send(&app.app, get("/health")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "up");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    app.store.set_unavailable(true);
    let res = expect_status(
        send(&app.app, get("/health")).await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["storage"], "down");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = spawn_app().await;

    let res = send(&app.app, get("/health")).await;
    let headers = res.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(
        headers[header::REFERRER_POLICY],
        "strict-origin-when-cross-origin"
    );
}

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let app = spawn_app().await;

    let req = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&app.app, req).await;
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");
}
