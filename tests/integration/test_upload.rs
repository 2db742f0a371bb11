use super::helpers::{
    STORE_BASE_URI, assert_redirects_home, expect_status, listed_uris, multipart_request,
    read_json, read_text, send, spawn_app, spawn_app_with_limit,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;

#[tokio::test]
async fn upload_redirects_home_and_grows_listing() {
    let app = spawn_app().await;

    let res = send(
        &app.app,
        multipart_request("/upload", &[("one.png", b"1"), ("two.jpg", b"2")]),
    )
    .await;
    assert_redirects_home(&res);
    assert_eq!(listed_uris(&app.app).await.len(), 2);
}

#[tokio::test]
async fn upload_stores_content_byte_for_byte() {
    let app = spawn_app().await;
    let payload: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10, 0x0d, 0x0a];

    let res = expect_status(
        send(&app.app, multipart_request("/api/v1/images", &[("pixel.PNG", payload)])).await,
        StatusCode::OK,
    )
    .await;
    let report: Value = read_json(res).await;
    let blob_name = report["stored"][0]["blob_name"].as_str().unwrap();
    let uri = report["stored"][0]["uri"].as_str().unwrap();

    assert_eq!(uri, format!("{}/{}", STORE_BASE_URI, blob_name));
    assert!(blob_name.ends_with(".png"));

    let stored = app.store.get(blob_name).expect("blob should be stored");
    assert_eq!(stored.data.as_ref(), payload);
    assert_eq!(stored.content_type, "image/png");
}

#[tokio::test]
async fn same_file_name_twice_gives_two_entries() {
    let app = spawn_app().await;

    for _ in 0..2 {
        let res = send(&app.app, multipart_request("/upload", &[("cat.jpg", b"meow")])).await;
        assert_redirects_home(&res);
    }

    let uris = listed_uris(&app.app).await;
    assert_eq!(uris.len(), 2);
    assert_ne!(uris[0], uris[1]);
    assert!(uris.iter().all(|u| u.ends_with(".jpg")));
}

#[tokio::test]
async fn empty_file_picker_is_a_noop() {
    let app = spawn_app().await;

    let res = send(&app.app, multipart_request("/upload", &[("", b"")])).await;
    assert_redirects_home(&res);
    assert!(listed_uris(&app.app).await.is_empty());
}

#[tokio::test]
async fn non_file_fields_are_ignored() {
    let app = spawn_app().await;
    let boundary = "----gallery-boundary-fields";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nhello\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"real.webp\"\r\n\
         Content-Type: image/webp\r\n\r\nwebp\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let req = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    assert_redirects_home(&send(&app.app, req).await);
    let names = app.store.names();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".webp"));
}

#[tokio::test]
async fn partial_failure_page_lists_stored_and_failed_files() {
    let app = spawn_app().await;
    app.store.fail_uploads_of(b"broken");

    let res = expect_status(
        send(
            &app.app,
            multipart_request(
                "/upload",
                &[("good.png", b"fine"), ("bad.png", b"broken"), ("late.png", b"ok")],
            ),
        )
        .await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;

    let page = read_text(res).await;
    assert!(page.contains("1 of 3 files could not be uploaded"));
    assert!(page.contains("good.png as"));
    assert!(page.contains("late.png as"));
    assert!(page.contains("bad.png: Failed to upload bad.png"));

    assert_eq!(listed_uris(&app.app).await.len(), 2);
}

#[tokio::test]
async fn api_partial_failure_is_multi_status() {
    let app = spawn_app().await;
    app.store.fail_uploads_of(b"broken");

    let res = expect_status(
        send(
            &app.app,
            multipart_request("/api/v1/images", &[("bad.jpg", b"broken"), ("ok.jpg", b"ok")]),
        )
        .await,
        StatusCode::MULTI_STATUS,
    )
    .await;

    let report: Value = read_json(res).await;
    assert_eq!(report["stored"].as_array().unwrap().len(), 1);
    assert_eq!(report["stored"][0]["original_name"], "ok.jpg");
    assert_eq!(report["failed"][0]["original_name"], "bad.jpg");
    assert!(
        report["failed"][0]["error"]
            .as_str()
            .unwrap()
            .contains("connection reset")
    );
    assert!(report["failed"][0].get("cause").is_none());
}

#[tokio::test]
async fn upload_over_body_limit_is_rejected() {
    let app = spawn_app_with_limit(1024).await;
    let big = vec![7u8; 4096];

    let res = send(&app.app, multipart_request("/upload", &[("big.png", &big)])).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.store.names().is_empty());
}

#[tokio::test]
async fn upload_without_multipart_body_is_rejected() {
    let app = spawn_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("not multipart"))
        .unwrap();

    let res = send(&app.app, req).await;
    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn extension_only_file_name_keeps_extension() {
    let app = spawn_app().await;

    assert_redirects_home(&send(&app.app, multipart_request("/upload", &[(".png", b"png")])).await);

    let names = app.store.names();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".png"));
    assert_eq!(app.store.get(&names[0]).unwrap().content_type, "image/png");
}
