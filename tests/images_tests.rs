
use media_backend::entities::image::UploadPolicy;
use reqwest::{header, StatusCode};
use serde_json::Value;
use test_utils::*;

fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend((0..len.saturating_sub(8)).map(|i| (i % 251) as u8));
    bytes
}

#[actix_rt::test]
async fn uploading_png_records_size_and_mime_type() {
    let app = TestApp::spawn().await;
    let payload = png_bytes(2048);

    let response = app.upload("cat.png", payload.clone()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let image: Value = response.json().await.unwrap();
    assert!(image["id"].as_i64().unwrap() > 0);
    assert_eq!(image["filename"], "cat.png");
    assert_eq!(image["size"], 2048);
    assert_eq!(image["mime_type"], "image/png");

    let files = app.stored_files();
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::metadata(&files[0]).unwrap().len(), 2048);
    let stored_name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    let (nanos, original) = stored_name.split_once('_').unwrap();
    assert!(nanos.parse::<i64>().is_ok());
    assert_eq!(original, "cat.png");
    assert_eq!(app.count_rows("images").await, 1);
}

#[actix_rt::test]
async fn disallowed_extension_is_rejected_without_side_effects() {
    let app = TestApp::spawn().await;

    let response = app.upload("notes.txt", b"plain text".to_vec()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "File type not allowed");
    assert!(app.stored_files().is_empty());
    assert_eq!(app.count_rows("images").await, 0);
}

#[actix_rt::test]
async fn oversized_upload_is_rejected_before_writing() {
    let app = TestApp::spawn_with(UploadPolicy { max_size: 1024, ..UploadPolicy::default() }).await;

    let response = app.upload("big.png", png_bytes(1025)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "File size exceeds maximum allowed size of 1024 bytes");
    assert!(app.stored_files().is_empty());
    assert_eq!(app.count_rows("images").await, 0);
}

#[actix_rt::test]
async fn upload_without_image_part_is_rejected() {
    let app = TestApp::spawn().await;
    let form = reqwest::multipart::Form::new().text("title", "no file here");

    let response = app.client
        .post(app.url("/api/images"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No image file provided");
}

#[actix_rt::test]
async fn non_multipart_upload_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/images"))
        .json(&serde_json::json!({"image": "cat.png"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No image file provided");
    assert_eq!(app.count_rows("images").await, 0);
}

#[actix_rt::test]
async fn upload_without_content_type_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/images"))
        .body("raw bytes")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn served_file_matches_uploaded_bytes() {
    let app = TestApp::spawn().await;
    let payload = png_bytes(200_000);
    let image: Value = app.upload("big cat.png", payload.clone()).await.json().await.unwrap();

    let response = app.client
        .get(app.url(&format!("/api/images/{}/file", image["id"])))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("inline"));
    assert!(disposition.contains("big cat.png"));

    let body = response.bytes().await.unwrap();
    assert_eq!(body.as_ref(), payload.as_slice());
}

#[actix_rt::test]
async fn serving_a_record_whose_file_vanished_is_not_found() {
    let app = TestApp::spawn().await;
    let image: Value = app.upload("cat.png", png_bytes(64)).await.json().await.unwrap();
    std::fs::remove_file(image["path"].as_str().unwrap()).unwrap();

    let response = app.client
        .get(app.url(&format!("/api/images/{}/file", image["id"])))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Image file not found");

    // the metadata record itself is still there
    let metadata = app.client
        .get(app.url(&format!("/api/images/{}", image["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(metadata.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn deleting_image_removes_file_and_hides_record() {
    let app = TestApp::spawn().await;
    let image: Value = app.upload("cat.gif", b"GIF89a....".to_vec()).await.json().await.unwrap();
    assert_eq!(image["mime_type"], "image/gif");

    let response = app.client
        .delete(app.url(&format!("/api/images/{}", image["id"])))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Image deleted successfully");
    assert!(app.stored_files().is_empty());

    let fetched = app.client
        .get(app.url(&format!("/api/images/{}", image["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);

    let listed: Vec<Value> = app.client.get(app.url("/api/images")).send().await.unwrap().json().await.unwrap();
    assert!(listed.is_empty());
    assert_eq!(app.count_rows("images").await, 1);
}

#[actix_rt::test]
async fn deleting_image_whose_file_vanished_still_succeeds() {
    let app = TestApp::spawn().await;
    let image: Value = app.upload("cat.webp", b"RIFF....WEBP".to_vec()).await.json().await.unwrap();
    std::fs::remove_file(image["path"].as_str().unwrap()).unwrap();

    let response = app.client
        .delete(app.url(&format!("/api/images/{}", image["id"])))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = app.client
        .get(app.url(&format!("/api/images/{}", image["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn image_lookups_validate_ids() {
    let app = TestApp::spawn().await;

    let invalid = app.client.get(app.url("/api/images/nope")).send().await.unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(body["error"], "Invalid image ID");

    let missing_file = app.client.get(app.url("/api/images/77/file")).send().await.unwrap();
    assert_eq!(missing_file.status(), StatusCode::NOT_FOUND);
    let body: Value = missing_file.json().await.unwrap();
    assert_eq!(body["error"], "Image not found");
}
