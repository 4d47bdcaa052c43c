//! Integration tests for the HTTP clients using wiremock HTTP mocks.

use newsrelay_clients::{HttpPublisher, UnsplashImageSearch};
use newsrelay_core::{ImageError, ImageSearch, PublishError, Publisher};
use rand::SeedableRng;
use wiremock::matchers::{body_bytes, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn publisher(base_url: &str) -> HttpPublisher {
    HttpPublisher::new(base_url, Some("relay-token"), 5, "newsrelay-test")
        .expect("client construction should not fail")
}

fn image_search(base_url: &str) -> UnsplashImageSearch {
    UnsplashImageSearch::with_base_url("access-key", 5, "newsrelay-test", base_url)
        .expect("client construction should not fail")
        .with_rng(rand::rngs::StdRng::seed_from_u64(3))
}

#[tokio::test]
async fn text_post_returns_platform_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("authorization", "Bearer relay-token"))
        .and(body_json(serde_json::json!({ "text": "Bitcoin rallies #BTC" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": "1857" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = publisher(&server.uri())
        .post("Bitcoin rallies #BTC", None)
        .await
        .expect("post should succeed");
    assert_eq!(id.0, "1857");
}

#[tokio::test]
async fn image_is_uploaded_before_posting() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/media"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "media_id": "m-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(serde_json::json!({ "text": "with image", "media_ids": ["m-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "42" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = publisher(&server.uri())
        .post("with image", Some(&[0xFF, 0xD8, 0xFF][..]))
        .await
        .expect("post should succeed");
    assert_eq!(id.0, "42");
}

#[tokio::test]
async fn failed_upload_still_posts_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/media"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(serde_json::json!({ "text": "fallback" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "7" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = publisher(&server.uri())
        .post("fallback", Some(&[1u8, 2, 3][..]))
        .await
        .expect("text post should still succeed");
    assert_eq!(id.0, "7");
}

#[tokio::test]
async fn rejected_post_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(403).set_body_string("duplicate content"))
        .mount(&server)
        .await;

    let err = publisher(&server.uri()).post("dup", None).await.unwrap_err();
    assert!(
        matches!(err, PublishError::Rejected { status: 403, ref message } if message == "duplicate content"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_post_response_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let err = publisher(&server.uri()).post("hi", None).await.unwrap_err();
    assert!(matches!(err, PublishError::InvalidResponse(_)), "got: {err:?}");
}

#[tokio::test]
async fn unreachable_relay_is_a_transport_error() {
    let err = publisher("http://127.0.0.1:9")
        .post("hi", None)
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn image_search_downloads_a_result() {
    let server = MockServer::start().await;
    let image_url = format!("{}/photos/one.jpg", server.uri());

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .and(query_param("query", "bitcoin"))
        .and(query_param("orientation", "landscape"))
        .and(query_param("per_page", "10"))
        .and(header("authorization", "Client-ID access-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total": 1,
            "results": [{ "id": "abc", "urls": { "regular": image_url, "small": "ignored" } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos/one.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .mount(&server)
        .await;

    let bytes = image_search(&server.uri())
        .find("bitcoin")
        .await
        .expect("search should succeed");
    assert_eq!(bytes, Some(vec![0xFF, 0xD8, 0xFF, 0xE0]));
}

#[tokio::test]
async fn image_search_without_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "total": 0, "results": [] })),
        )
        .mount(&server)
        .await;

    let found = image_search(&server.uri()).find("nft blockchain").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn image_search_status_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = image_search(&server.uri()).find("bitcoin").await.unwrap_err();
    assert!(matches!(err, ImageError::Status(401)), "got: {err:?}");
}

#[tokio::test]
async fn failed_download_is_reported() {
    let server = MockServer::start().await;
    let image_url = format!("{}/photos/gone.jpg", server.uri());

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "urls": { "regular": image_url } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = image_search(&server.uri()).find("bitcoin").await.unwrap_err();
    assert!(matches!(err, ImageError::Status(404)), "got: {err:?}");
}
