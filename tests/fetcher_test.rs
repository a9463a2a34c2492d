//! Integration tests for the single-request transport.

mod common;

use changelog_gen::error::ApiError;
use changelog_gen::github::{Fetcher, Request};
use http::{HeaderMap, HeaderValue};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::MockStruct;

fn request(server: &MockServer) -> Request {
    let mut headers = HeaderMap::new();
    headers.insert("headerkey", HeaderValue::from_static("value"));
    Request::new(format!("{}/thing", server.uri()))
        .param("q", "v")
        .headers(headers)
}

#[tokio::test]
async fn test_sends_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/thing"))
        .and(query_param("q", "v"))
        .and(header("headerkey", "value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "Hello" })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&server.uri()).unwrap();
    let result: MockStruct = fetcher.fetch(&request(&server)).await.unwrap();

    assert_eq!(result, MockStruct { value: "Hello".to_string() });
}

#[tokio::test]
async fn test_decoding_error_names_missing_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/thing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "somethingelse": "Hello" })),
        )
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&server.uri()).unwrap();
    let result = fetcher.fetch::<MockStruct>(&request(&server)).await;

    match result {
        Err(ApiError::Decoding(e)) => assert!(e.to_string().contains("value"), "{}", e),
        other => panic!("Expected decoding error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/thing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&server.uri()).unwrap();
    let result = fetcher.fetch::<MockStruct>(&request(&server)).await;

    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn test_other_status_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/thing"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&server.uri()).unwrap();
    let result = fetcher.fetch::<MockStruct>(&request(&server)).await;

    assert!(matches!(result, Err(ApiError::Unknown { status: 500 })));
}

#[tokio::test]
async fn test_malformed_url() {
    let server = MockServer::start().await;
    let fetcher = Fetcher::new(&server.uri()).unwrap();

    let result = fetcher.fetch::<MockStruct>(&Request::new("::not a url::")).await;

    assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    // Nothing listens on port 1.
    let fetcher = Fetcher::new("http://127.0.0.1:1").unwrap();

    let result = fetcher
        .fetch::<MockStruct>(&Request::new("http://127.0.0.1:1/thing"))
        .await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
}
