// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use catalog_client::error::CatalogError;
use catalog_client::models::search::{SearchRequest, SearchResponse};
use catalog_client::models::settings::ClientConfig;
use catalog_client::services::search::{HttpSearchTransport, SearchTransport};
use catalog_client::services::suggest::{HttpSuggestTransport, SuggestTransport};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// HTTP transports against a local mock catalog

fn request(phrase: &str) -> SearchRequest {
    SearchRequest {
        csrf_token: "csrf-token".to_string(),
        phrase: phrase.to_string(),
        from: 0,
        size: 8,
        search_type: "kw".to_string(),
    }
}

#[tokio::test]
async fn test_search_posts_form_and_decodes_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("phrase=jazz"))
        .and(body_string_contains("csrf_token=csrf-token"))
        .and(body_string_contains("size=8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "from": 8,
            "total": 1,
            "hits": [{"uuid": "a1", "title": "Kind of Blue"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpSearchTransport::new(&ClientConfig::new(server.uri())).unwrap();
    let response = transport.search(&request("jazz")).await.unwrap();

    assert_eq!(response.hit_count(), 1);
    assert!(matches!(response, SearchResponse::Page { total: 1, .. }));
}

#[tokio::test]
async fn test_search_error_body_is_application_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "error", "body": "Bad query"})),
        )
        .mount(&server)
        .await;

    let transport = HttpSearchTransport::new(&ClientConfig::new(server.uri())).unwrap();
    let response = transport.search(&request("(")).await.unwrap();

    assert_eq!(
        response,
        SearchResponse::Failure {
            message: "Bad query".to_string()
        }
    );
}

#[tokio::test]
async fn test_search_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = HttpSearchTransport::new(&ClientConfig::new(server.uri())).unwrap();
    let result = transport.search(&request("jazz")).await;

    assert!(matches!(result, Err(CatalogError::Transport(_))));
}

#[tokio::test]
async fn test_typeahead_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/typeahead"))
        .and(query_param("q", "moby"))
        .and(query_param("type", "Work"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"work": "Moby Dick", "uuid": "w1"}])),
        )
        .mount(&server)
        .await;

    let transport = HttpSuggestTransport::new(&ClientConfig::new(server.uri())).unwrap();
    let rows = transport
        .fetch("/typeahead?q=moby&type=Work")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), Some("w1"));
    assert_eq!(rows[0].type_key(), Some("work"));
}

#[tokio::test]
#[ignore] // Requires a running catalog at CATALOG_BASE_URL
async fn test_live_catalog_search() {
    let config = ClientConfig::from_env().unwrap();
    let transport = HttpSearchTransport::new(&config).unwrap();
    let response = transport.search(&request("whale")).await;
    assert!(response.is_ok(), "Live search failed: {:?}", response);
}
