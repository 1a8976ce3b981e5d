//! End-to-end tests through a real listener.

use fragment_router::config::ServerConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_healthz_returns_plain_text() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let res = common::client().get(server.url("/healthz")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_path_param_is_decoded() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let res = common::client().get(server.url("/user/5")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"id": 5, "name": "Ada"}));
}

#[tokio::test]
async fn test_bad_path_param_is_400() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let res = common::client().get(server.url("/user/dog")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().starts_with("params:"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let client = common::client();

    let res = client.get(server.url("/nothing/here")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "Not Found");

    let res = client.delete(server.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_body_is_validated_and_trimmed() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let client = common::client();

    let res = client
        .post(server.url("/user"))
        .json(&json!({"id": 7, "name": "Grace", "admin": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"id": 7, "name": "Grace"}));

    let res = client
        .post(server.url("/user"))
        .json(&json!({"id": "seven"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().starts_with("body:"));
}

#[tokio::test]
async fn test_repeated_query_keys_collect() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let client = common::client();

    let res = client.get(server.url("/search?tag=a&tag=b%20c")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!(["a", "b c"]));

    let res = client.get(server.url("/search")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_swagger_document_is_served() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let res = common::client().get(server.url("/swagger.json")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["openapi"], json!("3.0.0"));
    assert_eq!(doc["info"]["title"], json!("Users"));
    assert_eq!(
        doc["paths"]["/user/{id}"]["get"]["parameters"][0]["name"],
        json!("id")
    );
    assert_eq!(
        doc["paths"]["/user"]["post"]["requestBody"]["content"]["application/json"]["schema"],
        json!({"$ref": "#/components/schemas/User"})
    );
    assert!(doc["components"]["schemas"]["User"].is_object());
    assert!(doc["components"]["schemas"]["HealthzResponse"].is_object());
}

#[tokio::test]
async fn test_request_id_round_trip() {
    let server = common::start_server(ServerConfig::default(), common::user_table()).await;
    let client = common::client();

    let res = client
        .get(server.url("/healthz"))
        .header("x-request-id", "test-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "test-42");

    let res = client.get(server.url("/healthz")).send().await.unwrap();
    assert!(!res.headers()["x-request-id"].is_empty());
}

#[tokio::test]
async fn test_body_limit_from_config() {
    let mut config = ServerConfig::default();
    config.limits.max_body_size = 16;
    let server = common::start_server(config, common::user_table()).await;

    let res = common::client()
        .post(server.url("/user"))
        .json(&json!({"id": 1, "name": "a name long enough to overflow"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
