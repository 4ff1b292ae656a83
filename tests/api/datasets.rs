use fabric_deploy::api::{self, DatasetOperation, PowerBiClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PowerBiClient {
    let http = api::http_client(Duration::from_secs(5)).unwrap();
    PowerBiClient::new(server.uri(), "test-token", http)
}

#[tokio::test]
async fn lists_dataset_ids_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/myorg/groups/ws-1/datasets"))
        .and(header("authorization", "Bearer test-token"))
        .and(header_exists("x-ms-client-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.context": "http://wabi/v1.0/myorg/groups/ws-1/$metadata#datasets",
            "value": [
                { "id": "a", "name": "Sales" },
                { "id": "b", "name": "Finance" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = client(&server).list_datasets_ids("ws-1").await;

    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn listing_failure_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/myorg/groups/ws-1/datasets"))
        .respond_with(ResponseTemplate::new(404).set_body_string("PowerBIEntityNotFound"))
        .mount(&server)
        .await;

    let ids = client(&server).list_datasets_ids("ws-1").await;

    assert!(ids.is_empty());
}

#[tokio::test]
async fn unreachable_host_yields_empty_list() {
    let http = api::http_client(Duration::from_secs(1)).unwrap();
    let client = PowerBiClient::new("http://127.0.0.1:9", "test-token", http);

    assert!(client.list_datasets_ids("ws-1").await.is_empty());
}

#[tokio::test]
async fn take_over_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1.0/myorg/groups/ws-1/datasets/a/Default.TakeOver"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).take_over("ws-1", "a").await;

    assert!(result.is_success());
    assert_eq!(result.operation, DatasetOperation::take_over("a"));
    assert_eq!(result.status_code, Some(200));
}

#[tokio::test]
async fn take_over_failure_is_captured_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1.0/myorg/groups/ws-1/datasets/a/Default.TakeOver"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized for dataset"))
        .mount(&server)
        .await;

    let result = client(&server).take_over("ws-1", "a").await;

    assert!(result.is_error());
    assert_eq!(result.status_code, Some(403));
    assert_eq!(result.error.as_deref(), Some("Unauthorized for dataset"));
}

#[tokio::test]
async fn bind_posts_cloud_connection_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1.0/myorg/groups/ws-1/datasets/a/Default.BindToGateway"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "gatewayObjectId": "a",
            "datasourceObjectIds": ["conn-1"]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).bind_to_gateway("ws-1", "a", "conn-1").await;

    assert!(result.is_success());
    assert_eq!(result.status_code, Some(201));
}

#[tokio::test]
async fn bind_failure_is_captured_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1.0/myorg/groups/ws-1/datasets/a/Default.BindToGateway"))
        .respond_with(ResponseTemplate::new(400).set_body_string("DMTS_DatasourceNotFound"))
        .mount(&server)
        .await;

    let result = client(&server).bind_to_gateway("ws-1", "a", "conn-1").await;

    assert!(result.is_error());
    assert_eq!(result.status_code, Some(400));
    assert!(result.error.unwrap().contains("DMTS_DatasourceNotFound"));
}
