use fabric_deploy::api::models::{CreateItemRequest, DefinitionPart};
use fabric_deploy::api::{self, FabricClient, ItemDefinition};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FabricClient {
    let http = api::http_client(Duration::from_secs(5)).unwrap();
    FabricClient::new(server.uri(), "fabric-token", http).with_polling(Duration::ZERO, 3)
}

fn notebook_request() -> CreateItemRequest {
    CreateItemRequest {
        display_name: "nb_process_data".to_string(),
        item_type: "Notebook".to_string(),
        definition: Some(ItemDefinition {
            parts: vec![DefinitionPart::inline_base64("notebook-content.py", "cHJpbnQoMSk=")],
        }),
    }
}

#[tokio::test]
async fn list_items_follows_continuation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/workspaces/ws/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "1", "displayName": "nb", "type": "Notebook" }],
            "continuationToken": "abc",
            "continuationUri": format!("{}/v1/workspaces/ws/items-page-2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/workspaces/ws/items-page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "2", "displayName": "lh", "type": "Lakehouse" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).list_items("ws").await.unwrap();

    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn create_item_sends_definition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws/items"))
        .and(body_partial_json(json!({
            "displayName": "nb_process_data",
            "type": "Notebook",
            "definition": {
                "parts": [{
                    "path": "notebook-content.py",
                    "payload": "cHJpbnQoMSk=",
                    "payloadType": "InlineBase64"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).create_item("ws", &notebook_request()).await.unwrap();
}

#[tokio::test]
async fn accepted_create_waits_for_operation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws/items"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/v1/operations/op-1", server.uri()).as_str())
                .insert_header("Retry-After", "0"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/operations/op-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).create_item("ws", &notebook_request()).await.unwrap();
}

#[tokio::test]
async fn failed_operation_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws/items/item-1/updateDefinition"))
        .and(query_param("updateMetadata", "True"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/v1/operations/op-2", server.uri()).as_str())
                .insert_header("Retry-After", "0"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/operations/op-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "error": { "errorCode": "InvalidDefinition", "message": "bad notebook" }
        })))
        .mount(&server)
        .await;

    let definition = ItemDefinition { parts: vec![] };
    let err = client(&server)
        .update_item_definition("ws", "item-1", definition)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("InvalidDefinition"), "{}", err);
}

#[tokio::test]
async fn operation_that_never_finishes_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws/items"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/v1/operations/op-3", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/operations/op-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Running" })))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).create_item("ws", &notebook_request()).await.unwrap_err();

    assert!(err.to_string().contains("did not complete after 3 polls"), "{}", err);
}

#[tokio::test]
async fn delete_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/workspaces/ws/items/item-9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("ItemNotFound"))
        .mount(&server)
        .await;

    let err = client(&server).delete_item("ws", "item-9").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("404"), "{}", message);
    assert!(message.contains("ItemNotFound"), "{}", message);
}
