use fabric_deploy::api::{self, constants};
use fabric_deploy::auth::Credentials;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> reqwest::Client {
    api::http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn returns_exact_access_token_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-id"))
        .and(body_string_contains("client_secret=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "eyJ0eXAi.token.value"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth_url = constants::token_endpoint(&server.uri(), "tenant-1");
    let token = api::get_access_token(&http(), "app-id", "s3cret", &auth_url, constants::POWERBI_SCOPE)
        .await
        .unwrap();

    assert_eq!(token.access_token, "eyJ0eXAi.token.value");
    assert!(token.expires_at > std::time::SystemTime::now());
}

#[tokio::test]
async fn non_200_fails_with_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"error":"invalid_client","error_description":"AADSTS7000215"}"#),
        )
        .mount(&server)
        .await;

    let auth_url = constants::token_endpoint(&server.uri(), "tenant-1");
    let err = api::get_access_token(&http(), "app-id", "wrong", &auth_url, constants::POWERBI_SCOPE)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("invalid_client"), "{}", message);
    assert!(message.contains("AADSTS7000215"), "{}", message);
}

#[tokio::test]
async fn other_success_codes_are_still_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let auth_url = constants::token_endpoint(&server.uri(), "tenant-1");
    let result = api::get_access_token(&http(), "app-id", "s3cret", &auth_url, constants::FABRIC_SCOPE).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn missing_token_field_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token_type": "Bearer" })))
        .mount(&server)
        .await;

    let auth_url = constants::token_endpoint(&server.uri(), "tenant-1");
    let err = api::get_access_token(&http(), "app-id", "s3cret", &auth_url, constants::FABRIC_SCOPE)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No access token"));
}

#[tokio::test]
async fn authenticate_requests_scope_for_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/oauth2/v2.0/token"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fanalysis.windows.net%2Fpowerbi%2Fapi%2F.default",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::new("contoso", "app-id", "s3cret");
    let token = api::authenticate(&http(), &credentials, &server.uri(), constants::POWERBI_SCOPE)
        .await
        .unwrap();

    assert_eq!(token.access_token, "tok");
}
