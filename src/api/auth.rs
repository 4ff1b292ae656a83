use anyhow::Context;
use reqwest::StatusCode;
use std::time::{Duration, SystemTime};

use super::constants;
use super::models::{TokenInfo, TokenResponse};
use crate::auth::Credentials;

/// Request a token with the OAuth2 client-credentials grant.
///
/// Anything other than `200 OK` is an authentication failure carrying the
/// response body. Callers treat it as fatal.
pub async fn get_access_token(
    http: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    auth_url: &str,
    scope: &str,
) -> anyhow::Result<TokenInfo> {
    log::debug!("Requesting token from {} for scope {}", auth_url, scope);

    let response = http
        .post(auth_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", scope),
        ])
        .send()
        .await
        .with_context(|| format!("Failed to reach token endpoint {}", auth_url))?;

    let status = response.status();
    log::debug!("Token request status: {}", status);

    if status != StatusCode::OK {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Authentication failed ({}): {}", status, error_text);
    }

    let token_data: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token response")?;

    let Some(access_token) = token_data.access_token else {
        anyhow::bail!("No access token in response");
    };

    // Default to one hour when the endpoint omits expires_in
    let expires_in = token_data.expires_in.unwrap_or(3600);

    Ok(TokenInfo {
        access_token,
        expires_at: SystemTime::now() + Duration::from_secs(expires_in),
    })
}

/// Authenticate a service principal against its tenant for one API scope
pub async fn authenticate(
    http: &reqwest::Client,
    credentials: &Credentials,
    login_base: &str,
    scope: &str,
) -> anyhow::Result<TokenInfo> {
    log::info!(
        "Authenticating service principal {} in tenant {}",
        credentials.client_id,
        credentials.tenant_id
    );

    let auth_url = constants::token_endpoint(login_base, &credentials.tenant_id);
    let token = get_access_token(
        http,
        &credentials.client_id,
        &credentials.client_secret,
        &auth_url,
        scope,
    )
    .await?;

    log::info!("Successfully authenticated service principal {}", credentials.client_id);
    Ok(token)
}
