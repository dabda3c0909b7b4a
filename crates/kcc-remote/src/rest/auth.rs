//! Access token acquisition.

use serde::Deserialize;

use crate::error::{RemoteError, RemoteResult};

/// Credentials for the resource owner password grant.
#[derive(Clone)]
pub struct Credentials {
    /// Realm the user logs into (usually "master").
    pub login_realm: String,
    /// Public client used for the grant (usually "admin-cli").
    pub client_id: String,
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login_realm", &self.login_realm)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token endpoint response. Only the access token is used.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Requests an access token with the password grant.
pub(super) async fn fetch_token(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> RemoteResult<String> {
    let url = format!(
        "{}/realms/{}/protocol/openid-connect/token",
        base_url,
        urlencoding::encode(&credentials.login_realm)
    );

    let body = [
        ("grant_type", "password"),
        ("client_id", credentials.client_id.as_str()),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ]
    .iter()
    .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
    .collect::<Vec<_>>()
    .join("&");

    let response = http
        .post(&url)
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(RemoteError::Auth(format!(
            "token request for '{}' failed with {}: {}",
            credentials.username, status, message
        )));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}
