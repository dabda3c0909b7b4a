//! Admin REST API implementation of the accessor traits.
//!
//! Every call is a single awaited HTTP request; nothing is cached between
//! calls, so each lookup observes the current remote state.

mod auth;
mod client;
mod group;
mod role;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RemoteError, RemoteResult};

pub use auth::Credentials;

/// Connection settings for [`AdminClient`].
#[derive(Debug, Clone)]
pub struct AdminClientConfig {
    /// Server URL (e.g., http://localhost:8080).
    pub server_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Credentials used to obtain an access token.
    pub credentials: Credentials,
}

/// Client for the admin REST API of one server.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl AdminClient {
    /// Authenticates against the server and returns a ready client.
    pub async fn connect(config: &AdminClientConfig) -> RemoteResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let base_url = config.server_url.trim_end_matches('/').to_string();

        let access_token = auth::fetch_token(&http, &base_url, &config.credentials).await?;
        tracing::debug!(server = %base_url, "Obtained admin access token");

        Ok(Self {
            http,
            base_url,
            access_token,
        })
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of a realm-relative admin resource.
    fn realm_url(&self, realm: &str, path: &str) -> String {
        format!(
            "{}/admin/realms/{}{}",
            self.base_url,
            urlencoding::encode(realm),
            path
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// Makes a GET request.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> RemoteResult<T> {
        tracing::trace!(%url, "GET");
        let response = self.request(Method::GET, url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(rejection(format!("GET {url}"), response).await)
        }
    }

    /// Makes a GET request where 404 means absence.
    async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> RemoteResult<Option<T>> {
        self.get_unless(url, &[StatusCode::NOT_FOUND]).await
    }

    /// Makes a GET request, mapping the given statuses to `None`.
    async fn get_unless<T: DeserializeOwned>(
        &self,
        url: &str,
        absent: &[StatusCode],
    ) -> RemoteResult<Option<T>> {
        tracing::trace!(%url, "GET");
        let response = self.request(Method::GET, url).send().await?;
        let status = response.status();

        if absent.contains(&status) {
            Ok(None)
        } else if status.is_success() {
            Ok(Some(response.json().await?))
        } else {
            Err(rejection(format!("GET {url}"), response).await)
        }
    }

    /// Makes a creating POST request.
    ///
    /// Any status above 201 is a rejection. Returns the trailing segment of
    /// the `Location` header, which is the identifier of the new entity.
    async fn post_created<B: Serialize + Sync + ?Sized>(
        &self,
        operation: String,
        url: &str,
        body: &B,
    ) -> RemoteResult<Option<String>> {
        tracing::trace!(%url, "POST");
        let response = self.request(Method::POST, url).json(body).send().await?;

        if response.status().as_u16() > 201 {
            return Err(rejection(operation, response).await);
        }

        Ok(response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| location.rsplit('/').next())
            .map(ToString::to_string))
    }

    /// Makes a request whose response body is ignored.
    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        operation: String,
        url: &str,
        body: Option<&B>,
    ) -> RemoteResult<()> {
        tracing::trace!(%url, %method, "request");
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(operation, response).await)
        }
    }
}

/// Converts a refused response into a rejection error.
///
/// Uses the server's `errorMessage` when present, the status reason phrase
/// otherwise.
async fn rejection(operation: String, response: Response) -> RemoteError {
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ErrorBody {
        error_message: Option<String>,
        error: Option<String>,
    }

    let status = response.status();
    let phrase = status.canonical_reason().unwrap_or("Unknown error").to_string();
    let reason = match response.json::<ErrorBody>().await {
        Ok(body) => body.error_message.or(body.error).unwrap_or(phrase),
        Err(_) => phrase,
    };

    RemoteError::rejected(operation, status.as_u16(), reason)
}

/// Encodes each segment of a group path for use in a URL.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
