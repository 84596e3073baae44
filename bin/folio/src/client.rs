//! GraphQL transport.
//!
//! Posts a prepared payload and hands back the raw response body; decoding
//! is left to [`folio_core::ResponseDecoder`]. Also fetches remote profiles.

use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::settings::ApiSettings;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Minimal client for a single GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GraphQlClient {
    /// Create a client with the given request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .wrap_err("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// Create a client from API settings.
    pub fn from_settings(api: &ApiSettings) -> Result<Self> {
        Self::new(
            api.endpoint.clone(),
            api.token.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    /// Endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a JSON payload and return the response body.
    pub async fn post(&self, payload: Vec<u8>) -> Result<Vec<u8>> {
        tracing::debug!(endpoint = %self.endpoint, bytes = payload.len(), "sending query");

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .wrap_err_with(|| format!("Request to {} failed", self.endpoint))?;

        let body = read_success(response, &self.endpoint).await?;
        tracing::debug!(bytes = body.len(), "received response");
        Ok(body)
    }

    /// Fetch a plain-text document, such as a remote profile.
    ///
    /// Uses the same timeout as queries. No authorization header is sent.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!(%url, "fetching document");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .wrap_err_with(|| format!("Request to {url} failed"))?;

        let body = read_success(response, url).await?;
        String::from_utf8(body).wrap_err_with(|| format!("{url} returned invalid UTF-8"))
    }
}

/// Read the body, failing on a non-2xx status.
async fn read_success(response: reqwest::Response, url: &str) -> Result<Vec<u8>> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .wrap_err("Failed to read response body")?;

    if !status.is_success() {
        let preview: String = String::from_utf8_lossy(&body).chars().take(200).collect();
        bail!("{url} returned {status}: {preview}");
    }

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;

    fn client(server: &MockServer) -> GraphQlClient {
        GraphQlClient::new(
            format!("{}/graphql", server.uri()),
            "t0ken",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_post_sends_bearer_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "bearer t0ken"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "query": "query { viewer { login } }" })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let payload = br#"{"query":"query { viewer { login } }"}"#.to_vec();
        let body = client(&server).post(payload).await.unwrap();

        assert_eq!(body, br#"{"data":{}}"#.to_vec());
    }

    #[tokio::test]
    async fn test_post_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;

        let err = client(&server).post(b"{}".to_vec()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Bad credentials"));
    }

    #[tokio::test]
    async fn test_get_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_string("octocat\n"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = client(&server);
        let text = client
            .get_text(&format!("{}/profile", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "octocat\n");

        let err = client
            .get_text(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_from_settings() {
        let api = ApiSettings::default();
        let client = GraphQlClient::from_settings(&api).unwrap();
        assert_eq!(client.endpoint(), "https://api.github.com/graphql");
    }
}
