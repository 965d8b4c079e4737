/*
[INPUT]:  HTTP configuration (base URL, timeouts, access token)
[OUTPUT]: Configured reqwest client issuing sidecar calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::{PmxtError, Result};
use crate::types::{HealthResponse, SidecarRequest, SidecarResponse};

/// Where the sidecar listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3847";
pub const DEFAULT_PORT: u16 = 3847;

/// Header carrying the token from the sidecar lock file.
pub const ACCESS_TOKEN_HEADER: &str = "x-pmxt-access-token";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the local pmxt sidecar
#[derive(Debug, Clone)]
pub struct SidecarClient {
    http_client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl SidecarClient {
    /// Create a new client against the default sidecar address
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client against an explicit sidecar address
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build request builder for a sidecar endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        let builder = self.http_client.request(method, url);
        Ok(match &self.access_token {
            Some(token) => builder.header(ACCESS_TOKEN_HEADER, token),
            None => builder,
        })
    }

    /// Send a request and decode a plain JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PmxtError::api_error(status, body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse> {
        let builder = self.request(Method::GET, "/health")?;
        self.send_json(builder).await
    }

    /// POST /api/{venue}/{method} and unwrap the `{ success, data, error }` envelope
    pub async fn call(&self, venue: &str, method: &str, body: &SidecarRequest) -> Result<Value> {
        let endpoint = format!("/api/{}/{}", venue, method);
        debug!(venue, method, args = body.args.len(), "sidecar call");

        let builder = self.request(Method::POST, &endpoint)?.json(body);
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // Failing status codes still carry the envelope when the sidecar produced them
        let envelope = match serde_json::from_str::<SidecarResponse>(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                warn!(venue, method, status = status.as_u16(), "sidecar call failed");
                return Err(PmxtError::api_error(status, text));
            }
            Err(err) => return Err(err.into()),
        };

        envelope.into_data().map_err(|message| {
            warn!(venue, method, status = status.as_u16(), %message, "sidecar reported failure");
            PmxtError::api_error(status, message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> SidecarClient {
        SidecarClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    #[tokio::test]
    async fn test_call_posts_args_and_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/polymarket/fetchOrderBook"))
            .and(header(ACCESS_TOKEN_HEADER, "secret"))
            .and(body_json(json!({ "args": ["123"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "bids": [], "asks": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await.with_access_token(Some("secret".to_string()));
        let data = client
            .call("polymarket", "fetchOrderBook", &SidecarRequest::new(vec![json!("123")]))
            .await
            .expect("call");

        assert_eq!(data, json!({ "bids": [], "asks": [] }));
    }

    #[tokio::test]
    async fn test_call_surfaces_envelope_error_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/kalshi/fetchBalance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Not authenticated"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .call("kalshi", "fetchBalance", &SidecarRequest::new(vec![]))
            .await
            .unwrap_err();

        match err {
            PmxtError::Api { message, .. } => assert_eq!(message, "Not authenticated"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_reads_envelope_from_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/kalshi/fetchOrder"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "error": { "message": "Order not found" }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .call("kalshi", "fetchOrder", &SidecarRequest::new(vec![json!("o-1")]))
            .await
            .unwrap_err();

        match err {
            PmxtError::Api { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "Order not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_keeps_raw_body_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .call("limitless", "fetchMarkets", &SidecarRequest::new(vec![]))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(err.to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let health = client(&server).await.health().await.expect("health");
        assert!(health.is_ok());
    }
}
