//! HTTP transport for the LearnHub REST API.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use learnhub_api_types::ApiErrorBody;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoints::ApiRequest;
use crate::error::ClientError;

/// Sends an [`ApiRequest`] and returns the decoded response envelope.
///
/// The cache only talks to the network through this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// JSON request; the returned value is the full envelope.
    async fn execute(&self, request: &ApiRequest) -> Result<Value, ClientError>;

    /// Raw body, for exports.
    async fn download(&self, request: &ApiRequest) -> Result<Bytes, ClientError>;
}

/// reqwest-backed [`Transport`] with optional bearer authentication.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base URL `{base_url}` cannot carry a path"
            )));
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("learnhub/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Base URL joined with the request's percent-encoded segments and query.
    pub fn url(&self, request: &ApiRequest) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ClientError::Configuration("base URL cannot carry a path".to_string())
            })?;
            segments.pop_if_empty();
            segments.extend(request.segments.iter());
        }
        url.set_query(None);
        if !request.query.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in &request.query {
                qp.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let url = self.url(request)?;
        debug!(method = %request.method, url = %url, "Sending API request");

        let mut req = self.client.request(request.method.clone(), url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let bytes = resp.bytes().await?;
        let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.best_message().map(str::to_owned))
            .unwrap_or_else(|| {
                let text = String::from_utf8_lossy(&bytes).trim().to_string();
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });
        warn!(%status, request = %request, error_message = %message, "API request failed");
        Err(ClientError::api(status, message))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<Value, ClientError> {
        let resp = self.send(request).await?;
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::json!({ "success": true }));
        }
        let envelope: Value =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::decode("response body", e))?;

        if envelope.get("success").and_then(Value::as_bool) == Some(false) {
            let message = envelope
                .get("message")
                .or_else(|| envelope.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("request was not successful");
            return Err(ClientError::rejected(message));
        }
        Ok(envelope)
    }

    async fn download(&self, request: &ApiRequest) -> Result<Bytes, ClientError> {
        let resp = self.send(request).await?;
        Ok(resp.bytes().await?)
    }
}
