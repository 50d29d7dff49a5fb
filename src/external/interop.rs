use anyhow::Result;
use async_trait::async_trait;
use axum::http::Method;

/// What the adapter answered: relayed to the client verbatim.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Interop seam: hand the inbound request to an external message-processing
/// adapter and return whatever it produces. No logic of its own.
#[async_trait]
pub trait InteropForwarder: Send + Sync {
    async fn forward(&self, method: Method, body: Vec<u8>) -> Result<ForwardedResponse>;
}

/// Forwarder that relays over HTTP to the configured adapter endpoint.
pub struct HttpInteropForwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInteropForwarder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl InteropForwarder for HttpInteropForwarder {
    async fn forward(&self, method: Method, body: Vec<u8>) -> Result<ForwardedResponse> {
        let response = self
            .client
            .request(method, &self.endpoint)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}
