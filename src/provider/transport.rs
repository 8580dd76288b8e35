//! HTTP transport to the provider's detect endpoints
//!
//! The gateway talks through the `DetectTransport` trait so tests can
//! script replies without touching the network.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure, before any body classification
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

/// Raw reply envelope; the gateway classifies it
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

#[async_trait]
pub trait DetectTransport: Send + Sync {
    /// POST a form-encoded request and return the raw reply
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpReply, TransportError>;
}

/// reqwest-backed transport used in production
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DetectTransport for HttpTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpReply {
            status,
            content_type,
            body,
        })
    }
}

/// Scripted transport for tests: returns pre-loaded replies in order and
/// records which endpoints were called
pub struct FakeTransport {
    replies: Mutex<Vec<Result<HttpReply, TransportError>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new(replies: Vec<Result<HttpReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Endpoints hit so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DetectTransport for FakeTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        _form: &[(&str, &str)],
    ) -> Result<HttpReply, TransportError> {
        self.calls.lock().unwrap().push(endpoint.to_string());

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(TransportError::Network("no scripted reply".to_string()));
        }
        replies.remove(0)
    }
}
