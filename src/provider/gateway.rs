//! Endpoint-fallback gateway to the facial-analysis provider
//!
//! One detect call walks an ordered list of regional endpoints. Every
//! reply is classified before deciding whether to fall through to the
//! next region, back off first, or fail fast. Infrastructure problems
//! (HTML error pages, non-JSON bodies, credential rejections, socket
//! errors) are worth trying elsewhere; semantic rejections are not,
//! since no region will answer differently for the same image.

use std::time::Duration;

use tracing::{debug, warn};

use super::transport::{DetectTransport, HttpReply, TransportError};
use super::types::DetectResponse;
use crate::config::ProviderConfig;
use crate::error::AnalysisError;

/// Attribute blocks requested from the provider
const RETURN_ATTRIBUTES: &str = "age,gender,emotion,beauty,skinstatus";

/// Provider error markers that indicate a credential problem. These are
/// retried on the next region in case only one is misconfigured.
const AUTH_ERROR_MARKERS: [&str; 5] = [
    "AUTHORIZATION_ERROR",
    "AUTHENTICATION_ERROR",
    "Invalid API Key",
    "api_key",
    "api_secret",
];

const RATE_LIMIT_MARKER: &str = "CONCURRENCY_LIMIT_EXCEEDED";

/// Why a single endpoint attempt produced no usable response
#[derive(Debug, Clone)]
enum EndpointFailure {
    /// The provider edge served an HTML error page
    HtmlPage { status: u16, title: Option<String> },
    /// Reply content type was not JSON
    NonJson { content_type: String },
    /// Body claimed to be JSON but did not parse
    Malformed { detail: String },
    /// This region rejected the credentials
    Auth { message: String },
    /// Socket-level failure
    Network { detail: String },
    /// The attempt exceeded the configured timeout
    Timeout,
}

/// Outcome of classifying one reply
enum Classified {
    Success(DetectResponse),
    NextEndpoint(EndpointFailure),
    Fatal(AnalysisError),
}

pub struct FaceppGateway<T: DetectTransport> {
    transport: T,
    config: ProviderConfig,
}

impl<T: DetectTransport> FaceppGateway<T> {
    pub fn new(transport: T, config: ProviderConfig) -> Self {
        Self { transport, config }
    }

    /// Run the detect call with endpoint fallback.
    ///
    /// A successful response is guaranteed to contain at least one face.
    pub async fn detect(&self, image_base64: &str) -> Result<DetectResponse, AnalysisError> {
        if self.config.api_key.is_empty() || self.config.api_secret.is_empty() {
            return Err(AnalysisError::CredentialsMissing);
        }

        let form = [
            ("api_key", self.config.api_key.as_str()),
            ("api_secret", self.config.api_secret.as_str()),
            ("image_base64", image_base64),
            ("return_attributes", RETURN_ATTRIBUTES),
        ];

        let mut last_failure: Option<EndpointFailure> = None;

        for endpoint in &self.config.endpoints {
            debug!("Trying detect endpoint: {}", endpoint);

            let reply = match self.transport.post_form(endpoint, &form).await {
                Ok(reply) => reply,
                Err(TransportError::Timeout) => {
                    warn!("Detect attempt timed out: {}", endpoint);
                    last_failure = Some(EndpointFailure::Timeout);
                    continue;
                }
                Err(TransportError::Network(detail)) => {
                    warn!("Detect attempt failed: {} ({})", endpoint, detail);
                    last_failure = Some(EndpointFailure::Network { detail });
                    continue;
                }
            };

            match classify_reply(&reply) {
                Classified::Success(response) => {
                    if response.faces.is_empty() {
                        return Err(AnalysisError::NoFaceDetected);
                    }
                    debug!(
                        "Detect succeeded on {} ({} face(s))",
                        endpoint,
                        response.faces.len()
                    );
                    return Ok(response);
                }
                Classified::Fatal(err) => return Err(err),
                Classified::NextEndpoint(failure) => {
                    match &failure {
                        EndpointFailure::HtmlPage { status, title } => {
                            warn!(
                                "Endpoint {} served an HTML page (status {}, title {:?})",
                                endpoint, status, title
                            );
                            if *status >= 500 && self.config.retry_backoff_secs > 0 {
                                tokio::time::sleep(Duration::from_secs(
                                    self.config.retry_backoff_secs,
                                ))
                                .await;
                            }
                        }
                        EndpointFailure::NonJson { content_type } => {
                            warn!(
                                "Endpoint {} returned non-JSON content type: {}",
                                endpoint, content_type
                            );
                        }
                        EndpointFailure::Malformed { detail } => {
                            warn!("Endpoint {} returned unparseable JSON: {}", endpoint, detail);
                        }
                        EndpointFailure::Auth { message } => {
                            warn!("Endpoint {} rejected credentials: {}", endpoint, message);
                        }
                        EndpointFailure::Network { .. } | EndpointFailure::Timeout => {}
                    }
                    last_failure = Some(failure);
                }
            }
        }

        Err(summarize_exhaustion(last_failure))
    }
}

/// Classify one reply into success, retry-on-next-endpoint, or fatal
fn classify_reply(reply: &HttpReply) -> Classified {
    let head = reply.body.trim_start();
    if head.starts_with("<!") || head.starts_with("<html") {
        return Classified::NextEndpoint(EndpointFailure::HtmlPage {
            status: reply.status,
            title: html_title(&reply.body),
        });
    }

    if !reply.content_type.contains("application/json") {
        return Classified::NextEndpoint(EndpointFailure::NonJson {
            content_type: reply.content_type.clone(),
        });
    }

    let response: DetectResponse = match serde_json::from_str(&reply.body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Classified::NextEndpoint(EndpointFailure::Malformed {
                detail: e.to_string(),
            })
        }
    };

    if let Some(message) = &response.error_message {
        if AUTH_ERROR_MARKERS.iter().any(|m| message.contains(m)) {
            return Classified::NextEndpoint(EndpointFailure::Auth {
                message: message.clone(),
            });
        }
        if message.contains(RATE_LIMIT_MARKER) {
            return Classified::Fatal(AnalysisError::RateLimited);
        }
        return Classified::Fatal(AnalysisError::Provider(message.clone()));
    }

    Classified::Success(response)
}

/// Collapse the last recorded failure into the error the caller sees
fn summarize_exhaustion(last: Option<EndpointFailure>) -> AnalysisError {
    match last {
        Some(EndpointFailure::HtmlPage { .. }) => AnalysisError::ProviderUnavailable,
        Some(EndpointFailure::NonJson { .. }) | Some(EndpointFailure::Malformed { .. }) => {
            AnalysisError::UnexpectedResponse
        }
        Some(EndpointFailure::Auth { .. }) => AnalysisError::AuthenticationFailed,
        Some(EndpointFailure::Timeout) => AnalysisError::ProviderTimeout,
        Some(EndpointFailure::Network { detail }) => AnalysisError::Provider(detail),
        None => AnalysisError::Provider("Face analysis request failed".to_string()),
    }
}

/// Pull the <title> text out of an HTML error page for logging
fn html_title(body: &str) -> Option<String> {
    let lower = body.to_lowercase();
    let open = lower.find("<title>")?;
    let start = open + "<title>".len();
    let end = lower[start..].find("</title>")? + start;
    // Offsets come from the lowercased copy; index the original leniently
    let title = body.get(start..end)?.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
