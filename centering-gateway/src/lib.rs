//! Client for the centering analysis backend.
//!
//! The backend accepts `POST {"text": "..."}` and answers with one of the
//! payload shapes understood by [`centering_view::parse_response`]. Failures
//! are reported as `{"error": "..."}` with a non-2xx status.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use centering_view::{parse_response, AnalysisPayload, GatewayError, GatewayResult, GatewaySettings};

/// Something that can analyze a discourse.
///
/// One call per submission; implementations do not retry.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn analyze(&self, text: &str) -> GatewayResult<AnalysisPayload>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// [`AnalysisGateway`] over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: String,
    timeout_ms: u128,
}

impl HttpGateway {
    pub fn new(settings: GatewaySettings) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint,
            timeout_ms: settings.timeout.as_millis(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::network(format!("request timed out after {} ms", self.timeout_ms))
        } else {
            GatewayError::Network {
                status: err.status().map(|s| s.as_u16()),
                detail: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl AnalysisGateway for HttpGateway {
    async fn analyze(&self, text: &str) -> GatewayResult<AnalysisPayload> {
        debug!(url = %self.endpoint, chars = text.len(), "requesting analysis");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let detail = match serde_json::from_slice::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error,
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            warn!(status = status.as_u16(), detail = %detail, "analysis request failed");
            return Err(GatewayError::Network {
                status: Some(status.as_u16()),
                detail: format!("backend returned {}: {}", status, detail),
            });
        }

        let payload = parse_response(&body)?;
        info!(
            sentences = payload.results.len(),
            shape = ?payload.shape,
            "analysis received"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests;
