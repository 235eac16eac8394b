//! Analysis service integration
//!
//! The orchestrator talks to the service through [`AnalysisService`] so the
//! transport can be swapped out (tests use a scripted in-memory service).
//! [`HttpAnalysisClient`] is the production implementation: one JSON `POST`
//! per request, with a body carrying only the candidate text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::models::AnalysisResult;
use crate::ServiceConfig;

/// Message shown for every service failure, whatever the cause
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Could not connect to the analysis service. Is it running?";

/// Ways a service call can fail.
///
/// The orchestrator collapses all of these into
/// [`CONNECTIVITY_ERROR_MESSAGE`]; the variants exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Host unreachable, connection reset, TLS failure, ...
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a usable analysis result
    #[error("malformed analysis payload: {0}")]
    Malformed(String),

    /// No answer within the configured timeout
    #[error("analysis request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

pub type AnalysisOutcome = std::result::Result<AnalysisResult, AnalysisError>;

/// Black-box strength scoring service
#[async_trait]
pub trait AnalysisService: Send + Sync + 'static {
    async fn analyze(&self, password: &str) -> AnalysisOutcome;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    password: &'a str,
}

/// HTTP client for the analysis service
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    endpoint: String,
    client: Client,
    timeout: Option<Duration>,
}

impl HttpAnalysisClient {
    /// Create a client for an endpoint with no request timeout
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            timeout: None,
        }
    }

    /// Create a client from configuration
    pub fn from_config(config: &ServiceConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| crate::Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            timeout: config.request_timeout(),
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, password: &str) -> AnalysisOutcome {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let result: AnalysisResult = serde_json::from_slice(&bytes)
            .map_err(|e| AnalysisError::Malformed(e.to_string()))?;
        result.validate().map_err(AnalysisError::Malformed)?;

        Ok(result)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, password: &str) -> AnalysisOutcome {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(password))
                .await
                .map_err(|_| AnalysisError::Timeout {
                    seconds: limit.as_secs(),
                })?,
            None => self.send(password).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "length": 11,
            "char_sets": ["lower", "upper", "digit"],
            "has_leetspeak": true,
            "entropy": 48.7,
            "crack_time": "4 hours",
            "verdict": "WEAK",
            "penalties": [],
            "recommendations": ["Use at least 14 characters"],
            "breached": false
        })
    }

    fn client_for(server: &MockServer) -> HttpAnalysisClient {
        HttpAnalysisClient::new(format!("{}/analyze", server.uri()))
    }

    #[tokio::test]
    async fn test_posts_password_and_parses_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .and(body_json(serde_json::json!({ "password": "Tr0ub4dor" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).analyze("Tr0ub4dor").await.unwrap();

        assert_eq!(result.verdict, Verdict::Weak);
        assert_eq!(result.length, 11);
        assert!(result.has_leetspeak);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("No password provided"))
            .mount(&server)
            .await;

        let err = client_for(&server).analyze("x").await.unwrap_err();

        match err {
            AnalysisError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "No password provided");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_verdict_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "entropy": 10.0 })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).analyze("x").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_negative_entropy_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "entropy": -3.0, "verdict": "WEAK" }),
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).analyze("x").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(payload())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).with_timeout(Some(Duration::from_millis(100)));
        let err = client.analyze("x").await.unwrap_err();

        assert!(matches!(err, AnalysisError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_zero_timeout_from_config_waits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(payload())
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let config = ServiceConfig {
            endpoint: format!("{}/analyze", server.uri()),
            request_timeout_secs: Some(0),
            ..ServiceConfig::default()
        };
        let client = HttpAnalysisClient::from_config(&config).unwrap();

        assert_eq!(client.timeout, None);
        assert_eq!(client.analyze("x").await.unwrap().verdict, Verdict::Weak);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpAnalysisClient::new(format!("http://127.0.0.1:{port}/analyze"));
        let err = client.analyze("x").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
    }
}
