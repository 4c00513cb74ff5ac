//! Network transport for the remote backend.
//!
//! # Responsibilities
//! - Deliver batches of entries to the logging API
//! - Release the client on close
//!
//! # Design Decisions
//! - `Transport` is the seam to the logging service; tests substitute their
//!   own implementation
//! - No retries: a failed batch is reported once and dropped
//! - Credentials are a pre-issued bearer token read from the credentials
//!   path; token acquisition belongs to the deployment

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use thiserror::Error;

use crate::backend::remote::entry::WriteRequest;
use crate::backend::remote::RemoteConfig;

/// Errors from the remote transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be sent or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the request.
    #[error("cloud logging returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The credentials file could not be read or is not a valid token.
    #[error("failed to read credentials '{path}': {source}")]
    Credentials {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The backend was closed before the entry was submitted.
    #[error("remote logger is closed")]
    Closed,

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Delivery of write requests to a logging service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit one batch.
    async fn write(&self, request: &WriteRequest) -> Result<(), TransportError>;

    /// Release the underlying client.
    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// `entries:write` over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &RemoteConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        if let Some(path) = config.credentials_path.as_deref().filter(|p| !p.is_empty()) {
            let token = read_token(path)?;
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                TransportError::Credentials {
                    path: path.to_string(),
                    source: io::Error::new(io::ErrorKind::InvalidData, e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

fn read_token(path: &str) -> Result<String, TransportError> {
    let content = std::fs::read_to_string(path).map_err(|source| TransportError::Credentials {
        path: path.to_string(),
        source,
    })?;
    let token = content.trim();
    if token.is_empty() {
        return Err(TransportError::Credentials {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, "empty token"),
        });
    }
    Ok(token.to_string())
}

#[async_trait]
impl Transport for HttpTransport {
    async fn write(&self, request: &WriteRequest) -> Result<(), TransportError> {
        let res = self.client.post(&self.endpoint).json(request).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        tracing::trace!(entries = request.entries.len(), "Batch accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  ya29.token \n").unwrap();
        assert_eq!(read_token(path.to_str().unwrap()).unwrap(), "ya29.token");

        std::fs::write(&path, "\n").unwrap();
        assert!(read_token(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_credentials_file() {
        let mut config = RemoteConfig::new("p", "l");
        config.credentials_path = Some("/nonexistent/token".to_string());
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, TransportError::Credentials { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let mut config = RemoteConfig::new("p", "l");
        config.endpoint = "http://127.0.0.1:1/v2/entries:write".to_string();
        config.request_timeout_secs = 2;
        let transport = HttpTransport::new(&config).unwrap();
        let request = WriteRequest {
            entries: Vec::new(),
            partial_success: true,
        };
        let err = transport.write(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
