// src/ct_log/client.rs
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::sct::SignedCertificateTimestamp;
use super::types::{AddChainResponse, CtLogProvider};
use crate::error::{Result, SubmitError};

pub const ADD_CHAIN_PATH: &str = "ct/v1/add-chain";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a single CT log's add-chain endpoint
pub struct CtLogClient {
    add_chain_url: Url,
    http_client: reqwest::Client,
}

impl CtLogClient {
    /// Create a client for `provider`, with `timeout` bounding each whole request
    pub fn new(provider: &CtLogProvider, timeout: Duration) -> Result<Self> {
        let add_chain_url = add_chain_url(&provider.url)?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| SubmitError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            add_chain_url,
            http_client,
        })
    }

    pub fn add_chain_url(&self) -> &Url {
        &self.add_chain_url
    }

    /// Submit a chain
    /// Endpoint: POST {base_url}/ct/v1/add-chain
    pub async fn add_chain(&self, payload: Vec<u8>) -> Result<SignedCertificateTimestamp> {
        debug!("Submitting chain to {}", self.add_chain_url);

        let network_error = |source| SubmitError::Network {
            url: self.add_chain_url.to_string(),
            source,
        };

        let response = self
            .http_client
            .post(self.add_chain_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(server_error(status, response.text().await));
        }

        let body = response.bytes().await.map_err(network_error)?;

        let decoded: AddChainResponse = serde_json::from_slice(&body)
            .map_err(|e| SubmitError::Protocol(format!("invalid JSON body: {}", e)))?;

        debug!(
            "SCT received from {}: version={}, timestamp={}",
            self.add_chain_url, decoded.sct_version, decoded.timestamp
        );

        SignedCertificateTimestamp::try_from(decoded)
    }
}

/// Build a `Server` error, keeping the reason when the body could not be read
fn server_error<E: std::fmt::Display>(
    status: StatusCode,
    body: std::result::Result<String, E>,
) -> SubmitError {
    let body = match body {
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {}>", e),
    };

    SubmitError::Server {
        status: status.as_u16(),
        body,
    }
}

/// Resolve the add-chain endpoint beneath a log's base URL
///
/// A base URL without a trailing slash is treated as a directory, so
/// `https://log.example/2025h1` and `https://log.example/2025h1/` resolve
/// to the same endpoint.
pub fn add_chain_url(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| SubmitError::Config(format!("invalid log URL '{}': {}", base_url, e)))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(SubmitError::Config(format!(
            "log URL '{}' must use http or https",
            base_url
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(ADD_CHAIN_PATH)
        .map_err(|e| SubmitError::Config(format!("invalid log URL '{}': {}", base_url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_chain_url_with_trailing_slash() {
        let url = add_chain_url("https://ct.googleapis.com/logs/argon2018/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ct.googleapis.com/logs/argon2018/ct/v1/add-chain"
        );
    }

    #[test]
    fn test_add_chain_url_without_trailing_slash() {
        let url = add_chain_url("https://ct.googleapis.com/logs/argon2018").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ct.googleapis.com/logs/argon2018/ct/v1/add-chain"
        );
    }

    #[test]
    fn test_add_chain_url_host_only() {
        let url = add_chain_url("https://mammoth.ct.comodo.com").unwrap();
        assert_eq!(url.as_str(), "https://mammoth.ct.comodo.com/ct/v1/add-chain");
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            add_chain_url("logs/argon2018/"),
            Err(SubmitError::Config(_))
        ));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        assert!(matches!(
            add_chain_url("ftp://log.example/"),
            Err(SubmitError::Config(_))
        ));
    }

    #[test]
    fn test_server_error_keeps_body() {
        let err = server_error::<String>(StatusCode::BAD_REQUEST, Ok("bad chain".to_string()));
        assert!(matches!(
            err,
            SubmitError::Server { status: 400, ref body } if body == "bad chain"
        ));
    }

    #[test]
    fn test_server_error_with_unreadable_body() {
        let err = server_error(StatusCode::BAD_GATEWAY, Err("connection reset"));
        match err {
            SubmitError::Server { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "<unreadable body: connection reset>");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn test_client_creation() {
        let provider = CtLogProvider::new("test", "", "https://log.example/");
        let client = CtLogClient::new(&provider, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.add_chain_url().as_str(),
            "https://log.example/ct/v1/add-chain"
        );
    }
}
