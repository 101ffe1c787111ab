// src/error.rs
//! Error taxonomy for chain submission
//!
//! `Input`, `Parse` and `Config` are run-level: they are raised before any
//! submission starts and abort the run. Every other variant is scoped to a
//! single log and ends up in that log's [`crate::report::SubmissionOutcome`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Missing or unusable PEM file or output directory
    #[error("{0}")]
    Input(String),

    /// No certificate could be taken from the PEM input
    #[error("failed to parse certificate chain: {0}")]
    Parse(String),

    /// Invalid log registry or configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Connection failure or timeout talking to a log
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The log answered with something other than 200 OK
    #[error("log returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The log's response could not be decoded into an SCT
    #[error("malformed add-chain response: {0}")]
    Protocol(String),

    /// The SCT does not fit the RFC 6962 binary layout
    #[error("cannot encode SCT: {0}")]
    Encoding(String),

    /// Writing the SCT file failed
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A submission task panicked or was cancelled
    #[error("submission task failed: {0}")]
    Task(String),
}

impl SubmitError {
    /// Short, stable label used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Input(_) => "input",
            SubmitError::Parse(_) => "parse",
            SubmitError::Config(_) => "config",
            SubmitError::Network { .. } => "network",
            SubmitError::Server { .. } => "server",
            SubmitError::Protocol(_) => "protocol",
            SubmitError::Encoding(_) => "encoding",
            SubmitError::Io { .. } => "io",
            SubmitError::Task(_) => "task",
        }
    }

    /// Whether this error aborts the whole run rather than a single submission
    pub fn is_run_level(&self) -> bool {
        matches!(
            self,
            SubmitError::Input(_) | SubmitError::Parse(_) | SubmitError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SubmitError>;
