// src/ct_log/types.rs
use serde::{Deserialize, Serialize};

use crate::chain::CertificateChain;

/// Body of an RFC 6962 add-chain request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddChainRequest {
    pub chain: Vec<String>,
}

impl AddChainRequest {
    pub fn new(chain: &CertificateChain) -> Self {
        Self {
            chain: chain.certificates().to_vec(),
        }
    }

    /// Canonical JSON encoding, `{"chain":[...]}`
    pub fn to_json(&self) -> Vec<u8> {
        // Serializing a struct of strings cannot fail
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Response from a log's add-chain endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddChainResponse {
    pub sct_version: u8,
    pub id: String,  // base64-encoded SHA-256 of the log's key
    pub timestamp: u64,
    pub extensions: String,  // base64, empty when the log sets none
    pub signature: String,  // base64-encoded digitally-signed struct
}

/// A CT log that chains are submitted to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtLogProvider {
    /// Unique name, also the stem of the SCT file name
    pub name: String,
    /// Base64 SubjectPublicKeyInfo of the log; recorded, not used for verification
    #[serde(default)]
    pub key: String,
    /// Base URL, `ct/v1/add-chain` is resolved relative to it
    pub url: String,
}

impl CtLogProvider {
    pub fn new(name: impl Into<String>, key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            url: url.into(),
        }
    }
}

/// Google's CT log list V3 format
#[derive(Debug, Serialize, Deserialize)]
pub struct LogListV3 {
    pub operators: Vec<Operator>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub logs: Vec<LogInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInfo {
    #[serde(default)]
    pub description: String,
    pub key: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub state: Option<StateWrapper>,
}

/// State wrapper that can contain different state types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateWrapper {
    #[serde(default)]
    pub usable: Option<StateTimestamp>,
    #[serde(default)]
    pub readonly: Option<StateTimestamp>,
    #[serde(default)]
    pub retired: Option<StateTimestamp>,
    #[serde(default)]
    pub rejected: Option<StateTimestamp>,
    #[serde(default)]
    pub qualified: Option<StateTimestamp>,
    #[serde(default)]
    pub pending: Option<StateTimestamp>,
}

impl StateWrapper {
    /// Log is accepting new submissions
    pub fn is_usable(&self) -> bool {
        self.usable.is_some() || self.qualified.is_some()
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly.is_some()
    }

    /// Check if log is acceptable to submit to
    pub fn is_acceptable(&self, include_readonly: bool) -> bool {
        self.is_usable() || (include_readonly && self.is_readonly())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTimestamp {
    pub timestamp: String,
}
