// src/ct_log/sct.rs
//! Signed Certificate Timestamps and their RFC 6962 binary form
//!
//! The on-disk layout is what nginx's `ssl_ct_static_scts` expects:
//!
//! ```text
//! version     u8
//! log_id      [u8; 32]
//! timestamp   u64 (big-endian, ms since epoch)
//! extensions  u16 length (big-endian) + bytes
//! signature   remaining bytes
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::AddChainResponse;
use crate::error::{Result, SubmitError};

pub const LOG_ID_LEN: usize = 32;
pub const MAX_EXTENSIONS_LEN: usize = u16::MAX as usize;

/// A decoded SCT as returned by one log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCertificateTimestamp {
    pub version: u8,
    pub log_id: [u8; LOG_ID_LEN],
    pub timestamp: u64,
    pub extensions: Vec<u8>,
    pub signature: Vec<u8>,
}

impl TryFrom<AddChainResponse> for SignedCertificateTimestamp {
    type Error = SubmitError;

    fn try_from(response: AddChainResponse) -> Result<Self> {
        let id = decode_field("id", &response.id)?;
        let log_id: [u8; LOG_ID_LEN] = id.try_into().map_err(|id: Vec<u8>| {
            SubmitError::Protocol(format!(
                "log ID must be {} bytes, got {}",
                LOG_ID_LEN,
                id.len()
            ))
        })?;

        Ok(Self {
            version: response.sct_version,
            log_id,
            timestamp: response.timestamp,
            extensions: decode_field("extensions", &response.extensions)?,
            signature: decode_field("signature", &response.signature)?,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| SubmitError::Protocol(format!("field '{}' is not valid base64: {}", name, e)))
}

impl SignedCertificateTimestamp {
    /// Length of the encoded form
    pub fn encoded_len(&self) -> usize {
        1 + LOG_ID_LEN + 8 + 2 + self.extensions.len() + self.signature.len()
    }

    /// Serialize into the RFC 6962 layout
    ///
    /// Fails without producing any bytes if the extensions do not fit a
    /// 16-bit length prefix.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let extensions_len = u16::try_from(self.extensions.len()).map_err(|_| {
            SubmitError::Encoding(format!(
                "extensions are {} bytes, at most {} allowed",
                self.extensions.len(),
                MAX_EXTENSIONS_LEN
            ))
        })?;

        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(self.version);
        out.extend_from_slice(&self.log_id);
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&extensions_len.to_be_bytes());
        out.extend_from_slice(&self.extensions);
        // Signature is unprefixed, the file length delimits it
        out.extend_from_slice(&self.signature);

        Ok(out)
    }

    /// Encode and write to `path`, replacing any existing file
    ///
    /// The bytes go to a temporary sibling first and are renamed into place,
    /// so `path` either holds a complete SCT or is left untouched.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.encode()?;
        let tmp_path = temp_path_for(path);

        if let Err(source) = tokio::fs::write(&tmp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(SubmitError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        if let Err(source) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(SubmitError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        debug!("Wrote {} byte SCT to {}", bytes.len(), path.display());
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn response(id: &[u8], extensions: &[u8], signature: &[u8]) -> AddChainResponse {
        AddChainResponse {
            sct_version: 0,
            id: STANDARD.encode(id),
            timestamp: 1000,
            extensions: STANDARD.encode(extensions),
            signature: STANDARD.encode(signature),
        }
    }

    #[test]
    fn test_encode_layout() {
        let sct = SignedCertificateTimestamp::try_from(response(
            &[0u8; 32],
            b"",
            &[0xde, 0xad, 0xbe, 0xef],
        ))
        .unwrap();

        let bytes = sct.encode().unwrap();

        assert_eq!(bytes.len(), 47);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(&bytes[1..33], &[0u8; 32]);
        assert_eq!(&bytes[33..41], &1000u64.to_be_bytes());
        assert_eq!(&bytes[41..43], &[0, 0]);
        assert_eq!(&bytes[43..], &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_encoded_length_matches_fields() {
        for (ext_len, sig_len) in [(0, 0), (3, 71), (300, 512)] {
            let sct = SignedCertificateTimestamp {
                version: 0,
                log_id: [7u8; 32],
                timestamp: u64::MAX,
                extensions: vec![1; ext_len],
                signature: vec![2; sig_len],
            };

            let bytes = sct.encode().unwrap();
            assert_eq!(bytes.len(), 1 + 32 + 8 + 2 + ext_len + sig_len);
            assert_eq!(bytes.len(), sct.encoded_len());
        }
    }

    #[test]
    fn test_extensions_length_prefix_is_big_endian() {
        let sct = SignedCertificateTimestamp {
            version: 0,
            log_id: [0u8; 32],
            timestamp: 0,
            extensions: vec![0xaa; 0x0102],
            signature: vec![],
        };

        let bytes = sct.encode().unwrap();
        assert_eq!(&bytes[41..43], &[0x01, 0x02]);
    }

    #[test]
    fn test_maximum_extensions_fit() {
        let sct = SignedCertificateTimestamp {
            version: 0,
            log_id: [0u8; 32],
            timestamp: 0,
            extensions: vec![0; MAX_EXTENSIONS_LEN],
            signature: vec![],
        };

        assert!(sct.encode().is_ok());
    }

    #[test]
    fn test_oversized_extensions_rejected() {
        let sct = SignedCertificateTimestamp {
            version: 0,
            log_id: [0u8; 32],
            timestamp: 0,
            extensions: vec![0; MAX_EXTENSIONS_LEN + 1],
            signature: vec![1, 2, 3],
        };

        assert!(matches!(sct.encode(), Err(SubmitError::Encoding(_))));
    }

    #[test]
    fn test_short_log_id_rejected() {
        let result = SignedCertificateTimestamp::try_from(response(&[0u8; 31], b"", b"sig"));
        assert!(matches!(result, Err(SubmitError::Protocol(_))));
    }

    #[test]
    fn test_long_log_id_rejected() {
        let result = SignedCertificateTimestamp::try_from(response(&[0u8; 33], b"", b"sig"));
        assert!(matches!(result, Err(SubmitError::Protocol(_))));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let mut bad = response(&[0u8; 32], b"", b"sig");
        bad.signature = "not base64!".to_string();

        let result = SignedCertificateTimestamp::try_from(bad);
        assert!(matches!(result, Err(SubmitError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_write_to_creates_complete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.sct");
        let sct = SignedCertificateTimestamp::try_from(response(&[0u8; 32], b"", b"sign")).unwrap();

        sct.write_to(&path).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, sct.encode().unwrap());
        // No temporary file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_write_to_leaves_nothing_on_encoding_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.sct");
        let sct = SignedCertificateTimestamp {
            version: 0,
            log_id: [0u8; 32],
            timestamp: 0,
            extensions: vec![0; MAX_EXTENSIONS_LEN + 1],
            signature: vec![],
        };

        assert!(sct.write_to(&path).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("log.sct");
        let sct = SignedCertificateTimestamp::try_from(response(&[0u8; 32], b"", b"sign")).unwrap();

        assert!(matches!(
            sct.write_to(&path).await,
            Err(SubmitError::Io { .. })
        ));
    }
}
