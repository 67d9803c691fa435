pub mod peet;

use serde::Serialize;
use thiserror::Error;

use crate::error::FingerprintError;
use crate::fingerprint::akamai::Http2Fingerprint;
use crate::fingerprint::types::TlsFingerprint;

pub use peet::PeetResponse;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("capture JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),
}

/// Everything one fingerprint echo capture says about a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserProfile {
    /// User agent the capture service saw, if it reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub tls: TlsFingerprint,
    /// `None` when the client did not speak HTTP/2
    pub http2: Option<Http2Fingerprint>,
}

