use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::{BrowserProfile, ImportError};
use crate::fingerprint::akamai::{
    header_frame_priority, parse_akamai, Http2Fingerprint, SentFrame,
};
use crate::fingerprint::extension::{decode_extension, ExtensionDescriptor};
use crate::fingerprint::ja3::parse_compact;

/// Response body of a PEET-style TLS echo endpoint (`/api/all`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeetResponse {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub http_version: String,
    #[serde(default)]
    pub user_agent: String,
    pub tls: PeetTls,
    #[serde(default)]
    pub http2: Option<PeetHttp2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeetTls {
    #[serde(default)]
    pub ciphers: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<ExtensionDescriptor>,
    pub ja3: String,
    #[serde(default)]
    pub ja3_hash: String,
    #[serde(default)]
    pub ja4: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeetHttp2 {
    #[serde(default)]
    pub akamai_fingerprint: String,
    #[serde(default)]
    pub akamai_fingerprint_hash: String,
    #[serde(default)]
    pub sent_frames: Vec<SentFrame>,
}

impl BrowserProfile {
    /// Build a profile from a decoded capture.
    ///
    /// Extension payloads are keyed by id, so a later entry with the same id
    /// replaces an earlier one.
    pub fn from_peet(resp: &PeetResponse) -> Result<Self, ImportError> {
        let mut tls = parse_compact(&resp.tls.ja3)?;

        let mut decoded = 0u64;
        let mut skipped = 0u64;
        for ext in &resp.tls.extensions {
            let Some(data) = decode_extension(ext)? else {
                debug!("no payload decoded for extension {:?}", ext.name);
                skipped += 1;
                continue;
            };
            if let Some(previous) = tls.insert_extension_data(data) {
                debug!(
                    "extension {} listed twice, keeping the later entry",
                    previous.extension_id()
                );
            }
            decoded += 1;
        }

        let http2 = match &resp.http2 {
            Some(h2) if !h2.akamai_fingerprint.is_empty() => Some(decode_http2(h2)?),
            _ => None,
        };

        info!(
            "capture import: {} extensions decoded, {} skipped, http2 {}",
            decoded,
            skipped,
            if http2.is_some() { "present" } else { "absent" }
        );

        Ok(Self {
            user_agent: (!resp.user_agent.is_empty()).then(|| resp.user_agent.clone()),
            tls,
            http2,
        })
    }

    /// Build a profile from the raw JSON body of a capture.
    pub fn from_peet_json(bytes: &[u8]) -> Result<Self, ImportError> {
        let resp: PeetResponse = serde_json::from_slice(bytes)?;
        Self::from_peet(&resp)
    }

    /// Build a profile from a capture saved to disk.
    pub fn from_peet_file(path: &Path) -> Result<Self, ImportError> {
        let file = std::fs::File::open(path)?;
        let resp: PeetResponse = serde_json::from_reader(BufReader::new(file))?;
        debug!("read capture {}", path.display());
        Self::from_peet(&resp)
    }
}

fn decode_http2(h2: &PeetHttp2) -> Result<Http2Fingerprint, ImportError> {
    let mut fp = parse_akamai(&h2.akamai_fingerprint)?;
    fp.header_frame_priority = header_frame_priority(&h2.sent_frames)?;
    Ok(fp)
}
