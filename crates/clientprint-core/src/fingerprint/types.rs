use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Extension type codes that get special treatment somewhere in the crate.
pub mod extension_id {
    pub const SUPPORTED_GROUPS: u16 = 10;
    pub const SIGNATURE_ALGORITHMS: u16 = 13;
    pub const APPLICATION_LAYER_PROTOCOL_NEGOTIATION: u16 = 16;
    pub const PADDING: u16 = 21;
    pub const COMPRESS_CERTIFICATE: u16 = 27;
    pub const PRE_SHARED_KEY: u16 = 41;
    pub const SUPPORTED_VERSIONS: u16 = 43;
    pub const PSK_KEY_EXCHANGE_MODES: u16 = 45;
    pub const KEY_SHARE: u16 = 51;
    pub const APPLICATION_SETTINGS: u16 = 17513;
    pub const ENCRYPTED_CLIENT_HELLO: u16 = 65037;
}

/// Record-layer / supported-versions protocol code.
///
/// Known codes always decode to their named variant; `Other` only carries
/// codes without a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum ProtocolVersion {
    Ssl3,
    Tls10,
    Tls11,
    Tls12,
    Tls13,
    Other(u16),
}

impl ProtocolVersion {
    pub fn code(self) -> u16 {
        match self {
            Self::Ssl3 => 0x0300,
            Self::Tls10 => 0x0301,
            Self::Tls11 => 0x0302,
            Self::Tls12 => 0x0303,
            Self::Tls13 => 0x0304,
            Self::Other(code) => code,
        }
    }

    /// Look up the display names capture services use in supported_versions.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TLS 1.3" => Some(Self::Tls13),
            "TLS 1.2" => Some(Self::Tls12),
            "TLS 1.1" => Some(Self::Tls11),
            "TLS 1.0" => Some(Self::Tls10),
            _ => None,
        }
    }
}

impl From<u16> for ProtocolVersion {
    fn from(code: u16) -> Self {
        match code {
            0x0300 => Self::Ssl3,
            0x0301 => Self::Tls10,
            0x0302 => Self::Tls11,
            0x0303 => Self::Tls12,
            0x0304 => Self::Tls13,
            other => Self::Other(other),
        }
    }
}

impl From<ProtocolVersion> for u16 {
    fn from(v: ProtocolVersion) -> u16 {
        v.code()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// HPKE KDF/AEAD pair offered in an Encrypted Client Hello extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpkeSymmetricCipherSuite {
    pub kdf_id: u16,
    pub aead_id: u16,
}

impl HpkeSymmetricCipherSuite {
    pub const HKDF_SHA256: u16 = 0x0001;
    pub const AEAD_AES_128_GCM: u16 = 0x0001;
    pub const AEAD_CHACHA20_POLY1305: u16 = 0x0003;
}

/// Structured payload of one extension, as far as the canonical record
/// keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtensionData {
    SignatureAlgorithms {
        algorithms: Vec<u16>,
    },
    Alpn {
        protocols: Vec<String>,
    },
    CompressCertificate {
        algorithms: Vec<u16>,
    },
    SupportedVersions {
        versions: Vec<ProtocolVersion>,
    },
    PskKeyExchangeModes {
        modes: Vec<u8>,
    },
    /// Only the group of each share is kept, never the key material.
    KeyShare {
        groups: Vec<u16>,
    },
    ApplicationSettings {
        protocols: Vec<String>,
    },
    EncryptedClientHello {
        candidate_cipher_suites: Vec<HpkeSymmetricCipherSuite>,
        candidate_payload_lens: Vec<u32>,
    },
}

impl ExtensionData {
    /// The extension type this payload belongs to.
    pub fn extension_id(&self) -> u16 {
        match self {
            Self::SignatureAlgorithms { .. } => extension_id::SIGNATURE_ALGORITHMS,
            Self::Alpn { .. } => extension_id::APPLICATION_LAYER_PROTOCOL_NEGOTIATION,
            Self::CompressCertificate { .. } => extension_id::COMPRESS_CERTIFICATE,
            Self::SupportedVersions { .. } => extension_id::SUPPORTED_VERSIONS,
            Self::PskKeyExchangeModes { .. } => extension_id::PSK_KEY_EXCHANGE_MODES,
            Self::KeyShare { .. } => extension_id::KEY_SHARE,
            Self::ApplicationSettings { .. } => extension_id::APPLICATION_SETTINGS,
            Self::EncryptedClientHello { .. } => extension_id::ENCRYPTED_CLIENT_HELLO,
        }
    }
}

/// Canonical TLS ClientHello fingerprint.
///
/// The compact JA3 string only covers the first five fields;
/// `extension_data` is filled from richer capture formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsFingerprint {
    /// Record-layer version (e.g. 771 for TLS 1.2)
    pub version: ProtocolVersion,
    /// Cipher suites in client preference order
    pub cipher_suites: Vec<u16>,
    /// Extension type codes in wire order, GREASE removed
    pub extensions: Vec<u16>,
    /// Supported groups / named curves
    pub elliptic_curves: Vec<u16>,
    /// EC point format values
    pub ec_point_formats: Vec<u8>,
    /// Decoded extension payloads, at most one per extension id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extension_data: BTreeMap<u16, ExtensionData>,
}

impl TlsFingerprint {
    /// Store a decoded payload, replacing any earlier one for the same id.
    pub fn insert_extension_data(&mut self, data: ExtensionData) -> Option<ExtensionData> {
        self.extension_data.insert(data.extension_id(), data)
    }

    pub fn extension_payload(&self, id: u16) -> Option<&ExtensionData> {
        self.extension_data.get(&id)
    }
}

/// Result of a JA3 fingerprint computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ja3Result {
    /// 32-character MD5 hex hash
    pub hash: String,
    /// The raw string before hashing
    pub raw_string: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_version_codes() {
        assert_eq!(ProtocolVersion::from(771), ProtocolVersion::Tls12);
        assert_eq!(ProtocolVersion::Tls13.code(), 0x0304);
        assert_eq!(ProtocolVersion::from(0x7f1c), ProtocolVersion::Other(0x7f1c));
        assert_eq!(ProtocolVersion::Tls12.to_string(), "771");
    }

    #[test]
    fn protocol_version_names() {
        assert_eq!(ProtocolVersion::from_name("TLS 1.3"), Some(ProtocolVersion::Tls13));
        assert_eq!(ProtocolVersion::from_name("TLS 1.0"), Some(ProtocolVersion::Tls10));
        assert_eq!(ProtocolVersion::from_name("SSL 3.0"), None);
    }

    #[test]
    fn extension_payload_keyed_by_id() {
        let mut fp = TlsFingerprint {
            version: ProtocolVersion::Tls12,
            cipher_suites: vec![],
            extensions: vec![],
            elliptic_curves: vec![],
            ec_point_formats: vec![],
            extension_data: BTreeMap::new(),
        };
        fp.insert_extension_data(ExtensionData::Alpn {
            protocols: vec!["h2".into()],
        });
        let old = fp.insert_extension_data(ExtensionData::Alpn {
            protocols: vec!["http/1.1".into()],
        });

        assert!(old.is_some());
        assert_eq!(fp.extension_data.len(), 1);
        assert_eq!(
            fp.extension_payload(16),
            Some(&ExtensionData::Alpn {
                protocols: vec!["http/1.1".into()]
            })
        );
    }

    #[test]
    fn serializes_versions_as_codes() {
        let data = ExtensionData::SupportedVersions {
            versions: vec![ProtocolVersion::Tls13, ProtocolVersion::Tls12],
        };
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"kind":"supported_versions","versions":[772,771]}"#);
    }
}
