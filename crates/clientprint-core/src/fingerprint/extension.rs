use std::collections::BTreeMap;

use serde::Deserialize;

use crate::codec::id_in_parens;
use crate::error::FingerprintError;
use crate::fingerprint::grease::is_grease_label;
use crate::fingerprint::types::{
    extension_id, ExtensionData, HpkeSymmetricCipherSuite, ProtocolVersion,
};

/// IANA signature scheme names as capture services print them.
const SIGNATURE_SCHEMES: &[(&str, u16)] = &[
    ("rsa_pkcs1_sha256", 0x0401),
    ("rsa_pkcs1_sha384", 0x0501),
    ("rsa_pkcs1_sha512", 0x0601),
    ("ecdsa_secp256r1_sha256", 0x0403),
    ("ecdsa_secp384r1_sha384", 0x0503),
    ("ecdsa_secp521r1_sha512", 0x0603),
    ("rsa_pss_rsae_sha256", 0x0804),
    ("rsa_pss_rsae_sha384", 0x0805),
    ("rsa_pss_rsae_sha512", 0x0806),
    ("ed25519", 0x0807),
    ("ed448", 0x0808),
    ("rsa_pss_pss_sha256", 0x0809),
    ("rsa_pss_pss_sha384", 0x080a),
    ("rsa_pss_pss_sha512", 0x080b),
    ("rsa_pkcs1_sha1", 0x0201),
    ("ecdsa_sha1", 0x0203),
];

const ECH_CANDIDATE_CIPHER_SUITES: [HpkeSymmetricCipherSuite; 2] = [
    HpkeSymmetricCipherSuite {
        kdf_id: HpkeSymmetricCipherSuite::HKDF_SHA256,
        aead_id: HpkeSymmetricCipherSuite::AEAD_AES_128_GCM,
    },
    HpkeSymmetricCipherSuite {
        kdf_id: HpkeSymmetricCipherSuite::HKDF_SHA256,
        aead_id: HpkeSymmetricCipherSuite::AEAD_CHACHA20_POLY1305,
    },
];

const ECH_CANDIDATE_PAYLOAD_LENS: [u32; 4] = [128, 160, 192, 224];

/// One captured extension, in the shape capture services report it.
///
/// `name` looks like `"signature_algorithms (13)"`; the other fields are only
/// populated for the extension kinds that carry them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionDescriptor {
    pub name: String,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub shared_keys: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub signature_algorithms: Vec<String>,
    #[serde(default)]
    pub algorithms: Vec<String>,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default, rename = "PSK_Key_Exchange_Mode")]
    pub psk_key_exchange_mode: Option<String>,
    #[serde(default)]
    pub supported_groups: Vec<String>,
}

impl ExtensionDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Map a signature scheme name to its 16-bit code.
pub fn signature_scheme(name: &str) -> Option<u16> {
    SIGNATURE_SCHEMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Decode the structured payload of one captured extension.
///
/// Returns `Ok(None)` for GREASE extensions, for extension ids without a
/// decoder (supported_groups included) and for kinds whose optional payload
/// is absent. Only a name without a parenthesised id is an error.
pub fn decode_extension(
    desc: &ExtensionDescriptor,
) -> Result<Option<ExtensionData>, FingerprintError> {
    if is_grease_label(&desc.name) {
        return Ok(None);
    }
    let id: u16 = id_in_parens(&desc.name)?;

    let data = match id {
        extension_id::SIGNATURE_ALGORITHMS => Some(ExtensionData::SignatureAlgorithms {
            algorithms: desc
                .signature_algorithms
                .iter()
                .filter_map(|name| signature_scheme(name))
                .collect(),
        }),
        extension_id::APPLICATION_LAYER_PROTOCOL_NEGOTIATION => Some(ExtensionData::Alpn {
            protocols: desc.protocols.clone(),
        }),
        extension_id::COMPRESS_CERTIFICATE => Some(ExtensionData::CompressCertificate {
            algorithms: desc
                .algorithms
                .iter()
                .map(|algo| id_in_parens(algo))
                .collect::<Result<Vec<u16>, _>>()?,
        }),
        extension_id::SUPPORTED_VERSIONS => Some(ExtensionData::SupportedVersions {
            versions: desc
                .versions
                .iter()
                .filter(|v| !is_grease_label(v))
                .filter_map(|v| ProtocolVersion::from_name(v))
                .collect(),
        }),
        extension_id::PSK_KEY_EXCHANGE_MODES => match &desc.psk_key_exchange_mode {
            Some(mode) => Some(ExtensionData::PskKeyExchangeModes {
                modes: vec![id_in_parens(mode)?],
            }),
            None => None,
        },
        extension_id::KEY_SHARE => {
            let mut groups = Vec::new();
            for share in &desc.shared_keys {
                // values are the public keys, which the canonical record drops
                for group in share.keys().filter(|g| !is_grease_label(g)) {
                    groups.push(id_in_parens(group)?);
                }
            }
            Some(ExtensionData::KeyShare { groups })
        }
        extension_id::APPLICATION_SETTINGS => Some(ExtensionData::ApplicationSettings {
            protocols: desc.protocols.clone(),
        }),
        extension_id::ENCRYPTED_CLIENT_HELLO => desc
            .data
            .as_deref()
            .filter(|payload| !payload.is_empty())
            .map(|_| ExtensionData::EncryptedClientHello {
                candidate_cipher_suites: ECH_CANDIDATE_CIPHER_SUITES.to_vec(),
                candidate_payload_lens: ECH_CANDIDATE_PAYLOAD_LENS.to_vec(),
            }),
        _ => None,
    };

    Ok(data)
}
