pub mod akamai;
pub mod extension;
pub mod grease;
pub mod ja3;
pub mod types;

pub use akamai::{parse_akamai, Http2Fingerprint, PriorityFrame, PseudoHeader, SettingsFrame};
pub use extension::{decode_extension, ExtensionDescriptor};
pub use ja3::{
    compute_ja3, compute_ja3_with_rng, format_compact, format_compact_with_rng, parse_compact,
};
pub use types::{ExtensionData, Ja3Result, ProtocolVersion, TlsFingerprint};
