//! Canonical client fingerprints: JA3-style TLS strings, Akamai HTTP/2
//! strings and Chromium `sec-ch-ua` brand lists.

pub mod brand;
pub mod client_hints;
pub mod codec;
pub mod error;
pub mod fingerprint;
pub mod import;

pub use brand::{synthesize_brand_header, BrandHeaderSpec};
pub use error::FingerprintError;
pub use import::{BrowserProfile, ImportError};
