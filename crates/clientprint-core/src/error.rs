use thiserror::Error;

/// Errors produced while decoding or encoding a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("malformed fingerprint: {field} contains non-integer token {token:?}")]
    MalformedFingerprint { field: &'static str, token: String },
    #[error("malformed extension name {0:?}: no parenthesised numeric id")]
    MalformedExtensionName(String),
    #[error("unsupported value for {field}: {value}")]
    UnsupportedValue { field: &'static str, value: String },
}

impl FingerprintError {
    pub(crate) fn malformed(field: &'static str, token: impl Into<String>) -> Self {
        Self::MalformedFingerprint {
            field,
            token: token.into(),
        }
    }

    pub(crate) fn unsupported(field: &'static str, value: impl ToString) -> Self {
        Self::UnsupportedValue {
            field,
            value: value.to_string(),
        }
    }
}
