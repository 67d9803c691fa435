use std::fmt::Display;
use std::num::IntErrorKind;

use crate::error::FingerprintError;

/// Parse one decimal token into `T`.
///
/// A token that is not an integer at all is `MalformedFingerprint`, and so is
/// an explicit `+` sign, which would not survive re-encoding. An integer that
/// does not fit `T` (negative, too wide) is `UnsupportedValue`.
pub fn parse_int<T>(field: &'static str, token: &str) -> Result<T, FingerprintError>
where
    T: TryFrom<i64>,
{
    if token.starts_with('+') {
        return Err(FingerprintError::malformed(field, token));
    }
    let wide = token.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            FingerprintError::unsupported(field, token)
        }
        _ => FingerprintError::malformed(field, token),
    })?;
    T::try_from(wide).map_err(|_| FingerprintError::unsupported(field, wide))
}

/// Parse a dash-separated list of decimal integers. An empty field is an
/// empty list.
pub fn parse_dash_list<T>(field: &'static str, section: &str) -> Result<Vec<T>, FingerprintError>
where
    T: TryFrom<i64>,
{
    if section.is_empty() {
        return Ok(Vec::new());
    }
    section.split('-').map(|t| parse_int(field, t)).collect()
}

/// Join values with `-`, the separator used inside every compact field.
pub fn join_dash<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract the number between the last `(` and the last `)` of a label such
/// as `"application_layer_protocol_negotiation (16)"`.
pub fn id_in_parens<T>(label: &str) -> Result<T, FingerprintError>
where
    T: TryFrom<u64>,
{
    let malformed = || FingerprintError::MalformedExtensionName(label.to_string());

    let open = label.rfind('(').ok_or_else(malformed)?;
    let close = label.rfind(')').ok_or_else(malformed)?;
    if close <= open {
        return Err(malformed());
    }

    let id: u64 = label[open + 1..close].trim().parse().map_err(|_| malformed())?;
    T::try_from(id).map_err(|_| FingerprintError::unsupported("extension id", id))
}
