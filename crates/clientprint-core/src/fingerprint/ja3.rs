use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::codec::{join_dash, parse_dash_list, parse_int};
use crate::error::FingerprintError;
use crate::fingerprint::grease::filter_grease_u16;
use crate::fingerprint::types::{extension_id, Ja3Result, ProtocolVersion, TlsFingerprint};

/// Parse a compact JA3 string into a `TlsFingerprint`.
///
/// JA3 format: `SSLVersion,Ciphers,Extensions,EllipticCurves,EcPointFormats`
///
/// - Exactly five comma-separated fields, any of which may be empty
/// - Values within each field separated by dashes, all decimal
/// - GREASE values are dropped from ciphers, extensions and curves
///
/// `extension_data` is always empty: the compact form does not carry it.
pub fn parse_compact(s: &str) -> Result<TlsFingerprint, FingerprintError> {
    let fields: Vec<&str> = s.split(',').collect();
    let [version, ciphers, extensions, curves, point_formats] = fields[..] else {
        return Err(FingerprintError::malformed("fingerprint", s));
    };

    Ok(TlsFingerprint {
        version: ProtocolVersion::from(parse_int::<u16>("version", version)?),
        cipher_suites: filter_grease_u16(parse_dash_list("cipher suites", ciphers)?),
        extensions: filter_grease_u16(parse_dash_list("extensions", extensions)?),
        elliptic_curves: filter_grease_u16(parse_dash_list("elliptic curves", curves)?),
        ec_point_formats: parse_dash_list("point formats", point_formats)?,
        extension_data: BTreeMap::new(),
    })
}

/// Format a fingerprint back into its compact JA3 string.
///
/// With `strict` the extension order is kept; otherwise the non-terminal
/// extensions are shuffled with the thread-local generator.
pub fn format_compact(fp: &TlsFingerprint, strict: bool) -> String {
    format_compact_with_rng(fp, strict, &mut rand::thread_rng())
}

/// Same as [`format_compact`] with a caller-supplied random source.
///
/// Padding (21) and pre_shared_key (41) always close the extension list in
/// ascending order, whatever their position in `fp.extensions`.
pub fn format_compact_with_rng<R>(fp: &TlsFingerprint, strict: bool, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let (mut terminal, mut extensions): (Vec<u16>, Vec<u16>) = fp
        .extensions
        .iter()
        .copied()
        .partition(|id| is_terminal_extension(*id));

    if !strict {
        extensions.shuffle(rng);
    }
    terminal.sort_unstable();
    extensions.extend(terminal);

    format!(
        "{},{},{},{},{}",
        fp.version,
        join_dash(&fp.cipher_suites),
        join_dash(&extensions),
        join_dash(&fp.elliptic_curves),
        join_dash(&fp.ec_point_formats),
    )
}

/// Compute the JA3 fingerprint: the compact string and its MD5.
pub fn compute_ja3(fp: &TlsFingerprint, strict: bool) -> Ja3Result {
    compute_ja3_with_rng(fp, strict, &mut rand::thread_rng())
}

pub fn compute_ja3_with_rng<R>(fp: &TlsFingerprint, strict: bool, rng: &mut R) -> Ja3Result
where
    R: Rng + ?Sized,
{
    let raw_string = format_compact_with_rng(fp, strict, rng);

    let mut hasher = Md5::new();
    hasher.update(raw_string.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Ja3Result { hash, raw_string }
}

fn is_terminal_extension(id: u16) -> bool {
    id == extension_id::PADDING || id == extension_id::PRE_SHARED_KEY
}

impl FromStr for TlsFingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_compact(s)
    }
}

impl fmt::Display for TlsFingerprint {
    /// Strict compact form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_compact(self, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BRAVE_JA3: &str = "771,4865-4866-4867-49195-49199-49196-49200-52393-52392-49171-49172-156-157-47-53,27-16-35-11-17513-43-13-5-23-0-18-51-10-65281-45-21,29-23-24,0";

    fn fingerprint(extensions: Vec<u16>) -> TlsFingerprint {
        TlsFingerprint {
            version: ProtocolVersion::Tls12,
            cipher_suites: vec![4865, 4866],
            extensions,
            elliptic_curves: vec![29],
            ec_point_formats: vec![0],
            extension_data: BTreeMap::new(),
        }
    }

    #[test]
    fn test_parse_brave() {
        let fp = parse_compact(BRAVE_JA3).unwrap();

        assert_eq!(fp.version, ProtocolVersion::Tls12);
        assert_eq!(fp.version.code(), 771);
        assert_eq!(fp.cipher_suites.len(), 15);
        assert_eq!(fp.cipher_suites[0], 4865);
        assert_eq!(fp.extensions.len(), 16);
        assert_eq!(fp.elliptic_curves, vec![29, 23, 24]);
        assert_eq!(fp.ec_point_formats, vec![0]);
        assert!(fp.extension_data.is_empty());
    }

    #[test]
    fn test_strict_round_trip() {
        let fp = parse_compact(BRAVE_JA3).unwrap();
        assert_eq!(format_compact(&fp, true), BRAVE_JA3);
        assert_eq!(fp.to_string(), BRAVE_JA3);

        let again: TlsFingerprint = fp.to_string().parse().unwrap();
        assert_eq!(again, fp);
    }

    #[test]
    fn test_empty_fields() {
        let fp = parse_compact("771,,,,").unwrap();
        assert!(fp.cipher_suites.is_empty());
        assert!(fp.extensions.is_empty());
        assert_eq!(format_compact(&fp, true), "771,,,,");
    }

    #[test]
    fn test_wrong_field_count() {
        for s in ["771,4865,0,29", "771,4865,0,29,0,1", ""] {
            assert!(matches!(
                parse_compact(s),
                Err(FingerprintError::MalformedFingerprint { .. })
            ));
        }
    }

    #[test]
    fn test_non_integer_token() {
        let err = parse_compact("771,4865-abc,0,29,0").unwrap_err();
        assert_eq!(
            err,
            FingerprintError::MalformedFingerprint {
                field: "cipher suites",
                token: "abc".into()
            }
        );
    }

    #[test]
    fn test_signed_token_rejected() {
        assert!(matches!(
            parse_compact("771,+4865,,,"),
            Err(FingerprintError::MalformedFingerprint { .. })
        ));
        assert!(matches!(
            parse_compact("+771,4865,,,"),
            Err(FingerprintError::MalformedFingerprint { .. })
        ));
    }

    #[test]
    fn test_grease_dropped_on_parse() {
        let fp = parse_compact("771,2570-4865,14906-0-10,6682-29,0").unwrap();
        assert_eq!(fp.cipher_suites, vec![4865]);
        assert_eq!(fp.extensions, vec![0, 10]);
        assert_eq!(fp.elliptic_curves, vec![29]);
    }

    #[test]
    fn test_terminal_extensions_sorted_last() {
        let fp = fingerprint(vec![41, 0, 23, 21, 10]);
        assert_eq!(format_compact(&fp, true), "771,4865-4866,0-23-10-21-41,29,0");

        let fp = fingerprint(vec![41, 0, 23]);
        assert_eq!(format_compact(&fp, true), "771,4865-4866,0-23-41,29,0");
    }

    #[test]
    fn test_shuffle_keeps_terminal_and_membership() {
        let fp = parse_compact(BRAVE_JA3).unwrap();
        let mut with_psk = fp.clone();
        with_psk.extensions.insert(3, 41);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let out = format_compact_with_rng(&with_psk, false, &mut rng);
            let parsed = parse_compact(&out).unwrap();

            let n = parsed.extensions.len();
            assert_eq!(&parsed.extensions[n - 2..], &[21, 41]);

            let mut got = parsed.extensions.clone();
            let mut want = with_psk.extensions.clone();
            got.sort_unstable();
            want.sort_unstable();
            assert_eq!(got, want);
            assert_eq!(parsed.cipher_suites, fp.cipher_suites);
        }
    }

    #[test]
    fn test_shuffle_is_seed_deterministic() {
        let fp = parse_compact(BRAVE_JA3).unwrap();
        let a = format_compact_with_rng(&fp, false, &mut StdRng::seed_from_u64(42));
        let b = format_compact_with_rng(&fp, false, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ja3_hash() {
        let fp = fingerprint(vec![0, 23, 10, 11, 13]);
        let result = compute_ja3(&fp, true);

        assert_eq!(result.raw_string, "771,4865-4866,0-23-10-11-13,29,0");
        assert_eq!(result.hash, "df95fc81996048b9f4b7ec0f91405d20");
        assert_eq!(result, compute_ja3(&fp, true));
    }

    #[test]
    fn test_ja3_hash_known_values() {
        let brave = compute_ja3(&parse_compact(BRAVE_JA3).unwrap(), true);
        assert_eq!(brave.hash, "52e72bbec2e0a2694764295c8b867a23");

        let empty = compute_ja3(&parse_compact("771,,,,").unwrap(), true);
        assert_eq!(empty.hash, "bddda940f9963577c41d7c28b1a5f65f");
    }

    #[test]
    fn test_seeded_hash_matches_seeded_string() {
        let fp = parse_compact(BRAVE_JA3).unwrap();
        let result = compute_ja3_with_rng(&fp, false, &mut StdRng::seed_from_u64(3));
        let raw = format_compact_with_rng(&fp, false, &mut StdRng::seed_from_u64(3));
        assert_eq!(result.raw_string, raw);
    }
}
