use serde::{Deserialize, Serialize};

use crate::brand::synthesize_brand_header;

/// Brand used when the caller does not name one.
pub const DEFAULT_BRAND: &str = "Google Chrome";

/// A Chromium release version such as `126.0.6478.127`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromiumVersion {
    pub version: String,
}

impl ChromiumVersion {
    pub fn parse(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// A release for `major` with zeroed minor components.
    pub fn from_major(major: u32) -> Self {
        Self::parse(format!("{}.0.0.0", major))
    }

    /// Leading version component; 0 when it is not a number.
    pub fn major(&self) -> u32 {
        self.major_str().parse().unwrap_or(0)
    }

    /// The reduced form Chromium puts in its user agent, e.g. `126.0.0.0`.
    pub fn ua_version(&self) -> String {
        format!("{}.0.0.0", self.major_str())
    }

    fn major_str(&self) -> &str {
        self.version.split('.').next().unwrap_or("")
    }
}

/// Windows desktop user agent for the given release.
pub fn user_agent(version: &ChromiumVersion) -> String {
    format!(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        version.ua_version()
    )
}

/// Request headers a desktop Chromium build sends for client hints, in send
/// order. With `with_full_versions` the high-entropy hints are included too.
pub fn client_hint_headers(
    brand: &str,
    version: &ChromiumVersion,
    with_full_versions: bool,
) -> Vec<(&'static str, String)> {
    let brand = if brand.is_empty() { DEFAULT_BRAND } else { brand };
    let major = version.major();

    let mut headers = vec![
        ("user-agent", user_agent(version)),
        ("sec-ch-ua", synthesize_brand_header(brand, major, false, false)),
        ("sec-ch-ua-mobile", "?0".to_string()),
    ];

    if with_full_versions {
        headers.extend([
            ("sec-ch-ua-platform", "\"Windows\"".to_string()),
            ("sec-ch-ua-arch", "\"x86\"".to_string()),
            ("sec-ch-ua-platform-version", "\"19.0.0\"".to_string()),
            ("sec-ch-ua-model", String::new()),
            (
                "sec-ch-ua-full-version-list",
                synthesize_brand_header(brand, major, false, true),
            ),
        ]);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parts() {
        let v = ChromiumVersion::parse("126.0.6478.127");
        assert_eq!(v.major(), 126);
        assert_eq!(v.ua_version(), "126.0.0.0");
        assert_eq!(ChromiumVersion::from_major(131).version, "131.0.0.0");
    }

    #[test]
    fn malformed_major_is_zero() {
        assert_eq!(ChromiumVersion::parse("canary").major(), 0);
        assert_eq!(ChromiumVersion::parse("").major(), 0);
    }

    #[test]
    fn user_agent_uses_reduced_version() {
        let ua = user_agent(&ChromiumVersion::parse("126.0.6478.127"));
        assert!(ua.contains("Chrome/126.0.0.0 Safari/537.36"));
        assert!(!ua.contains("6478"));
    }

    #[test]
    fn low_entropy_headers() {
        let version = ChromiumVersion::parse("126.0.6478.127");
        let headers = client_hint_headers("Brave", &version, false);
        let names: Vec<&str> = headers.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["user-agent", "sec-ch-ua", "sec-ch-ua-mobile"]);
        assert_eq!(
            headers[1].1,
            r#""Not/A)Brand";v="8", "Chromium";v="126", "Brave";v="126""#
        );
        assert_eq!(headers[2].1, "?0");
    }

    #[test]
    fn full_version_headers() {
        let headers = client_hint_headers("", &ChromiumVersion::from_major(126), true);
        assert_eq!(headers.len(), 8);
        assert!(headers[1].1.contains(r#""Google Chrome";v="126""#));

        let (_, full) = headers
            .iter()
            .find(|(n, _)| *n == "sec-ch-ua-full-version-list")
            .unwrap();
        assert!(full.contains(r#""Google Chrome";v="126.0.0.0""#));
        assert!(full.contains(r#""Not/A)Brand";v="8""#));
    }
}
