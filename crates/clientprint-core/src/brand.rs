use serde::{Deserialize, Serialize};

/// Slot orders, indexed by `major % 6`. Entry `i` is the slot of
/// [grease, "Chromium", brand][i].
const BRAND_PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

const GREASY_CHARS: [char; 11] = [' ', '(', ':', '-', '.', '/', ')', ';', '=', '?', '_'];

const GREASY_CHARS_LEGACY: [char; 3] = [' ', ' ', ';'];

const GREASED_VERSIONS: [&str; 3] = ["8", "99", "24"];

const LEGACY_GREASED_VERSION: &str = GREASED_VERSIONS[1];

/// Inputs of [`synthesize_brand_header`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandHeaderSpec {
    /// Embedder brand such as "Google Chrome"; empty for plain Chromium
    pub brand: String,
    pub major_version: u32,
    /// Use the pre-M103 GREASE spelling
    #[serde(default)]
    pub legacy: bool,
    /// Append `.0.0.0` to the version of every real brand
    #[serde(default)]
    pub full_version_suffix: bool,
}

impl BrandHeaderSpec {
    pub fn new(brand: impl Into<String>, major_version: u32) -> Self {
        Self {
            brand: brand.into(),
            major_version,
            legacy: false,
            full_version_suffix: false,
        }
    }

    pub fn render(&self) -> String {
        synthesize_brand_header(
            &self.brand,
            self.major_version,
            self.legacy,
            self.full_version_suffix,
        )
    }
}

/// Build the brand list header value Chromium `major_version` would send.
///
/// Chromium inserts a GREASE brand next to "Chromium" and the embedder's own
/// brand, and derives both the GREASE spelling and the slot order from the
/// major version, as `components/embedder_support/user_agent_utils.cc` does.
///
/// ```
/// use clientprint_core::brand::synthesize_brand_header;
///
/// assert_eq!(
///     synthesize_brand_header("Brave", 126, false, false),
///     r#""Not/A)Brand";v="8", "Chromium";v="126", "Brave";v="126""#,
/// );
/// ```
pub fn synthesize_brand_header(
    brand: &str,
    major_version: u32,
    legacy: bool,
    full_version_suffix: bool,
) -> String {
    let major = major_version as usize;
    let order = BRAND_PERMUTATIONS[major % BRAND_PERMUTATIONS.len()];
    let suffix = if full_version_suffix { ".0.0.0" } else { "" };

    let grease = if legacy {
        format!(
            "\"{}Not{}A{}Brand\";v=\"{}\"",
            GREASY_CHARS_LEGACY[order[0]],
            GREASY_CHARS_LEGACY[order[1]],
            GREASY_CHARS_LEGACY[order[2]],
            LEGACY_GREASED_VERSION,
        )
    } else {
        format!(
            "\"Not{}A{}Brand\";v=\"{}\"",
            GREASY_CHARS[major % GREASY_CHARS.len()],
            GREASY_CHARS[(major + 1) % GREASY_CHARS.len()],
            GREASED_VERSIONS[major % GREASED_VERSIONS.len()],
        )
    };
    let chromium = brand_entry("Chromium", major_version, suffix);

    let slots = if brand.is_empty() {
        let mut slots = vec![String::new(); 2];
        slots[major % 2] = grease;
        slots[(major + 1) % 2] = chromium;
        slots
    } else {
        let mut slots = vec![String::new(); 3];
        slots[order[0]] = grease;
        slots[order[1]] = chromium;
        slots[order[2]] = brand_entry(brand, major_version, suffix);
        slots
    };

    slots.join(", ")
}

fn brand_entry(name: &str, major_version: u32, suffix: &str) -> String {
    format!("\"{}\";v=\"{}{}\"", name, major_version, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brave_126() {
        assert_eq!(
            synthesize_brand_header("Brave", 126, false, false),
            r#""Not/A)Brand";v="8", "Chromium";v="126", "Brave";v="126""#
        );
    }

    #[test]
    fn test_permuted_orders() {
        // 131 % 6 == 5: brand, Chromium, grease
        assert_eq!(
            synthesize_brand_header("Google Chrome", 131, false, false),
            r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#
        );
        // 124 % 6 == 4: Chromium, brand, grease
        assert_eq!(
            synthesize_brand_header("Google Chrome", 124, false, false),
            r#""Chromium";v="124", "Google Chrome";v="124", "Not-A.Brand";v="99""#
        );
    }

    #[test]
    fn test_full_version_suffix() {
        assert_eq!(
            synthesize_brand_header("Brave", 126, false, true),
            r#""Not/A)Brand";v="8", "Chromium";v="126.0.0.0", "Brave";v="126.0.0.0""#
        );
    }

    #[test]
    fn test_legacy_spelling() {
        // 112 % 6 == 4 → order [2, 0, 1]
        assert_eq!(
            synthesize_brand_header("Brave", 112, true, false),
            r#""Chromium";v="112", "Brave";v="112", ";Not A Brand";v="99""#
        );
        // 126 % 6 == 0 → order [0, 1, 2]
        assert_eq!(
            synthesize_brand_header("Brave", 126, true, false),
            r#"" Not A;Brand";v="99", "Chromium";v="126", "Brave";v="126""#
        );
    }

    #[test]
    fn test_without_brand() {
        assert_eq!(
            synthesize_brand_header("", 126, false, false),
            r#""Not/A)Brand";v="8", "Chromium";v="126""#
        );
        assert_eq!(
            synthesize_brand_header("", 127, false, false),
            r#""Chromium";v="127", "Not)A;Brand";v="99""#
        );
    }

    #[test]
    fn test_deterministic() {
        for major in 100..140 {
            let spec = BrandHeaderSpec::new("Microsoft Edge", major);
            assert_eq!(spec.render(), spec.render());
        }
    }

    #[test]
    fn test_every_major_has_three_slots() {
        for major in 0..600 {
            let header = synthesize_brand_header("Brave", major, false, false);
            assert_eq!(header.matches(";v=").count(), 3, "major {}", major);
            assert!(header.contains("Brand\";v="));
        }
    }
}
