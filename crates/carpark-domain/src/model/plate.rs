//! License plate value type

use carpark_types::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Two letters, optional space, 1-2 digits, 0-2 letters, optional space, four digits
pub const PLATE_PATTERN: &str = r"[A-Z]{2}\s?[0-9]{1,2}[A-Z]{0,2}\s?[0-9]{4}";

static PLATE_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PLATE_PATTERN).expect("plate pattern is valid")
});

static PLATE_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{PLATE_PATTERN}$")).expect("plate pattern is valid")
});

/// A normalized license plate: uppercase, no whitespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plate(String);

impl Plate {
    /// Parse a literal plate supplied by a user
    ///
    /// The whole input must match the plate pattern once whitespace is removed
    /// and letters are uppercased.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return Err(Error::Validation("carNumber is required".to_string()));
        }
        if !PLATE_EXACT.is_match(&normalized) {
            return Err(Error::Validation(format!(
                "Invalid number plate: {}",
                input.trim()
            )));
        }
        Ok(Self(normalized))
    }

    /// Find the first plate in free-form recognized text
    pub fn find_in(text: &str) -> Option<Self> {
        PLATE_SEARCH
            .find(text)
            .map(|m| Self(normalize(m.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Plate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Uppercase and strip whitespace, the key form records are stored under
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_plate() {
        let plate = Plate::parse("MH12AB1234").unwrap();
        assert_eq!(plate.as_str(), "MH12AB1234");
    }

    #[test]
    fn test_parse_normalizes_case_and_spaces() {
        let plate = Plate::parse("  mh 12ab 1234 ").unwrap();
        assert_eq!(plate.as_str(), "MH12AB1234");
    }

    #[test]
    fn test_parse_short_series() {
        assert_eq!(Plate::parse("DL1C1234").unwrap().as_str(), "DL1C1234");
        assert_eq!(Plate::parse("KA051234").unwrap().as_str(), "KA051234");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Plate::parse("random text no plate here").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_parse_rejects_blank() {
        let err = Plate::parse("   ").unwrap_err();
        assert_eq!(err.to_string(), "carNumber is required");
    }

    #[test]
    fn test_parse_rejects_trailing_characters() {
        assert!(Plate::parse("MH12AB12345").is_err());
    }

    #[test]
    fn test_find_in_recognized_text() {
        let text = "INDIA MH 12AB 1234 Maruti";
        assert_eq!(Plate::find_in(text).unwrap().as_str(), "MH12AB1234");
    }

    #[test]
    fn test_find_in_requires_uppercase() {
        assert!(Plate::find_in("mh12ab1234").is_none());
    }

    #[test]
    fn test_normalize_keeps_non_plates() {
        assert_eq!(normalize(" zz 99 "), "ZZ99");
    }

    #[test]
    fn test_find_in_no_plate() {
        assert!(Plate::find_in("random text no plate here").is_none());
    }
}
