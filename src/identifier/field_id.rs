//! Technical field identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PREFIX: &str = "g_";
const HEX_DIGITS: usize = 12;

/// True if `name` is exactly `g_` followed by 12 hex digits (any case).
pub fn is_field_id(name: &str) -> bool {
    match name.strip_prefix(PREFIX) {
        Some(hex) => hex.len() == HEX_DIGITS && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field identifier: {0:?}")]
pub struct InvalidFieldId(pub String);

/// A validated technical field identifier.
///
/// Parsing accepts upper-case hex digits and keeps the text as given;
/// generation always emits lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldId(String);

impl FieldId {
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidFieldId> {
        let s = s.into();
        if is_field_id(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidFieldId(s))
        }
    }

    /// Generate a fresh identifier from a random UUID.
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", PREFIX, &hex[..HEX_DIGITS]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FieldId {
    type Err = InvalidFieldId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldId {
    type Error = InvalidFieldId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_shape() {
        assert!(is_field_id("g_1a2b3c4d5e6f"));
        assert!(is_field_id("g_1A2B3C4D5E6F"));
    }

    #[test]
    fn rejects_near_misses() {
        assert!(!is_field_id("g_1a2b3c4d5e6"));
        assert!(!is_field_id("g_1a2b3c4d5e6f0"));
        assert!(!is_field_id("G_1a2b3c4d5e6f"));
        assert!(!is_field_id("g_1a2b3c4d5e6z"));
        assert!(!is_field_id("x_1a2b3c4d5e6f"));
        assert!(!is_field_id(""));
    }

    #[test]
    fn generated_ids_are_lowercase_and_valid() {
        for _ in 0..32 {
            let id = FieldId::generate();
            assert!(is_field_id(id.as_str()));
            assert_eq!(id.as_str(), id.as_str().to_lowercase());
        }
    }

    #[test]
    fn serde_rejects_malformed_ids() {
        let ok: Result<FieldId, _> = serde_json::from_str("\"g_aaaaaaaaaaaa\"");
        assert!(ok.is_ok());
        let bad: Result<FieldId, _> = serde_json::from_str("\"day\"");
        assert!(bad.is_err());
    }
}
