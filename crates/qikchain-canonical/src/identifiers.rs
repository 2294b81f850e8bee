use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("invalid regex"));

/// The all-zero account address, in canonical form.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Account address in canonical (lowercase hex) form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parses `0x` + 40 hex digits in any case and lowercases the result.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let s = value.as_ref();
        if !Self::is_valid(s) {
            return Err(ValidationError::Malformed {
                field: "address",
                value: s.to_string(),
            });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// True when `value` matches the address pattern (case-insensitive hex).
    pub fn is_valid(value: &str) -> bool {
        ADDRESS_PATTERN.is_match(value)
    }

    /// True for the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ADDRESS
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
