use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::validation::ValidationError;

static SHA256_B64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{43}$").expect("invalid regex"));

/// Hash function behind an artifact fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256.
    #[serde(rename = "sha-256")]
    Sha256,
}

impl DigestAlg {
    /// Label used in serialized and displayed digests.
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlg::Sha256 => "sha-256",
        }
    }
}

/// Fingerprint of an artifact's exact bytes; displays as `sha-256:<b64>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    /// Hash function.
    pub alg: DigestAlg,
    /// Hash bytes, base64url without padding.
    pub b64: String,
}

impl Digest {
    /// SHA-256 over `bytes`.
    pub fn sha256(bytes: &[u8]) -> Self {
        Digest {
            alg: DigestAlg::Sha256,
            b64: URL_SAFE_NO_PAD.encode(Sha256::digest(bytes)),
        }
    }

    /// True when `bytes` hash to this digest.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        match self.alg {
            DigestAlg::Sha256 => Digest::sha256(bytes) == *self,
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alg.as_str(), self.b64)
    }
}

impl FromStr for Digest {
    type Err = ValidationError;

    /// Parses the displayed `sha-256:<b64>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::Malformed {
            field: "digest",
            value: s.to_string(),
        };
        let b64 = s
            .strip_prefix(DigestAlg::Sha256.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(malformed)?;
        if !SHA256_B64.is_match(b64) {
            return Err(malformed());
        }
        Ok(Digest {
            alg: DigestAlg::Sha256,
            b64: b64.to_string(),
        })
    }
}
