use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Wallet account address.
///
/// Addresses are kept exactly as the wallet reported them (hex addresses
/// may carry checksum casing) but compare, hash, and match ASCII
/// case-insensitively, so `0xAbC...` and `0xabc...` name the same account.
///
/// An address is only ever used for advisory ownership checks. Nothing in
/// the ledger verifies that the holder of an address signed anything.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string. Leading/trailing whitespace is trimmed.
    pub fn new(s: impl AsRef<str>) -> Result<Self, TypeError> {
        let s = s.as_ref().trim();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidAddress(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Build a `0x`-prefixed hex address from 20 raw account bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Parse a strict `0x` + 40 hex character account address.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let body = s
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidAddress(s.to_string()))?;
        let bytes = hex::decode(body).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(TypeError::InvalidLength {
                expected: 20,
                actual: bytes.len(),
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for listings: `0x1234...abcd`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }

    /// Case-insensitive substring match, used by record search.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Numeric chain identifier reported by the connected wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Parse from decimal or `0x`-prefixed hex (wallets report the latter).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x") {
            Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
            None => s.parse::<u64>(),
        };
        parsed
            .map(Self)
            .map_err(|e| TypeError::InvalidHex(format!("{s}: {e}")))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
