//! Actor identities.
//!
//! An `Account` is an opaque 32-byte identity. Every command is attributed to
//! exactly one account; the ledger never sees the identity string it was
//! derived from.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account identity (address-equivalent).
///
/// Serialized as its `0x`-prefixed hex form so deployment records stay readable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Account([u8; 32]);

/// Account parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account must be 64 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("Account is not valid hex: {0}")]
    InvalidHex(String),
}

impl Account {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Derive an account from a human identity (wallet label, component name).
    ///
    /// The same identity always maps to the same account.
    pub fn from_identity(identity: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"oss-rewards/account/v1");
        hasher.update(identity.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Short form for logs and tables: `0x1234…abcd`.
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        format!("0x{}…{}", &full[..4], &full[full.len() - 4..])
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self.short())
    }
}

impl FromStr for Account {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return Err(AccountError::InvalidLength(digits.len()));
        }
        let bytes = hex::decode(digits).map_err(|e| AccountError::InvalidHex(e.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Resolve a CLI-supplied actor: either a hex address or an identity label.
pub fn resolve(input: &str) -> Account {
    input
        .parse()
        .unwrap_or_else(|_| Account::from_identity(input))
}
