//! CBOR serialization for platform state and command hashing.
//!
//! - CBOR via `ciborium` for snapshots and transaction ids
//! - Deterministic output for identical values
//! - New fields carry `#[serde(default)]` so older snapshots still load

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Serialization errors.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// CBOR encoding failed.
    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    /// CBOR decoding failed.
    #[error("CBOR decoding failed: {0}")]
    Decode(String),
}

/// Serialize to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)
        .map_err(|e| SerializationError::Encode(format!("{:?}", e)))?;
    Ok(bytes)
}

/// Deserialize from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    ciborium::from_reader(bytes).map_err(|e| SerializationError::Decode(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::token::Amount;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Balances {
        holders: BTreeMap<Account, Amount>,
        label: String,
    }

    fn sample() -> Balances {
        let mut holders = BTreeMap::new();
        holders.insert(Account::from_bytes([1; 32]), 10u128.pow(25));
        holders.insert(Account::from_bytes([2; 32]), u128::MAX);
        Balances {
            holders,
            label: "oss".to_string(),
        }
    }

    #[test]
    fn test_wide_amounts_survive_encoding() {
        let original = sample();
        let bytes = to_cbor(&original).unwrap();
        let recovered: Balances = from_cbor(&bytes).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_cbor_deterministic() {
        assert_eq!(to_cbor(&sample()).unwrap(), to_cbor(&sample()).unwrap());
    }

    #[test]
    fn test_cbor_backward_compatibility() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct V1 {
            sequence: u64,
        }

        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct V2 {
            sequence: u64,
            #[serde(default)]
            paused: bool,
        }

        let bytes = to_cbor(&V1 { sequence: 7 }).unwrap();
        let v2: V2 = from_cbor(&bytes).unwrap();
        assert_eq!(v2.sequence, 7);
        assert!(!v2.paused);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<Balances, _> = from_cbor(&[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(SerializationError::Decode(_))));
    }
}
