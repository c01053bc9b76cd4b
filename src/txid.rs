//! TransactionId - Opaque identity of a database transaction
//!
//! The source database identifies transactions by an opaque byte string.
//! The bytes are never interpreted; they are compared for identity and
//! rendered as lowercase hex wherever a human-readable or serialized
//! form is needed (log output, offset map keys).

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// An opaque transaction identifier.
///
/// Identity is byte equality; ordering exists only so the identifier
/// can key ordered maps deterministically.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TransactionId(Vec<u8>);

impl TransactionId {
    /// Creates a transaction identifier from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the lowercase hex rendering used for display and keys.
    pub fn to_hex(&self) -> String {
        use std::fmt::Write;

        let mut out = String::with_capacity(self.0.len() * 2);
        for byte in &self.0 {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// Parses the hex rendering back into an identifier.
    ///
    /// Returns `None` for odd-length or non-hex input.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() % 2 != 0 {
            return None;
        }
        let mut bytes = Vec::with_capacity(hex.len() / 2);
        let raw = hex.as_bytes();
        for pair in raw.chunks(2) {
            let high = (pair[0] as char).to_digit(16)?;
            let low = (pair[1] as char).to_digit(16)?;
            bytes.push((high * 16 + low) as u8);
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct TransactionIdVisitor;

impl<'de> Visitor<'de> for TransactionIdVisitor {
    type Value = TransactionId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex-encoded transaction identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TransactionId, E> {
        TransactionId::from_hex(value)
            .ok_or_else(|| E::custom(format!("invalid transaction id hex: {value:?}")))
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TransactionIdVisitor)
    }
}
