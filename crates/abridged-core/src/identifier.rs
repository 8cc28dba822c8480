//! Abridged certificate identifiers and their allocator

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{IDENTIFIER_SIZE, MAX_ENTRIES};
use crate::Error;

/// 3-byte identifier: namespace prefix followed by a big-endian u16 counter.
///
/// Only the counter is meaningful to lookups. The prefix exists so producers can
/// keep separate identifier spaces apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier([u8; IDENTIFIER_SIZE]);

impl Identifier {
    /// Build an identifier from a prefix and counter
    pub fn new(prefix: u8, counter: u16) -> Self {
        let [hi, lo] = counter.to_be_bytes();
        Self([prefix, hi, lo])
    }

    pub fn from_bytes(bytes: [u8; IDENTIFIER_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_SIZE] {
        &self.0
    }

    pub fn prefix(&self) -> u8 {
        self.0[0]
    }

    /// Counter decoded from the trailing two bytes
    pub fn counter(&self) -> u16 {
        u16::from_be_bytes([self.0[1], self.0[2]])
    }

    /// Table position named by this identifier
    pub fn index(&self) -> usize {
        self.counter().into()
    }

    /// Lowercase hex, as stored in cache documents (e.g. `ff0001`)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex, accepting an optional `0x` prefix
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        let bytes: [u8; IDENTIFIER_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            Error::InvalidIdentifier(format!(
                "expected {} bytes, got {}",
                IDENTIFIER_SIZE,
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; IDENTIFIER_SIZE]> for Identifier {
    fn from(bytes: [u8; IDENTIFIER_SIZE]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identifier::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hands out sequential identifiers under one prefix.
///
/// Counters start at zero per allocator. Use a fresh allocator for each
/// generation run so that counter `i` keeps meaning "the i-th record".
#[derive(Debug, Clone)]
pub struct IdentifierAllocator {
    prefix: u8,
    position: usize,
}

impl IdentifierAllocator {
    pub fn new(prefix: u8) -> Self {
        Self { prefix, position: 0 }
    }

    /// Allocate the next identifier.
    ///
    /// Fails once all 65536 counters are used; the counter never wraps.
    pub fn allocate(&mut self) -> crate::Result<Identifier> {
        if self.position >= MAX_ENTRIES {
            return Err(Error::IdentifierRange {
                requested: self.position,
            });
        }
        let counter = u16::try_from(self.position).map_err(|_| Error::IdentifierRange {
            requested: self.position,
        })?;
        self.position += 1;
        Ok(Identifier::new(self.prefix, counter))
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of identifiers handed out so far
    pub fn allocated(&self) -> usize {
        self.position
    }
}
