//! JSON cache of a generated table
//!
//! Lets a table be regenerated without fetching the trust-store report again:
//!
//! ```json
//! {
//!   "list_date": "2024-01-01",
//!   "creation_date": "2024-01-02",
//!   "data": { "ff0000": "<64 hex chars>", "ff0001": "..." }
//! }
//! ```
//!
//! `data` is unordered. Each identifier carries its own position, so import
//! restores table order by counter rather than by document order.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DIGEST_SIZE;
use crate::identifier::Identifier;
use crate::table::{OrderedTable, TableEntry};
use crate::{Digest, Error};

/// A table snapshot plus its provenance dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDocument {
    /// Date of the trust-store report the table was built from
    pub list_date: String,
    /// Date the table was generated
    pub creation_date: String,
    pub table: OrderedTable,
}

/// On-disk shape. Fields are optional so a missing one becomes a validation
/// error naming the field instead of a generic parse failure.
#[derive(Debug, Serialize, Deserialize)]
struct RawCacheDocument {
    list_date: Option<String>,
    creation_date: Option<String>,
    data: Option<BTreeMap<String, String>>,
}

impl CacheDocument {
    /// Snapshot a table for export
    pub fn new(
        table: OrderedTable,
        list_date: impl Into<String>,
        creation_date: impl Into<String>,
    ) -> Self {
        Self {
            list_date: list_date.into(),
            creation_date: creation_date.into(),
            table,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        let data = self
            .table
            .iter()
            .map(|entry| (entry.identifier.to_hex(), hex::encode(entry.digest)))
            .collect();

        let raw = RawCacheDocument {
            list_date: Some(self.list_date.clone()),
            creation_date: Some(self.creation_date.clone()),
            data: Some(data),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let raw: RawCacheDocument = serde_json::from_str(json)?;

        let data = raw.data.ok_or_else(|| missing("data"))?;
        let list_date = required_date(raw.list_date, "list_date")?;
        let creation_date = required_date(raw.creation_date, "creation_date")?;

        let mut entries = Vec::with_capacity(data.len());
        for (id_hex, digest_hex) in &data {
            let identifier = Identifier::from_hex(id_hex).map_err(|e| {
                Error::Validation(format!("bad identifier {:?}: {}", id_hex, e))
            })?;
            let digest = decode_digest(digest_hex).map_err(|e| {
                Error::Validation(format!("bad digest for {}: {}", identifier, e))
            })?;
            entries.push(TableEntry { identifier, digest });
        }

        let table = OrderedTable::from_entries(entries)?;
        Ok(Self {
            list_date,
            creation_date,
            table,
        })
    }

    /// Load a cache file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let doc = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            entries = doc.table.len(),
            list_date = %doc.list_date,
            "Loaded cache document"
        );

        Ok(doc)
    }

    /// Save atomically to a cache file
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let content = self.to_json()?;
        crate::atomic::write_atomic(path, content.as_bytes())?;

        tracing::info!(
            path = %path.display(),
            entries = self.table.len(),
            "Saved cache document"
        );

        Ok(())
    }
}

fn missing(field: &str) -> Error {
    Error::Validation(format!("missing required field `{}`", field))
}

fn required_date(value: Option<String>, field: &str) -> crate::Result<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(missing(field)),
    }
}

fn decode_digest(s: &str) -> crate::Result<Digest> {
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| Error::SizeMismatch {
        expected: DIGEST_SIZE,
        actual: len,
    })
}
