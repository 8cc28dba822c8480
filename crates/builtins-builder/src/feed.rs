//! Certificate feed loader
//!
//! Reads an already-downloaded trust-store report, converted to JSON:
//!
//! ```json
//! [
//!   { "creation_time": "2019-03-14T18:20:11Z", "certificate": "3082..." }
//! ]
//! ```
//!
//! `certificate` is the hex-encoded DER. Record order in the file does not
//! matter; the table builder sorts by `creation_time`.

use std::path::Path;

use abridged_core::CertificateRecord;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the feed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Registry record creation date
    pub creation_time: DateTime<Utc>,
    /// Hex-encoded DER certificate
    pub certificate: String,
}

impl FeedRecord {
    pub fn to_record(&self) -> anyhow::Result<CertificateRecord> {
        let hex_str = self
            .certificate
            .strip_prefix("0x")
            .unwrap_or(&self.certificate);
        let der = hex::decode(hex_str.trim())
            .with_context(|| format!("invalid certificate hex for record at {}", self.creation_time))?;
        Ok(CertificateRecord::new(self.creation_time, der))
    }
}

/// Parse feed JSON into certificate records
pub fn parse_records(json: &str) -> anyhow::Result<Vec<CertificateRecord>> {
    let rows: Vec<FeedRecord> = serde_json::from_str(json).context("malformed feed JSON")?;
    rows.iter().map(FeedRecord::to_record).collect()
}

/// Load a feed file
pub fn load_records(path: impl AsRef<Path>) -> anyhow::Result<Vec<CertificateRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read feed {}", path.display()))?;
    let records = parse_records(&content)?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        "Loaded certificate feed"
    );

    Ok(records)
}
