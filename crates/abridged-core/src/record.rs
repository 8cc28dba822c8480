//! Certificate records as delivered by the feed

use chrono::{DateTime, Utc};

/// One certificate from the trust-store report.
///
/// `creation_time` is the registry's record creation date. It decides the
/// certificate's position (and therefore its identifier) in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub creation_time: DateTime<Utc>,
    /// DER-encoded certificate
    pub payload: Vec<u8>,
}

impl CertificateRecord {
    pub fn new(creation_time: DateTime<Utc>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            creation_time,
            payload: payload.into(),
        }
    }
}
