//! Flat binary table and generated-source emitter
//!
//! The builtin table is a single buffer of `32 * N` bytes; digest `i` lives at
//! `[32 * i, 32 * i + 32)`. Identifiers are not stored: an identifier's
//! trailing big-endian u16 is its position.

use std::fmt;
use std::path::Path;

use crate::constants::{DIGEST_SIZE, IDENTIFIER_SIZE, MAX_ENTRIES};
use crate::identifier::Identifier;
use crate::table::OrderedTable;
use crate::{Digest, Error};

/// Immutable, position-addressed digest table.
///
/// Safe to share between any number of readers once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinTable {
    bytes: Box<[u8]>,
}

impl BuiltinTable {
    /// Flatten an ordered table
    pub fn from_table(table: &OrderedTable) -> Self {
        let mut bytes = Vec::with_capacity(table.len() * DIGEST_SIZE);
        for entry in table {
            bytes.extend_from_slice(&entry.digest);
        }
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Wrap a raw buffer, e.g. one read back from a `.bin` file
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> crate::Result<Self> {
        let bytes = bytes.into();
        if bytes.len() % DIGEST_SIZE != 0 {
            let entries = bytes.len() / DIGEST_SIZE + 1;
            return Err(Error::SizeMismatch {
                expected: entries * DIGEST_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes.len() > MAX_ENTRIES * DIGEST_SIZE {
            return Err(Error::IdentifierRange {
                requested: bytes.len() / DIGEST_SIZE - 1,
            });
        }
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Look up the digest named by a raw 3-byte identifier.
    ///
    /// The prefix byte is ignored. Identifiers past the end of the table are a
    /// normal miss: the caller falls back to full certificate handling.
    pub fn resolve(&self, id: &[u8; IDENTIFIER_SIZE]) -> Option<&Digest> {
        let index = usize::from(u16::from_be_bytes([id[1], id[2]]));
        tracing::trace!(id = %hex::encode(id), index, "Parsed identifier");

        let start = index * DIGEST_SIZE;
        self.bytes
            .get(start..start + DIGEST_SIZE)
            .and_then(|slice| slice.try_into().ok())
    }

    pub fn resolve_identifier(&self, id: &Identifier) -> Option<&Digest> {
        self.resolve(id.as_bytes())
    }

    /// All digests in table order
    pub fn enumerate_all(&self) -> impl Iterator<Item = &Digest> + '_ {
        self.bytes
            .chunks_exact(DIGEST_SIZE)
            .filter_map(|chunk| chunk.try_into().ok())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.bytes.len() / DIGEST_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Load a raw table file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Write the raw buffer atomically
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        crate::atomic::write_atomic(path, &self.bytes)?;
        tracing::info!(
            path = %path.display(),
            entries = self.len(),
            bytes = self.bytes.len(),
            "Wrote binary table"
        );
        Ok(())
    }
}

/// Where a generated table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Date the table was generated (`YYYY-MM-DD`)
    pub generation_date: String,
    /// Version of the trust-store report (`YYYY-MM-DD`)
    pub list_date: String,
    /// Digest algorithm name, when known. Cache documents do not record it.
    pub algorithm: Option<String>,
}

/// Render the table as a self-contained Rust module.
///
/// The module exposes `id_to_hash` and `get_needed_hashes`. Output depends
/// only on the table and provenance, so regenerating is byte-stable.
pub fn render_rust_source(table: &BuiltinTable, provenance: &Provenance) -> String {
    RustSource { table, provenance }.to_string()
}

struct RustSource<'a> {
    table: &'a BuiltinTable,
    provenance: &'a Provenance,
}

/// Bytes per line of the generated array literal
const BYTES_PER_LINE: usize = 16;

/// License block opening every generated module
const LICENSE_HEADER: &str = "\
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Licensed under either of the Apache License, Version 2.0 or the MIT license,
// at your option. This file may not be copied, modified, or distributed
// except according to those terms.
";

impl fmt::Display for RustSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.table.as_bytes();

        f.write_str(LICENSE_HEADER)?;
        writeln!(f)?;
        writeln!(f, "// @generated by builtins-builder. Do not edit by hand.")?;
        writeln!(f, "// Generation Date: {}", self.provenance.generation_date)?;
        writeln!(f, "// Based on list version: {}", self.provenance.list_date)?;
        if let Some(algorithm) = &self.provenance.algorithm {
            writeln!(f, "// Digest algorithm: {}", algorithm)?;
        }
        writeln!(f)?;
        writeln!(f, "/// Number of builtin certificates")?;
        writeln!(f, "pub const ABRIDGED_CERT_COUNT: usize = {};", self.table.len())?;
        writeln!(f)?;
        writeln!(
            f,
            "/// Given an Abridged Cert identifier, look up the hash of the corresponding certificate"
        )?;
        writeln!(f, "pub fn id_to_hash(id: &[u8; 3]) -> Option<&'static [u8; 32]> {{")?;
        writeln!(f, "    let index = usize::from(u16::from_be_bytes([id[1], id[2]]));")?;
        writeln!(f, "    let start = index * 32;")?;
        writeln!(f, "    ABRIDGED_CERT_BYTES")?;
        writeln!(f, "        .get(start..start + 32)")?;
        writeln!(f, "        .and_then(|slice| slice.try_into().ok())")?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        writeln!(f, "/// Hashes needed for this Abridged Certs scheme, in identifier order")?;
        writeln!(
            f,
            "pub fn get_needed_hashes() -> impl Iterator<Item = &'static [u8; 32]> {{"
        )?;
        writeln!(f, "    ABRIDGED_CERT_BYTES")?;
        writeln!(f, "        .chunks_exact(32)")?;
        writeln!(f, "        .filter_map(|chunk| chunk.try_into().ok())")?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        // Flat u8 literal; nested [[u8; 32]; N] literals compile slowly.
        writeln!(f, "static ABRIDGED_CERT_BYTES: [u8; {}] = [", bytes.len())?;
        for line in bytes.chunks(BYTES_PER_LINE) {
            write!(f, "   ")?;
            for byte in line {
                write!(f, " 0x{:02x},", byte)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "];")
    }
}
