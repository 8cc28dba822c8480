//! Ordered identifier -> digest table and its builder

use crate::digest::DigestEngine;
use crate::identifier::{Identifier, IdentifierAllocator};
use crate::record::CertificateRecord;
use crate::{Digest, Error};

/// One identifier bound to one certificate digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub identifier: Identifier,
    pub digest: Digest,
}

/// Position-indexed table where `entries[i].identifier.counter() == i`.
///
/// Both construction paths (`from_entries` and `TableBuilder::build`) reject
/// input that would break the invariant, so the emitted binary can drop
/// identifiers entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedTable {
    entries: Vec<TableEntry>,
}

impl OrderedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from entries in any order.
    ///
    /// Entries are sorted by counter; the result must cover `0..N` exactly once.
    pub fn from_entries(mut entries: Vec<TableEntry>) -> crate::Result<Self> {
        entries.sort_by_key(|e| e.identifier.counter());

        for (position, entry) in entries.iter().enumerate() {
            let counter = entry.identifier.index();
            if counter != position {
                return Err(Error::Validation(if counter < position {
                    format!("duplicate identifier counter {}", counter)
                } else {
                    format!(
                        "identifier counters are not contiguous: missing {} (next is {})",
                        position, entry.identifier
                    )
                }));
            }
        }

        Ok(Self { entries })
    }

    fn push(&mut self, entry: TableEntry) -> crate::Result<()> {
        let position = self.entries.len();
        if entry.identifier.index() != position {
            return Err(Error::Validation(format!(
                "identifier {} does not match table position {}",
                entry.identifier, position
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TableEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a OrderedTable {
    type Item = &'a TableEntry;
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Orders certificate records and binds each to a fresh identifier
pub struct TableBuilder<D> {
    engine: D,
}

impl<D: DigestEngine> TableBuilder<D> {
    pub fn new(engine: D) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &D {
        &self.engine
    }

    /// Build the ordered table.
    ///
    /// Records are stable-sorted by creation time, so records sharing a
    /// timestamp keep their input order. The allocator must be fresh: counter
    /// `i` has to name the `i`-th record. Fails if the record count exceeds the
    /// allocator's capacity.
    pub fn build(
        &self,
        records: impl IntoIterator<Item = CertificateRecord>,
        allocator: &mut IdentifierAllocator,
    ) -> crate::Result<OrderedTable> {
        if allocator.allocated() != 0 {
            return Err(Error::AllocatorInUse {
                allocated: allocator.allocated(),
            });
        }

        let mut records: Vec<CertificateRecord> = records.into_iter().collect();
        records.sort_by_key(|r| r.creation_time);

        let mut table = OrderedTable::new();
        for record in &records {
            let digest = self.engine.digest(&record.payload);
            let identifier = allocator.allocate()?;
            table.push(TableEntry { identifier, digest })?;
        }

        tracing::debug!(
            entries = table.len(),
            algorithm = self.engine.name(),
            prefix = allocator.prefix(),
            "Built ordered table"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_ENTRIES;
    use crate::digest::Sha256Engine;
    use chrono::{TimeZone, Utc};

    fn record(secs: i64, payload: &[u8]) -> CertificateRecord {
        CertificateRecord::new(Utc.timestamp_opt(secs, 0).unwrap(), payload)
    }

    fn build(records: Vec<CertificateRecord>) -> OrderedTable {
        TableBuilder::new(Sha256Engine)
            .build(records, &mut IdentifierAllocator::new(0xff))
            .unwrap()
    }

    #[test]
    fn test_build_orders_by_creation_time() {
        let table = build(vec![
            record(300, b"C"),
            record(100, b"A"),
            record(200, b"B"),
        ]);

        assert_eq!(table.len(), 3);
        for (i, payload) in [b"A", b"B", b"C"].iter().enumerate() {
            let entry = table.get(i).unwrap();
            assert_eq!(entry.identifier, Identifier::new(0xff, i as u16));
            assert_eq!(entry.digest, Sha256Engine.digest(*payload));
        }
    }

    #[test]
    fn test_build_is_stable_for_equal_timestamps() {
        let table = build(vec![
            record(100, b"first"),
            record(50, b"early"),
            record(100, b"second"),
            record(100, b"third"),
        ]);

        let expected: Vec<Digest> = [&b"early"[..], &b"first"[..], &b"second"[..], &b"third"[..]]
            .iter()
            .map(|p| Sha256Engine.digest(p))
            .collect();
        let actual: Vec<Digest> = table.iter().map(|e| e.digest).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_build_independent_of_input_order() {
        let forward = build(vec![record(1, b"x"), record(2, b"y"), record(3, b"z")]);
        let reversed = build(vec![record(3, b"z"), record(2, b"y"), record(1, b"x")]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_build_empty() {
        let table = build(Vec::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_build_too_many_records() {
        let records: Vec<_> = (0..=MAX_ENTRIES as i64).map(|i| record(i, b"")).collect();
        let result = TableBuilder::new(Sha256Engine)
            .build(records, &mut IdentifierAllocator::new(0xff));
        assert!(matches!(result, Err(Error::IdentifierRange { .. })));
    }

    #[test]
    fn test_build_rejects_used_allocator() {
        let mut allocator = IdentifierAllocator::new(0xff);
        allocator.allocate().unwrap();

        let result = TableBuilder::new(Sha256Engine).build(vec![record(1, b"A")], &mut allocator);
        assert!(matches!(result, Err(Error::AllocatorInUse { allocated: 1 })));
        // Nothing more was handed out
        assert_eq!(allocator.allocated(), 1);
    }

    #[test]
    fn test_push_checks_position() {
        let mut table = OrderedTable::new();
        table
            .push(TableEntry { identifier: Identifier::new(0xff, 0), digest: [0; 32] })
            .unwrap();

        let result = table.push(TableEntry { identifier: Identifier::new(0xff, 2), digest: [2; 32] });
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_entries_sorts_by_counter() {
        let entries = vec![
            TableEntry { identifier: Identifier::new(0xff, 1), digest: [1; 32] },
            TableEntry { identifier: Identifier::new(0xff, 0), digest: [0; 32] },
        ];
        let table = OrderedTable::from_entries(entries).unwrap();
        assert_eq!(table.get(0).unwrap().digest, [0; 32]);
        assert_eq!(table.get(1).unwrap().digest, [1; 32]);
    }

    #[test]
    fn test_from_entries_rejects_gaps_and_duplicates() {
        let gap = vec![
            TableEntry { identifier: Identifier::new(0xff, 0), digest: [0; 32] },
            TableEntry { identifier: Identifier::new(0xff, 2), digest: [2; 32] },
        ];
        assert!(matches!(OrderedTable::from_entries(gap), Err(Error::Validation(_))));

        let duplicate = vec![
            TableEntry { identifier: Identifier::new(0xff, 0), digest: [0; 32] },
            TableEntry { identifier: Identifier::new(0xfe, 0), digest: [1; 32] },
        ];
        assert!(matches!(
            OrderedTable::from_entries(duplicate),
            Err(Error::Validation(_))
        ));
    }
}
