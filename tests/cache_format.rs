//! Tests for the JSON cache document format

use abridged_core::{
    BuiltinTable, CacheDocument, Error, GeneratorConfig, Identifier, OrderedTable, TableEntry,
};
use builtins_builder::{parse_records, BuiltinsBuilder};

#[test]
fn test_import_single_entry_document() {
    let digest_hex = "0123456789abcdef".repeat(4);
    let json = serde_json::json!({
        "list_date": "2024-01-01",
        "creation_date": "2024-01-02",
        "data": { "ff0000": &digest_hex },
    })
    .to_string();

    let doc = CacheDocument::from_json(&json).unwrap();
    assert_eq!(doc.table.len(), 1);

    let entry = doc.table.get(0).unwrap();
    assert_eq!(entry.identifier.as_bytes(), &[0xff, 0x00, 0x00]);
    assert_eq!(hex::encode(entry.digest), digest_hex);
}

#[test]
fn test_missing_creation_date_rejected() {
    let json = serde_json::json!({
        "list_date": "2024-01-01",
        "data": { "ff0000": "00".repeat(32) },
    })
    .to_string();

    assert!(matches!(
        CacheDocument::from_json(&json),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_document_has_exactly_three_fields() {
    let table = OrderedTable::from_entries(vec![TableEntry {
        identifier: Identifier::new(0xff, 0),
        digest: [0x11; 32],
    }])
    .unwrap();
    let json = CacheDocument::new(table, "2024-01-01", "2024-01-02")
        .to_json()
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(object["list_date"], "2024-01-01");
    assert_eq!(object["creation_date"], "2024-01-02");
    assert_eq!(object["data"]["ff0000"], "11".repeat(32));
}

#[test]
fn test_builder_cache_roundtrip_is_byte_exact() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let feed = r#"[
        {"creation_time": "2021-01-01T00:00:00Z", "certificate": "03"},
        {"creation_time": "2020-01-01T00:00:00Z", "certificate": "02"},
        {"creation_time": "2020-01-01T00:00:00Z", "certificate": "01"}
    ]"#;

    let config = GeneratorConfig {
        output: dir.path().join("builtins.rs"),
        cache_output: Some(cache_path.clone()),
        ..GeneratorConfig::default()
    };
    let fresh = BuiltinsBuilder::from_records(config, parse_records(feed).unwrap())
        .list_date("2024-02-01")
        .generation_date("2024-02-02")
        .build()
        .unwrap();

    let doc = CacheDocument::load(&cache_path).unwrap();
    assert_eq!(doc.list_date, "2024-02-01");
    assert_eq!(doc.creation_date, "2024-02-02");
    assert_eq!(doc.table, fresh.table);
    assert_eq!(BuiltinTable::from_table(&doc.table), fresh.binary);
}
