//! Integration tests for the redb backend: prefix scans, logical table
//! isolation, and transaction visibility.

use neardb_storage::backends::RedbEngine;
use neardb_storage::{Scan, StorageEngine, Transaction};

fn seeded_engine(entries: &[(&str, &[u8], &[u8])]) -> RedbEngine {
    let engine = RedbEngine::in_memory().expect("in-memory db");
    let mut tx = engine.begin_write().expect("begin write");
    for (table, key, value) in entries {
        tx.put(table, key, value).expect("put");
    }
    tx.commit().expect("commit");
    engine
}

fn collect(scan: &mut impl Scan) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut out = Vec::new();
    while let Some(kv) = scan.next().expect("scan") {
        out.push(kv);
    }
    out
}

#[test]
fn scan_returns_keys_in_order() {
    let engine = seeded_engine(&[
        ("t", b"c", b"3"),
        ("t", b"a", b"1"),
        ("t", b"b", b"2"),
    ]);

    let tx = engine.begin_read().expect("begin read");
    let mut scan = tx.scan_prefix("t", b"").expect("scan");
    let entries = collect(&mut scan);

    assert_eq!(
        entries,
        vec![
            (b"a".to_vec(), b"1".to_vec()),
            (b"b".to_vec(), b"2".to_vec()),
            (b"c".to_vec(), b"3".to_vec()),
        ]
    );
}

#[test]
fn scan_respects_prefix() {
    let engine = seeded_engine(&[
        ("t", b"\x00\x01a", b"in"),
        ("t", b"\x00\x01b", b"in"),
        ("t", b"\x00\x02a", b"out"),
        ("t", b"\x01\x01a", b"out"),
    ]);

    let tx = engine.begin_read().expect("begin read");
    let mut scan = tx.scan_prefix("t", b"\x00\x01").expect("scan");
    let entries = collect(&mut scan);

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|(k, _)| k.starts_with(b"\x00\x01")));
}

#[test]
fn scan_isolated_between_logical_tables() {
    let engine = seeded_engine(&[("alpha", b"k", b"a"), ("beta", b"k", b"b")]);

    let tx = engine.begin_read().expect("begin read");
    let mut scan = tx.scan_prefix("alpha", b"").expect("scan");
    let entries = collect(&mut scan);

    assert_eq!(entries, vec![(b"k".to_vec(), b"a".to_vec())]);
}

#[test]
fn scan_empty_prefix_on_missing_table() {
    let engine = RedbEngine::in_memory().expect("in-memory db");
    let tx = engine.begin_read().expect("begin read");
    let mut scan = tx.scan_prefix("nothing", b"").expect("scan");
    assert!(scan.next().expect("scan").is_none());
}

#[test]
fn scan_crosses_batch_boundaries() {
    // More entries than one internal batch, to force continuation fetches.
    let engine = RedbEngine::in_memory().expect("in-memory db");
    let total: u32 = 3000;

    {
        let mut tx = engine.begin_write().expect("begin write");
        for i in 0..total {
            tx.put("t", &i.to_be_bytes(), b"v").expect("put");
        }
        tx.commit().expect("commit");
    }

    let tx = engine.begin_read().expect("begin read");
    let mut scan = tx.scan_prefix("t", b"").expect("scan");
    let entries = collect(&mut scan);

    assert_eq!(entries.len(), total as usize);
    // Spot-check ordering across the batch seams.
    for (i, (key, _)) in entries.iter().enumerate() {
        assert_eq!(key.as_slice(), (i as u32).to_be_bytes());
    }
}

#[test]
fn write_transaction_sees_own_writes_in_scan() {
    let engine = seeded_engine(&[("t", b"a", b"old")]);

    let mut tx = engine.begin_write().expect("begin write");
    tx.put("t", b"b", b"new").expect("put");

    let mut scan = tx.scan_prefix("t", b"").expect("scan");
    let entries = collect(&mut scan);
    assert_eq!(entries.len(), 2);
}

#[test]
fn read_snapshot_ignores_later_commits() {
    let engine = seeded_engine(&[("t", b"a", b"1")]);

    let reader = engine.begin_read().expect("begin read");

    {
        let mut tx = engine.begin_write().expect("begin write");
        tx.put("t", b"b", b"2").expect("put");
        tx.commit().expect("commit");
    }

    let mut scan = reader.scan_prefix("t", b"").expect("scan");
    let entries = collect(&mut scan);
    assert_eq!(entries.len(), 1, "snapshot must not see the later commit");
}

#[test]
fn delete_reports_existence() {
    let engine = seeded_engine(&[("t", b"a", b"1")]);

    let mut tx = engine.begin_write().expect("begin write");
    assert!(tx.delete("t", b"a").expect("delete"));
    assert!(!tx.delete("t", b"a").expect("delete"));
    assert!(!tx.delete("t", b"missing").expect("delete"));
    tx.commit().expect("commit");
}

#[test]
fn read_only_transaction_rejects_writes() {
    let engine = RedbEngine::in_memory().expect("in-memory db");
    let mut tx = engine.begin_read().expect("begin read");

    assert!(tx.put("t", b"k", b"v").is_err());
    assert!(tx.delete("t", b"k").is_err());
}

#[test]
fn file_backed_engine_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.redb");

    {
        let engine = RedbEngine::open(&path).expect("open");
        let mut tx = engine.begin_write().expect("begin write");
        tx.put("t", b"k", b"v").expect("put");
        tx.commit().expect("commit");
    }

    let engine = RedbEngine::open(&path).expect("reopen");
    let tx = engine.begin_read().expect("begin read");
    assert_eq!(tx.get("t", b"k").expect("get"), Some(b"v".to_vec()));
}
