//! Physical table layout and key encoding for the redb backend.
//!
//! Redb wants statically named tables, while the storage traits expose
//! dynamic logical table names. All data therefore lives in one physical
//! table, with the logical table name prefixed onto every key:
//!
//! `<table name> 0x00 <logical key>`
//!
//! Logical table names are ASCII identifiers and never contain the
//! separator byte, so the first `0x00` always terminates the name. Logical
//! keys may contain arbitrary bytes (including `0x00`).

use redb::TableDefinition;

/// The single physical table holding all logical tables.
pub const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("neardb_data");

/// Separator between the logical table name and the key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Encode a logical table name and key into a physical key.
pub fn encode_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(table.len() + 1 + key.len());
    encoded.extend_from_slice(table.as_bytes());
    encoded.push(KEY_SEPARATOR);
    encoded.extend_from_slice(key);
    encoded
}

/// Decode a physical key into its logical table name and key.
///
/// Returns `None` if the separator is missing or the table name is not
/// valid UTF-8.
pub fn decode_key(encoded: &[u8]) -> Option<(&str, &[u8])> {
    let sep = encoded.iter().position(|&b| b == KEY_SEPARATOR)?;
    let table = std::str::from_utf8(&encoded[..sep]).ok()?;
    Some((table, &encoded[sep + 1..]))
}

/// First physical key that can belong to a logical table.
pub fn table_start_key(table: &str) -> Vec<u8> {
    encode_key(table, &[])
}

/// First physical key past the end of a logical table.
pub fn table_end_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 1);
    key.extend_from_slice(table.as_bytes());
    key.push(KEY_SEPARATOR + 1);
    key
}

/// Smallest key strictly greater than every key starting with `prefix`.
///
/// Returns `None` when the prefix is all `0xFF` bytes, in which case there
/// is no finite successor and the caller must fall back to the table end.
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(&last) = end.last() {
        if last < 0xFF {
            *end.last_mut().expect("non-empty") = last + 1;
            return Some(end);
        }
        end.pop();
    }
    None
}
