//! Builds nested TOML tables out of dotted store keys.

use toml::{Table, Value};

/// Splits a dotted key into path segments.
pub fn key_path(key: &str) -> Vec<String> {
    key.split('.').map(str::to_string).collect()
}

/// Inserts `value` at `path`, creating intermediate tables as needed.
///
/// Tables win over scalars: a scalar at a table's path is replaced, and a
/// scalar arriving where a table already sits is dropped.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        if !matches!(table.get(first), Some(Value::Table(_))) {
            table.insert(first.clone(), value);
        }
        return;
    }

    if !matches!(table.get(first), Some(Value::Table(_))) {
        table.insert(first.clone(), Value::Table(Table::new()));
    }

    if let Some(Value::Table(nested)) = table.get_mut(first) {
        merge_at_path(nested, rest, value);
    }
}
