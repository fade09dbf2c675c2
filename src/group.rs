//! Grouping of materialized rows by a field, with optional key renaming.
//!
//! Grouping is a post-materialization reshape, not a query-builder
//! operation: it takes rows the caller already fetched (as JSON values) and
//! buckets them by the value of one field.

use crate::errors::QueryError;
use serde_json::{Map, Value};

/// Grouped rows: an ordered map from group key to an array of rows.
///
/// Insertion order is the first-occurrence order of each key, or the
/// `group_map` order after re-keying.
pub type Groups = Map<String, Value>;

/// Bucket `rows` by the value of `field`, preserving first-occurrence order
/// of group keys.
#[must_use]
pub fn group_rows(rows: &[Value], field: &str) -> Groups {
    let mut groups = Groups::new();
    for row in rows {
        let bucket = groups
            .entry(group_key(row, field))
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = bucket {
            items.push(row.clone());
        }
    }
    groups
}

/// Re-key `groups` through a raw-key → output-key mapping.
///
/// Every `group_map` entry produces an output entry: the group found at the
/// raw key, or an empty array when no such group exists. Groups whose raw
/// key is absent from the mapping are dropped.
///
/// # Errors
///
/// `InvalidGroupMap` when `group_map` is not an object.
pub fn remap_groups(mut groups: Groups, group_map: &Value) -> Result<Groups, QueryError> {
    let Some(mapping) = group_map.as_object() else {
        return Err(QueryError::InvalidGroupMap);
    };

    let mut remapped = Groups::new();
    for (raw_key, output_key) in mapping {
        let group = groups.remove(raw_key).unwrap_or_else(|| Value::Array(Vec::new()));
        remapped.insert(key_string(output_key), group);
    }
    Ok(remapped)
}

/// The group key for one row: the row's `field` value as a string. Strings
/// are used verbatim; null or a missing field becomes the empty key; other
/// values use their JSON rendering.
fn group_key(row: &Value, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
