// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-place deep merge of partial snapshots.
//!
//! Semantics, per key present in `source`:
//! - object onto object: recurse
//! - array: replace wholesale (peer lists are always sent in full)
//! - anything else, `null` included: overwrite
//!
//! Keys absent from `source` are never touched. Absence is the only way to
//! say "no update"; an explicit `null` means "no data" and replaces.

use serde_json::{Map, Value};

/// Merge `source` into `target` in place and return `target` for chaining.
pub fn merge<'a>(target: &'a mut Map<String, Value>, source: &Map<String, Value>) -> &'a mut Map<String, Value> {
    for (key, incoming) in source {
        match incoming {
            Value::Object(src_obj) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(dst_obj) = slot {
                    merge(dst_obj, src_obj);
                }
            }
            // Arrays and scalars both land as a fresh copy.
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
    target
}

/// Merge for arbitrary roots. Two objects merge; any other pairing replaces.
pub fn merge_value<'a>(target: &'a mut Value, source: &Value) -> &'a mut Value {
    match (&mut *target, source) {
        (Value::Object(dst), Value::Object(src)) => {
            merge(dst, src);
        }
        _ => *target = source.clone(),
    }
    target
}
