// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Merge laws over a handful of hand-picked documents.

use serde_json::{json, Map, Value};

use crate::merge::merge;
use crate::state::CanonicalState;

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

fn targets() -> Vec<Map<String, Value>> {
    vec![
        Map::new(),
        obj(json!({ "a": 1 })),
        obj(json!({ "a": { "b": [1, 2], "c": null }, "d": "x" })),
        CanonicalState::new().document().clone(),
    ]
}

fn sources() -> Vec<Map<String, Value>> {
    vec![
        Map::new(),
        obj(json!({ "a": null })),
        obj(json!({ "a": { "b": [], "e": { "f": 1.5 } } })),
        obj(json!({
            "generalStats": { "inboundCount": 5, "outboundCount": 3, "totalPeers": 8 },
            "inboundPeer": [{ "id": 1 }],
            "block": null
        })),
    ]
}

#[test]
fn test_merge_is_idempotent() {
    for t in targets() {
        for s in sources() {
            let mut once = t.clone();
            merge(&mut once, &s);
            let mut twice = once.clone();
            merge(&mut twice, &s);
            assert_eq!(once, twice, "target {:?} source {:?}", t, s);
        }
    }
}

#[test]
fn test_merge_preserves_untouched_keys() {
    for t in targets() {
        for s in sources() {
            let mut merged = t.clone();
            merge(&mut merged, &s);
            for (k, v) in &t {
                if !s.contains_key(k) {
                    assert_eq!(merged.get(k), Some(v), "key {k} changed");
                }
            }
        }
    }
}

#[test]
fn test_merge_overwrites_on_null() {
    let mut target = obj(json!({ "a": 1 }));
    merge(&mut target, &obj(json!({ "a": null })));
    assert_eq!(target["a"], Value::Null);
}

#[test]
fn test_merge_returns_target_for_chaining() {
    let mut target = Map::new();
    let len = merge(&mut target, &obj(json!({ "a": 1 })))
        .len();
    assert_eq!(len, 1);
}
