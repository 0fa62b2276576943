//! Dialog identity
//!
//! Unforced dialogs are identified by a hash of their creation options, so
//! opening "the same" dialog twice resolves to the same id. The options are
//! first serialized into canonical JSON (object keys sorted, unset fields
//! skipped, every number written as a float), which makes the id independent
//! of field order and number spelling in the source document.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::warn;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use super::{DialogId, DialogOptions};

/// Resolve the id a dialog created from `options` will carry.
///
/// An explicit `options.id` always wins. Otherwise a forced creation gets a
/// random id and an unforced one gets the content hash.
pub fn resolve_id(options: &DialogOptions, force: bool) -> DialogId {
    if let Some(id) = &options.id {
        return id.clone();
    }
    if force {
        random_id()
    } else {
        content_id(options)
    }
}

/// Deterministic id derived from the serialized options.
///
/// Stable for the lifetime of the process; ids are never persisted.
pub fn content_id<T: Serialize>(options: &T) -> DialogId {
    match canonical_json(options) {
        Ok(canonical) => {
            let mut hasher = DefaultHasher::new();
            canonical.hash(&mut hasher);
            format!("{:016x}", hasher.finish())
        }
        Err(e) => {
            warn!("Options could not be serialized for hashing, using a random id: {}", e);
            random_id()
        }
    }
}

pub fn random_id() -> DialogId {
    Uuid::new_v4().to_string()
}

/// Serialize `value` to JSON with every object's keys in sorted order and
/// every number in float form, so `1` and `1.0` hash alike.
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&canonicalize(value))
}

fn canonicalize(value: Value) -> Value {
    match value {
        // `Map` keeps insertion order when serde_json's `preserve_order`
        // feature is enabled anywhere in the build, so sort explicitly.
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Number(number) => match number.as_f64().and_then(Number::from_f64) {
            Some(float) => Value::Number(float),
            None => Value::Number(number),
        },
        other => other,
    }
}
