//! Key-ordered upsert.

use serde_json::{Map, Value};
use tracing::warn;

use super::document::{insert_at, key_position, remove_key};

/// What [`upsert`] did with the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  /// The key held a container and the value was merged into it.
  Merged,
  /// The key was placed directly after the anchor.
  Inserted,
  /// The anchor was absent, so a new key was appended.
  Appended,
  /// The anchor was absent and the existing value was replaced in place.
  Replaced,
  /// The key and the anchor are the same; nothing changed.
  Ignored,
}

/// Insert `key: value` into `map` directly after `anchor`, or merge it into
/// an existing container.
///
/// - A list under `key` is extended with `value` (its items if `value` is a
///   list); an object under `key` takes over the entries of an object `value`.
/// - Otherwise `key` is placed immediately after `anchor`, moving it there if
///   it already existed.
/// - Without `anchor`, a new key is appended and an existing one is replaced
///   where it stands.
///
/// Other keys keep their relative order.
pub fn upsert(map: &mut Map<String, Value>, anchor: &str, key: &str, value: Value) -> UpsertOutcome {
  if anchor == key {
    warn!(key = %key, "upsert anchor is the key itself, ignoring");
    return UpsertOutcome::Ignored;
  }

  let value = match (map.get_mut(key), value) {
    (Some(Value::Array(items)), Value::Array(more)) => {
      items.extend(more);
      return UpsertOutcome::Merged;
    }
    (Some(Value::Array(items)), single) => {
      items.push(single);
      return UpsertOutcome::Merged;
    }
    (Some(Value::Object(entries)), Value::Object(more)) => {
      for (k, v) in more {
        entries.insert(k, v);
      }
      return UpsertOutcome::Merged;
    }
    (_, value) => value,
  };

  if key_position(map, anchor).is_none() {
    let existed = map.contains_key(key);
    map.insert(key.to_string(), value);
    return if existed {
      UpsertOutcome::Replaced
    } else {
      UpsertOutcome::Appended
    };
  }

  remove_key(map, key);
  // Recomputed: removing the key may have shifted the anchor.
  let index = key_position(map, anchor).map_or(map.len(), |i| i + 1);
  insert_at(map, index, key.to_string(), value);
  UpsertOutcome::Inserted
}
