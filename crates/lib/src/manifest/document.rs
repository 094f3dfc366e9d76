use serde_json::{Map, Value};

use super::io::ManifestError;

/// An ordered JSON manifest document.
///
/// Sections are addressed by key paths such as `&["extra", "patches"]`.
/// Only objects are traversed; a path through a list or scalar resolves to
/// nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
  root: Map<String, Value>,
}

impl Manifest {
  /// Create a manifest from a JSON value, which must be an object.
  pub fn from_value(value: Value) -> Result<Self, ManifestError> {
    match value {
      Value::Object(root) => Ok(Self { root }),
      _ => Err(ManifestError::NotAnObject),
    }
  }

  /// Parse manifest content.
  pub fn parse(content: &str) -> Result<Self, ManifestError> {
    let value: Value = serde_json::from_str(content).map_err(ManifestError::Invalid)?;
    Self::from_value(value)
  }

  pub fn root(&self) -> &Map<String, Value> {
    &self.root
  }

  pub fn root_mut(&mut self) -> &mut Map<String, Value> {
    &mut self.root
  }

  /// Top-level keys in document order.
  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.root.keys().map(String::as_str)
  }

  /// Look up the value at `path`.
  pub fn get(&self, path: &[&str]) -> Option<&Value> {
    let (first, rest) = path.split_first()?;
    let mut current = self.root.get(*first)?;
    for segment in rest {
      current = current.as_object()?.get(*segment)?;
    }
    Some(current)
  }

  /// Look up the value at `path` for mutation.
  pub fn get_mut(&mut self, path: &[&str]) -> Option<&mut Value> {
    let (first, rest) = path.split_first()?;
    let mut current = self.root.get_mut(*first)?;
    for segment in rest {
      current = current.as_object_mut()?.get_mut(*segment)?;
    }
    Some(current)
  }

  pub fn get_str(&self, path: &[&str]) -> Option<&str> {
    self.get(path).and_then(Value::as_str)
  }

  pub fn contains(&self, path: &[&str]) -> bool {
    self.get(path).is_some()
  }

  /// Remove the value at `path` without disturbing the order of its siblings.
  pub fn remove(&mut self, path: &[&str]) -> Option<Value> {
    let (last, parent) = path.split_last()?;
    let parent = if parent.is_empty() {
      &mut self.root
    } else {
      self.get_mut(parent)?.as_object_mut()?
    };
    remove_key(parent, last)
  }

  /// Get the object at `path`, creating missing sections at the end of their
  /// parents.
  ///
  /// An empty list standing in for an empty mapping is converted to an
  /// object. Returns `None` when a segment holds any other non-object value.
  pub fn section_mut(&mut self, path: &[&str]) -> Option<&mut Map<String, Value>> {
    let mut current = &mut self.root;
    for segment in path {
      let entry = current
        .entry(segment.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
      if matches!(entry, Value::Array(items) if items.is_empty()) {
        *entry = Value::Object(Map::new());
      }
      current = entry.as_object_mut()?;
    }
    Some(current)
  }

  /// Serialize with two-space indentation, unescaped slashes and a trailing
  /// newline.
  pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
    let mut content = serde_json::to_string_pretty(&self.root).map_err(ManifestError::Serialize)?;
    content.push('\n');
    Ok(content)
  }
}

/// Position of `key` within `map`.
pub fn key_position(map: &Map<String, Value>, key: &str) -> Option<usize> {
  map.keys().position(|k| k == key)
}

/// Remove `key` from `map`, keeping the order of the remaining entries.
pub fn remove_key(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
  let index = key_position(map, key)?;
  let entries = std::mem::take(map);
  let mut removed = None;
  for (position, (k, v)) in entries.into_iter().enumerate() {
    if position == index {
      removed = Some(v);
    } else {
      map.insert(k, v);
    }
  }
  removed
}

/// Insert `key` at `index`, shifting later entries back. An index past the
/// end appends. `key` must not already be present.
pub fn insert_at(map: &mut Map<String, Value>, index: usize, key: String, value: Value) {
  let entries = std::mem::take(map);
  let mut pending = Some((key, value));
  for (position, (k, v)) in entries.into_iter().enumerate() {
    if position == index {
      if let Some((new_key, new_value)) = pending.take() {
        map.insert(new_key, new_value);
      }
    }
    map.insert(k, v);
  }
  if let Some((new_key, new_value)) = pending {
    map.insert(new_key, new_value);
  }
}

/// Reorder `map` by key, byte-wise.
pub fn sort_keys(map: &mut Map<String, Value>) {
  let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
  entries.sort_by(|a, b| a.0.cmp(&b.0));
  map.extend(entries);
}

/// Whether a value is an empty list or an empty object.
pub fn is_empty_container(value: &Value) -> bool {
  match value {
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
    _ => false,
  }
}
