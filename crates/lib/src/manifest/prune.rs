//! Self-reference removal.
//!
//! Both script lists (`scripts.<event>`) and class maps (`autoload.classmap`)
//! are plain string lists, so one section-agnostic routine serves both.

use serde_json::Value;
use tracing::debug;

use super::document::{Manifest, is_empty_container, remove_key};

/// Remove every entry equal to `needle` from the list at `section`.
///
/// When the list ends up empty its key is removed, and so is every ancestor
/// left empty by that, stopping below the document root. Returns the number
/// of removed entries; a missing section or a non-list value is a no-op.
pub fn prune(manifest: &mut Manifest, section: &[&str], needle: &str) -> usize {
  let Some(Value::Array(items)) = manifest.get_mut(section) else {
    return 0;
  };

  let before = items.len();
  items.retain(|item| item.as_str() != Some(needle));
  let removed = before - items.len();

  if removed > 0 {
    debug!(section = %section.join("."), entry = %needle, removed, "pruned self-reference");
    collapse_empty(manifest, section);
  }

  removed
}

/// Remove `key` from the mapping at `section`, collapsing emptied containers
/// the same way as [`prune`]. Returns whether the key existed.
pub fn prune_key(manifest: &mut Manifest, section: &[&str], key: &str) -> bool {
  let Some(Value::Object(entries)) = manifest.get_mut(section) else {
    return false;
  };

  if remove_key(entries, key).is_none() {
    return false;
  }

  debug!(section = %section.join("."), key = %key, "pruned mapping entry");
  collapse_empty(manifest, section);
  true
}

fn collapse_empty(manifest: &mut Manifest, path: &[&str]) {
  for depth in (1..=path.len()).rev() {
    let current = &path[..depth];
    match manifest.get(current) {
      Some(value) if is_empty_container(value) => {
        manifest.remove(current);
      }
      _ => break,
    }
  }
}
