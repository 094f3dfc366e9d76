//! Resolution-time cleanup of the bootstrap package.
//!
//! Once the bootstrap package is a dev dependency of the project it was
//! created from, two things about it must not leak into the consumer:
//! its own requirements (only needed for the one-time generalization) and
//! the class-map entries pointing at its generalizer scripts. Both are fixed
//! up in memory on every resolution cycle; nothing here touches the manifest.

mod hooks;

pub use hooks::{CycleReport, ResolutionCycle, ResolutionHooks};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::consts::keys;
use crate::manifest::write_atomic;

/// Errors that can occur while reading or writing package lists.
#[derive(Debug, Error)]
pub enum PoolError {
  #[error("failed to read package list {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse package list {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("failed to serialize package list: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write package list {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// A resolved or installed package, as seen by the solver.
///
/// Fields this crate does not look at are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Map::is_empty")]
  pub require: Map<String, Value>,
  #[serde(default, skip_serializing_if = "Map::is_empty")]
  pub autoload: Map<String, Value>,
  #[serde(flatten)]
  pub other: Map<String, Value>,
}

impl Package {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version: None,
      require: Map::new(),
      autoload: Map::new(),
      other: Map::new(),
    }
  }
}

/// Clear the requirements of every pool entry named `name`.
///
/// Returns the number of packages whose requirements were cleared.
pub fn filter_pool(pool: &mut [Package], name: &str) -> usize {
  let mut cleared = 0;
  for package in pool.iter_mut().filter(|p| p.name == name) {
    if !package.require.is_empty() {
      debug!(package = %package.name, count = package.require.len(), "clearing requirements");
      package.require.clear();
      cleared += 1;
    }
  }
  cleared
}

/// Remove `paths` from the class map of the first installed package named
/// `name`.
///
/// Returns whether any entry was removed.
pub fn dedup_autoload(installed: &mut [Package], name: &str, paths: &[String]) -> bool {
  let Some(package) = installed.iter_mut().find(|p| p.name == name) else {
    return false;
  };
  let Some(Value::Array(classmap)) = package.autoload.get_mut(keys::CLASSMAP) else {
    return false;
  };

  let before = classmap.len();
  classmap.retain(|entry| !entry.as_str().is_some_and(|s| paths.iter().any(|p| p == s)));
  let removed = before - classmap.len();

  if removed > 0 {
    debug!(package = %name, removed, "removed class map entries");
  }
  removed > 0
}

/// Read a JSON list of packages.
pub fn load_packages(path: &Path) -> Result<Vec<Package>, PoolError> {
  let content = fs::read_to_string(path).map_err(|source| PoolError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  serde_json::from_str(&content).map_err(|source| PoolError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Atomically write a JSON list of packages.
pub fn save_packages(path: &Path, packages: &[Package]) -> Result<(), PoolError> {
  let mut content = serde_json::to_string_pretty(packages).map_err(PoolError::Serialize)?;
  content.push('\n');
  write_atomic(path, &content).map_err(|source| PoolError::Write {
    path: path.to_path_buf(),
    source,
  })
}
