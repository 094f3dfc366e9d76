//! Loading and atomically storing manifest files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::document::Manifest;

/// Errors that can occur when reading or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse manifest {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: Box<ManifestError>,
  },

  #[error("invalid JSON: {0}")]
  Invalid(#[source] serde_json::Error),

  #[error("manifest root must be a JSON object")]
  NotAnObject,

  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write manifest {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

impl Manifest {
  /// Read and parse the manifest at `path`.
  ///
  /// Nothing is written on failure.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let manifest = Self::parse(&content).map_err(|e| ManifestError::Parse {
      path: path.to_path_buf(),
      source: Box::new(e),
    })?;

    debug!(path = %path.display(), keys = manifest.root().len(), "loaded manifest");
    Ok(manifest)
  }

  /// Write the manifest to `path` with [`write_atomic`].
  pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
    let content = self.to_pretty_string()?;
    write_atomic(path, &content).map_err(|source| ManifestError::Write {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "saved manifest");
    Ok(())
  }
}

/// Replace `path` with `content`.
///
/// Content goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a partial file.
/// Permissions of an existing target are kept.
pub(crate) fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut tmp = NamedTempFile::new_in(dir)?;
  tmp.write_all(content.as_bytes())?;
  tmp.as_file().sync_all()?;

  if let Ok(metadata) = fs::metadata(path) {
    tmp.as_file().set_permissions(metadata.permissions())?;
  }

  tmp.persist(path).map_err(|e| e.error)?;
  Ok(())
}
