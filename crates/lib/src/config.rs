//! Generalization settings, process environment and manifest lookup.
//!
//! Every knob that differed between historical variants of the generalizer
//! lives in [`GeneralizeConfig`]. Defaults reproduce the canonical behaviour;
//! a JSON file can override any subset of fields.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("manifest not found: {path}")]
  ManifestNotFound { path: String },
}

/// Settings for the generalization transform and its follow-up hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct GeneralizeConfig {
  /// Identifier of the bootstrap package.
  pub package: String,
  /// Generic project name.
  pub project_name: String,
  /// Generic project description. `None` leaves the description untouched.
  pub project_description: Option<String>,
  /// Version constraint used when nothing else provides one.
  pub fallback_version: String,
  /// Environment variable holding a version override.
  pub version_env: String,
  /// `extra.drupal-scaffold.file-mapping` entries to drop.
  pub file_mappings: Vec<String>,
  /// Script reference that invoked the generalization.
  pub trigger: String,
  /// Standing hook added to `scripts.pre-update-cmd`.
  pub pre_update_hook: String,
  /// Hook filtering the candidate pool.
  pub pre_pool_create_hook: String,
  /// Hook cleaning the installed package's class map.
  pub pre_autoload_dump_hook: String,
  /// Project-relative path of the generalizer script.
  pub script_file: String,
  /// Class-map entries removed from the installed bootstrap package.
  pub classmap_script_files: Vec<String>,
  /// `autoload.psr-4` namespaces to drop.
  pub psr4_namespaces: Vec<String>,
  /// Whether to set `config.allow-plugins.<package>` to `true`.
  pub allow_plugin: bool,
  /// Program used to run install commands.
  pub composer_binary: String,
}

impl Default for GeneralizeConfig {
  fn default() -> Self {
    Self {
      package: consts::SCAFFOLD_PACKAGE.to_string(),
      project_name: consts::PROJECT_NAME.to_string(),
      project_description: Some(consts::PROJECT_DESCRIPTION.to_string()),
      fallback_version: consts::FALLBACK_VERSION.to_string(),
      version_env: consts::VERSION_ENV.to_string(),
      file_mappings: consts::FILE_MAPPINGS.iter().map(|s| s.to_string()).collect(),
      trigger: consts::GENERALIZE_TRIGGER.to_string(),
      pre_update_hook: consts::PRE_UPDATE_HOOK.to_string(),
      pre_pool_create_hook: consts::PRE_POOL_CREATE_HOOK.to_string(),
      pre_autoload_dump_hook: consts::PRE_AUTOLOAD_DUMP_HOOK.to_string(),
      script_file: consts::SCRIPT_FILE.to_string(),
      classmap_script_files: consts::CLASSMAP_SCRIPT_FILES.iter().map(|s| s.to_string()).collect(),
      psr4_namespaces: Vec::new(),
      allow_plugin: false,
      composer_binary: "composer".to_string(),
    }
  }
}

impl GeneralizeConfig {
  /// Load a config file. Fields missing from the file keep their defaults.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), package = %config.package, "loaded config");
    Ok(config)
  }

  /// Load `path` if given, otherwise use the defaults.
  pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
    match path {
      Some(path) => Self::load(path),
      None => Ok(Self::default()),
    }
  }
}

/// The parts of the process environment the transform depends on.
///
/// Captured once per invocation so the transform itself stays pure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
  /// Version constraint override for the dev dependency.
  pub version_override: Option<String>,
  /// Program override for install commands.
  pub composer_binary: Option<String>,
}

impl Environment {
  /// Read the environment variables named by `config`.
  ///
  /// Empty values count as unset.
  pub fn from_process(config: &GeneralizeConfig) -> Self {
    Self {
      version_override: non_empty_var(&config.version_env),
      composer_binary: non_empty_var(consts::COMPOSER_BINARY_ENV),
    }
  }

  pub fn with_version(version: impl Into<String>) -> Self {
    Self {
      version_override: Some(version.into()),
      ..Self::default()
    }
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Find the manifest file.
///
/// Priority order:
/// 1. Explicit path if provided
/// 2. The file named by `$COMPOSER`
/// 3. `./composer.json`
///
/// # Errors
///
/// Returns `ConfigError::ManifestNotFound` if the chosen file does not exist.
pub fn find_manifest_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
  let candidate = match explicit {
    Some(path) => path.to_path_buf(),
    None => non_empty_var(consts::MANIFEST_ENV)
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(consts::MANIFEST_FILENAME)),
  };

  if candidate.exists() {
    Ok(candidate)
  } else {
    Err(ConfigError::ManifestNotFound {
      path: candidate.display().to_string(),
    })
  }
}
