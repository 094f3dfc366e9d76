mod dispatch;
mod generalize;
mod require;
mod resolve;

pub use dispatch::cmd_dispatch;
pub use generalize::cmd_generalize;
pub use require::cmd_require;
pub use resolve::cmd_resolve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use scaffold_lib::config::{Environment, GeneralizeConfig, find_manifest_path};
use scaffold_lib::consts::SCHEDULE_FILENAME;
use scaffold_lib::manifest::Manifest;

/// Options shared by every command that works on a project.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
  /// Manifest file (default: $COMPOSER, then ./composer.json)
  #[arg(long, value_name = "PATH")]
  pub manifest: Option<PathBuf>,

  /// JSON file overriding generalization settings
  #[arg(long, value_name = "PATH")]
  pub config: Option<PathBuf>,
}

/// A located project with its settings resolved.
pub struct Project {
  pub manifest_path: PathBuf,
  pub dir: PathBuf,
  pub config: GeneralizeConfig,
  pub environment: Environment,
}

impl Project {
  pub fn open(args: &ProjectArgs) -> Result<Self> {
    let config = GeneralizeConfig::load_or_default(args.config.as_deref())?;
    let manifest_path = find_manifest_path(args.manifest.as_deref())?;
    let dir = match manifest_path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let environment = Environment::from_process(&config);

    Ok(Self {
      manifest_path,
      dir,
      config,
      environment,
    })
  }

  pub fn load_manifest(&self) -> Result<Manifest> {
    Manifest::load(&self.manifest_path).context("Failed to load manifest")
  }

  pub fn schedule_path(&self, explicit: Option<&Path>) -> PathBuf {
    explicit
      .map(Path::to_path_buf)
      .unwrap_or_else(|| self.dir.join(SCHEDULE_FILENAME))
  }
}
