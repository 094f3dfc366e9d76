//! Deferred dependency installation.
//!
//! On the immediate-install path the bootstrap package is added back by
//! running the package manager once installation has finished:
//!
//! ```text
//! composer require --no-interaction --dev --no-ansi drevops/scaffold:^1.2.0
//! ```
//!
//! The command runs through a [`CommandRunner`] so tests can stand in for
//! the real process.

mod process;

pub use process::ProcessRunner;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::action::ScheduledAction;
use crate::config::{Environment, GeneralizeConfig};
use crate::consts::keys;
use crate::generalize::resolve_version;
use crate::manifest::Manifest;

/// Errors that can occur while installing the bootstrap package.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error("failed to run {program}: {source}")]
  Spawn { program: String, source: io::Error },

  #[error(
    "command failed with exit code {} and the following output:\n{output}",
    .status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
  )]
  Failed { status: Option<i32>, output: String },
}

impl InstallError {
  /// Exit status of the failed command, if it exited normally.
  pub fn exit_status(&self) -> Option<i32> {
    match self {
      InstallError::Failed { status, .. } => *status,
      InstallError::Spawn { .. } => None,
    }
  }
}

/// Exit status and combined stdout/stderr of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
  /// `None` when the process was terminated by a signal.
  pub status: Option<i32>,
  /// All of stdout followed by all of stderr. The two streams are captured
  /// separately, so lines are not interleaved in the order they were written.
  pub output: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.status == Some(0)
  }
}

/// Runs an external command to completion.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  async fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<CommandOutput>;
}

/// Everything an install needs besides the action itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallEnv {
  /// Directory holding the manifest; commands run here.
  pub project_dir: PathBuf,
  /// Package manager program.
  pub program: String,
  /// Whether to ask for colored output.
  pub ansi: bool,
  /// Constraint used for actions that carry no version of their own.
  pub default_version: String,
  /// Project-relative script file removed after a successful install.
  pub script_file: Option<String>,
}

impl InstallEnv {
  /// Build the install environment for a project.
  ///
  /// The default version follows the usual precedence: environment
  /// override, then the manifest's own `version`, then the fallback.
  pub fn new(
    project_dir: &Path,
    config: &GeneralizeConfig,
    environment: &Environment,
    manifest: Option<&Manifest>,
  ) -> Self {
    let manifest_version = manifest.and_then(|m| m.get_str(&[keys::VERSION]));
    Self {
      project_dir: project_dir.to_path_buf(),
      program: environment
        .composer_binary
        .clone()
        .unwrap_or_else(|| config.composer_binary.clone()),
      ansi: false,
      default_version: resolve_version(
        environment.version_override.as_deref(),
        manifest_version,
        &config.fallback_version,
      ),
      script_file: Some(config.script_file.clone()),
    }
  }

  pub fn with_ansi(mut self, ansi: bool) -> Self {
    self.ansi = ansi;
    self
  }
}

/// Arguments for requiring `package` at `version` as a dev dependency.
pub fn require_args(package: &str, version: &str, ansi: bool) -> Vec<String> {
  vec![
    "require".to_string(),
    "--no-interaction".to_string(),
    "--dev".to_string(),
    if ansi { "--ansi" } else { "--no-ansi" }.to_string(),
    format!("{}:{}", package, version),
  ]
}

/// Run one scheduled action: require its package as a dev dependency.
///
/// On success the generalizer script file is removed from the project,
/// best effort. A non-zero exit fails with the exit status and the full
/// captured output; nothing is retried.
pub async fn run_scheduled_action<R: CommandRunner>(
  action: &ScheduledAction,
  env: &InstallEnv,
  runner: &R,
) -> Result<(), InstallError> {
  let version = action.version.as_deref().unwrap_or(&env.default_version);
  info!(
    package = %action.package,
    version = %version,
    "adding bootstrap package as a development dependency"
  );

  let args = require_args(&action.package, version, env.ansi);
  let output = runner
    .run(&env.program, &args, &env.project_dir)
    .await
    .map_err(|source| InstallError::Spawn {
      program: env.program.clone(),
      source,
    })?;

  if !output.success() {
    return Err(InstallError::Failed {
      status: output.status,
      output: output.output,
    });
  }

  debug!(output = %output.output, "install command output");

  if let Some(script_file) = &env.script_file {
    remove_script_file(&env.project_dir, script_file);
  }

  Ok(())
}

/// Delete the generalizer script from the project.
///
/// A missing file is fine; other failures are logged and ignored.
pub fn remove_script_file(project_dir: &Path, script_file: &str) -> bool {
  let path = project_dir.join(script_file);
  match std::fs::remove_file(&path) {
    Ok(()) => {
      debug!(path = %path.display(), "removed script file");
      true
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => false,
    Err(e) => {
      warn!(path = %path.display(), error = %e, "failed to remove script file");
      false
    }
  }
}

#[cfg(test)]
impl InstallEnv {
  pub(crate) fn for_tests(project_dir: &Path) -> Self {
    Self::new(
      project_dir,
      &GeneralizeConfig::default(),
      &Environment::default(),
      None,
    )
  }
}
