//! Execution path selection.
//!
//! Whether the package manager installs dependencies right after the
//! manifest is rewritten decides how the bootstrap package gets re-added:
//! a direct manifest edit is only seen if installation happens later, in a
//! fresh process. The caller states the flag explicitly; nothing here looks
//! inside the package manager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Package manager commands that install packages before returning.
const INSTALLING_COMMANDS: &[&str] = &["create-project", "install", "update", "require", "remove"];

/// How the bootstrap package is added back as a dev dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallPath {
  /// Installation runs in the current process; edits to the manifest on disk
  /// are not re-read, so the addition is scheduled for after installation.
  Immediate,
  /// Installation happens later; editing the manifest is enough.
  Deferred,
}

impl InstallPath {
  pub fn as_str(self) -> &'static str {
    match self {
      InstallPath::Immediate => "immediate",
      InstallPath::Deferred => "deferred",
    }
  }
}

impl fmt::Display for InstallPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What is known about the invoking package manager command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
  /// Command name, such as `create-project`. `None` when unknown.
  pub command: Option<String>,
  /// Whether installation was explicitly skipped.
  pub no_install: bool,
}

impl InvocationContext {
  pub fn new(command: Option<&str>, no_install: bool) -> Self {
    Self {
      command: command.map(str::to_string),
      no_install,
    }
  }
}

/// Decide the execution path for this invocation.
///
/// The skip-install flag always wins. Otherwise a known command that does
/// not install selects [`InstallPath::Deferred`]; an installing or unknown
/// command selects [`InstallPath::Immediate`].
pub fn select_path(context: &InvocationContext) -> InstallPath {
  if context.no_install {
    return InstallPath::Deferred;
  }

  match context.command.as_deref() {
    Some(command) if !INSTALLING_COMMANDS.contains(&command) => InstallPath::Deferred,
    _ => InstallPath::Immediate,
  }
}
