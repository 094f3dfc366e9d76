use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle points at which scheduled actions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
  /// After project creation, once dependency installation has finished.
  PostCreateProject,
}

impl LifecycleEvent {
  pub fn as_str(self) -> &'static str {
    match self {
      LifecycleEvent::PostCreateProject => "post-create-project",
    }
  }
}

impl fmt::Display for LifecycleEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A deferred request to add a package as a dev dependency.
///
/// Produced by the generalization transform on the immediate-install path
/// and consumed by whoever drives installation, once `event` is reached.
///
/// ```json
/// {"event": "post-create-project", "action": "drevops/scaffold", "version": "^1.2.0"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledAction {
  /// When to run.
  pub event: LifecycleEvent,
  /// Package to require as a dev dependency.
  #[serde(rename = "action")]
  pub package: String,
  /// Version constraint resolved at scheduling time. When absent, the
  /// constraint is resolved again when the action runs.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl ScheduledAction {
  pub fn require_dev(event: LifecycleEvent, package: impl Into<String>) -> Self {
    Self {
      event,
      package: package.into(),
      version: None,
    }
  }

  pub fn with_version(mut self, version: impl Into<String>) -> Self {
    self.version = Some(version.into());
    self
  }
}
