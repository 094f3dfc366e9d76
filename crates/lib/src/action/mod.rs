//! Scheduled follow-up actions.
//!
//! The generalization transform cannot add the bootstrap package itself when
//! installation runs in the same process, so it returns [`ScheduledAction`]s
//! instead. A [`Schedule`] holds them until the installing side reaches the
//! matching [`LifecycleEvent`] and calls [`Schedule::dispatch`].
//!
//! Schedules are plain JSON lists, so an orchestrator can persist them
//! between processes.

mod types;

pub use types::*;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::install::{CommandRunner, InstallEnv, InstallError, run_scheduled_action};
use crate::manifest::write_atomic;

/// Errors that can occur when persisting a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
  #[error("failed to read schedule {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse schedule {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("failed to serialize schedule: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write schedule {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// An ordered list of pending actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
  actions: Vec<ScheduledAction>,
}

impl Schedule {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an action unless one for the same event and package is already
  /// pending. The pending action keeps its version constraint.
  pub fn push(&mut self, action: ScheduledAction) -> bool {
    if self.covers(&action) {
      debug!(event = %action.event, package = %action.package, "action already scheduled");
      return false;
    }
    self.actions.push(action);
    true
  }

  /// Push every action and return the ones that were actually added.
  pub fn extend<I: IntoIterator<Item = ScheduledAction>>(&mut self, actions: I) -> Vec<ScheduledAction> {
    actions
      .into_iter()
      .filter(|action| self.push(action.clone()))
      .collect()
  }

  /// Whether an action for the same event and package is pending.
  pub fn covers(&self, action: &ScheduledAction) -> bool {
    self
      .actions
      .iter()
      .any(|pending| pending.event == action.event && pending.package == action.package)
  }

  pub fn actions(&self) -> &[ScheduledAction] {
    &self.actions
  }

  pub fn len(&self) -> usize {
    self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  /// Remove and return the actions for `event`, in schedule order.
  pub fn take_event(&mut self, event: LifecycleEvent) -> Vec<ScheduledAction> {
    let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.actions)
      .into_iter()
      .partition(|action| action.event == event);
    self.actions = rest;
    due
  }

  /// Load a schedule. A missing file is an empty schedule.
  pub fn load(path: &Path) -> Result<Self, ScheduleError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
      Err(source) => {
        return Err(ScheduleError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| ScheduleError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Save the schedule atomically. An empty schedule removes the file.
  pub fn save(&self, path: &Path) -> Result<(), ScheduleError> {
    if self.is_empty() {
      return match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ScheduleError::Write {
          path: path.to_path_buf(),
          source,
        }),
      };
    }

    let mut content = serde_json::to_string_pretty(self).map_err(ScheduleError::Serialize)?;
    content.push('\n');
    write_atomic(path, &content).map_err(|source| ScheduleError::Write {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), count = self.len(), "saved schedule");
    Ok(())
  }

  /// Run every action due at `event`, in order.
  ///
  /// Stops at the first failure; the failed action and those after it stay
  /// in the schedule so they can be triggered again. Returns the number of
  /// actions that ran successfully.
  pub async fn dispatch<R: CommandRunner>(
    &mut self,
    event: LifecycleEvent,
    env: &InstallEnv,
    runner: &R,
  ) -> Result<usize, InstallError> {
    let due = self.take_event(event);
    info!(event = %event, count = due.len(), "dispatching scheduled actions");

    let mut done = 0;
    let mut pending = due.into_iter();
    while let Some(action) = pending.next() {
      if let Err(err) = run_scheduled_action(&action, env, runner).await {
        warn!(event = %event, package = %action.package, "scheduled action failed");
        let mut remaining = vec![action];
        remaining.extend(pending);
        remaining.append(&mut self.actions);
        self.actions = remaining;
        return Err(err);
      }
      done += 1;
    }

    Ok(done)
  }
}
