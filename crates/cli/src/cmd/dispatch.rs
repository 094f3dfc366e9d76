//! Implementation of the `scaffold dispatch` command.
//!
//! Runs every scheduled action for a lifecycle event, in order, and writes
//! back whatever is still pending. The schedule file is removed once empty.

use std::path::Path;

use anyhow::{Context, Result};

use scaffold_lib::action::{LifecycleEvent, Schedule};
use scaffold_lib::install::{InstallEnv, ProcessRunner};

use super::{Project, ProjectArgs};
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_dispatch(
  args: &ProjectArgs,
  event: LifecycleEvent,
  schedule: Option<&Path>,
  ansi: bool,
  output: OutputFormat,
) -> Result<()> {
  let project = Project::open(args)?;
  let manifest = project.load_manifest()?;
  let env = InstallEnv::new(&project.dir, &project.config, &project.environment, Some(&manifest)).with_ansi(ansi);

  let schedule_path = project.schedule_path(schedule);
  let mut pending = Schedule::load(&schedule_path)?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(pending.dispatch(event, &env, &ProcessRunner));

  // Failed actions are re-queued by dispatch; persist them before reporting.
  pending.save(&schedule_path)?;
  let done = result.context("Scheduled action failed")?;

  if output.is_json() {
    return print_json(&serde_json::json!({
      "event": event,
      "completed": done,
      "remaining": pending.len(),
    }));
  }

  if done == 0 {
    print_info(&format!("No scheduled actions for {}", event));
  } else {
    print_success(&format!("Completed {} scheduled action(s) for {}", done, event));
  }
  if !pending.is_empty() {
    print_stat("Remaining", pending.len());
  }

  Ok(())
}
