//! Implementation of the `scaffold generalize` command.
//!
//! Loads the manifest, picks the execution path, rewrites the manifest and
//! stores it. On the immediate path the follow-up install is appended to the
//! schedule file; on the deferred path the generalizer script is removed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use scaffold_lib::action::{Schedule, ScheduledAction};
use scaffold_lib::generalize::{INITIALISED_MESSAGE, INSTALL_HINT, generalize};
use scaffold_lib::install::remove_script_file;
use scaffold_lib::invocation::{InstallPath, InvocationContext, select_path};

use super::{Project, ProjectArgs};
use crate::output::{OutputFormat, print_action, print_info, print_json, print_success};

#[derive(Debug, Serialize)]
struct GeneralizeReport {
  manifest: PathBuf,
  path: InstallPath,
  version: String,
  dependency_added: bool,
  scheduled: Vec<ScheduledAction>,
  #[serde(skip_serializing_if = "Option::is_none")]
  schedule_file: Option<PathBuf>,
  script_removed: bool,
  notices: Vec<String>,
}

pub fn cmd_generalize(
  args: &ProjectArgs,
  no_install: bool,
  command: Option<&str>,
  schedule: Option<&Path>,
  output: OutputFormat,
) -> Result<()> {
  let project = Project::open(args)?;
  let mut manifest = project.load_manifest()?;

  let path = select_path(&InvocationContext::new(command, no_install));
  let outcome = generalize(&mut manifest, &project.environment, path, &project.config);

  manifest.save(&project.manifest_path).context("Failed to save manifest")?;
  info!(path = %project.manifest_path.display(), "manifest generalized");

  let mut schedule_file = None;
  let mut scheduled = Vec::new();
  if !outcome.scheduled.is_empty() {
    let schedule_path = project.schedule_path(schedule);
    let mut pending = Schedule::load(&schedule_path)?;
    scheduled = pending.extend(outcome.scheduled);
    if !scheduled.is_empty() {
      pending.save(&schedule_path)?;
      schedule_file = Some(schedule_path);
    }
  }

  let script_removed = match path {
    InstallPath::Deferred => remove_script_file(&project.dir, &project.config.script_file),
    InstallPath::Immediate => false,
  };

  if output.is_json() {
    return print_json(&GeneralizeReport {
      manifest: project.manifest_path,
      path,
      version: outcome.version,
      dependency_added: outcome.dependency_added,
      scheduled,
      schedule_file,
      script_removed,
      notices: outcome.notices,
    });
  }

  print_success(INITIALISED_MESSAGE);
  for notice in &outcome.notices {
    print_info(notice);
  }
  if let Some(schedule_path) = &schedule_file {
    print_info(&format!("Scheduled for after installation ({})", schedule_path.display()));
    for action in &scheduled {
      print_action(action);
    }
  }
  if path == InstallPath::Deferred {
    print_info(INSTALL_HINT);
  }

  Ok(())
}
