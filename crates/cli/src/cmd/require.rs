use anyhow::{Context, Result};

use scaffold_lib::action::{LifecycleEvent, ScheduledAction};
use scaffold_lib::install::{InstallEnv, ProcessRunner, run_scheduled_action};

use super::{Project, ProjectArgs};
use crate::output::{OutputFormat, print_json, print_success};

/// Require the scaffold package as a development dependency right away,
/// without going through a schedule file.
pub fn cmd_require(args: &ProjectArgs, ansi: bool, output: OutputFormat) -> Result<()> {
  let project = Project::open(args)?;
  let manifest = project.load_manifest()?;
  let env = InstallEnv::new(&project.dir, &project.config, &project.environment, Some(&manifest)).with_ansi(ansi);

  let action = ScheduledAction::require_dev(LifecycleEvent::PostCreateProject, project.config.package.clone());

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(run_scheduled_action(&action, &env, &ProcessRunner))
    .context("Install failed")?;

  if output.is_json() {
    print_json(&serde_json::json!({
      "package": action.package,
      "version": env.default_version,
    }))?;
  } else {
    print_success(&format!(
      "Added {} as a development dependency at version {}",
      action.package, env.default_version
    ));
  }

  Ok(())
}
