//! Implementation of the `scaffold resolve` command.
//!
//! Replays one dependency-resolution cycle over package lists exported by
//! the package manager. The manifest is only read.

use std::path::Path;

use anyhow::{Context, Result};

use scaffold_lib::pool::{ResolutionCycle, ResolutionHooks, load_packages, save_packages};

use super::{Project, ProjectArgs};
use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning};

pub fn cmd_resolve(args: &ProjectArgs, pool: &Path, installed: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = Project::open(args)?;
  let manifest = project.load_manifest()?;

  let candidates = load_packages(pool).context("Failed to load pool")?;
  let installed_packages = match installed {
    Some(path) => load_packages(path).context("Failed to load installed packages")?,
    None => Vec::new(),
  };

  let mut cycle = ResolutionCycle::new(&manifest, candidates, installed_packages);
  let report = cycle.run(&ResolutionHooks::from_config(&project.config));

  if report.hooked {
    save_packages(pool, &cycle.pool)?;
    if let Some(path) = installed {
      save_packages(path, &cycle.installed)?;
    }
  }

  if output.is_json() {
    return print_json(&report);
  }

  if !report.hooked {
    print_warning("Pre-update hook is not registered in the manifest, nothing to do");
    return Ok(());
  }

  print_success("Resolution cycle complete");
  print_stat("Requirements cleared", report.filtered);
  print_stat("Class map cleaned", if report.autoload_cleaned { "yes" } else { "no" });

  Ok(())
}
