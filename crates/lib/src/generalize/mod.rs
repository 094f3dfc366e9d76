//! The one-time generalization of a template manifest.
//!
//! The bootstrap package is distributed both as a project template and as a
//! dev dependency of the projects created from it. Right after project
//! creation its manifest still describes the template itself; [`generalize`]
//! turns it into a generic consumer manifest:
//!
//! 1. generic `name` (and `description`), then `type` and `license`
//! 2. no `version` or `authors`
//! 3. template-managed file mappings dropped, the package allowed to scaffold
//! 4. an empty `extra.patches` kept as an object
//! 5. the package added back as a dev dependency, directly or by schedule
//! 6. the standing pre-update hook registered
//! 7. every reference to the trigger and the script file removed
//!
//! Every step is a no-op when its precondition no longer holds, so running
//! the transform on an already generic manifest changes nothing.

mod version;

pub use version::resolve_version;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::action::{LifecycleEvent, ScheduledAction};
use crate::config::{Environment, GeneralizeConfig};
use crate::consts::keys;
use crate::invocation::InstallPath;
use crate::manifest::{Manifest, insert_at, prune, prune_key, sort_keys, upsert};

/// Printed once the manifest has been rewritten.
pub const INITIALISED_MESSAGE: &str = "Initialised project from DrevOps Scaffold";

/// Printed on the deferred path, where installation is still to come.
pub const INSTALL_HINT: &str = "Run `composer install` to further customise the project";

/// What a generalization run did besides editing the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralizeOutcome {
  /// The execution path the run followed.
  pub path: InstallPath,
  /// Version constraint resolved for the dev dependency.
  pub version: String,
  /// Whether `require-dev` was edited directly.
  pub dependency_added: bool,
  /// Follow-up actions for the installing side. Empty on the deferred path.
  pub scheduled: Vec<ScheduledAction>,
  /// Messages for the user.
  pub notices: Vec<String>,
}

/// Rewrite `manifest` into a generic consumer manifest.
///
/// Exactly one of a direct `require-dev` edit or a scheduled action happens,
/// depending on `path`, and neither happens if the package is already a dev
/// dependency.
pub fn generalize(
  manifest: &mut Manifest,
  env: &Environment,
  path: InstallPath,
  config: &GeneralizeConfig,
) -> GeneralizeOutcome {
  let version = resolve_version(
    env.version_override.as_deref(),
    manifest.get_str(&[keys::VERSION]),
    &config.fallback_version,
  );
  info!(path = %path, package = %config.package, version = %version, "generalizing manifest");

  let mut outcome = GeneralizeOutcome {
    path,
    version,
    dependency_added: false,
    scheduled: Vec::new(),
    notices: Vec::new(),
  };

  set_identity(manifest, config);
  remove_package_metadata(manifest);
  update_scaffold_section(manifest, config);
  preserve_empty_patches(manifest);

  if config.allow_plugin {
    allow_plugin(manifest, &config.package);
  }

  add_dependency(manifest, config, &mut outcome);
  register_pre_update_hook(manifest, &config.pre_update_hook);
  remove_self_references(manifest, config);

  outcome
}

fn set_identity(manifest: &mut Manifest, config: &GeneralizeConfig) {
  let root = manifest.root_mut();

  let name = Value::String(config.project_name.clone());
  if root.contains_key(keys::NAME) {
    root.insert(keys::NAME.to_string(), name);
  } else {
    insert_at(root, 0, keys::NAME.to_string(), name);
  }

  if let Some(description) = &config.project_description {
    upsert(
      root,
      keys::NAME,
      keys::DESCRIPTION,
      Value::String(description.clone()),
    );
  }

  let anchor = if root.contains_key(keys::DESCRIPTION) {
    keys::DESCRIPTION
  } else {
    keys::NAME
  };
  upsert(root, anchor, keys::TYPE, Value::String("project".to_string()));
  upsert(root, keys::TYPE, keys::LICENSE, Value::String("proprietary".to_string()));
}

fn remove_package_metadata(manifest: &mut Manifest) {
  for key in [keys::VERSION, keys::AUTHORS] {
    if manifest.remove(&[key]).is_some() {
      debug!(key = %key, "removed package metadata");
    }
  }
}

/// Drop template-managed file mappings and allow the package to scaffold.
///
/// Only applies when `extra.drupal-scaffold` already has content.
fn update_scaffold_section(manifest: &mut Manifest, config: &GeneralizeConfig) {
  let has_content = manifest
    .get(&[keys::EXTRA, keys::DRUPAL_SCAFFOLD])
    .and_then(Value::as_object)
    .is_some_and(|section| !section.is_empty());
  if !has_content {
    return;
  }

  for mapping in &config.file_mappings {
    if manifest
      .remove(&[keys::EXTRA, keys::DRUPAL_SCAFFOLD, keys::FILE_MAPPING, mapping.as_str()])
      .is_some()
    {
      debug!(mapping = %mapping, "removed file mapping");
    }
  }

  let Some(section) = manifest.section_mut(&[keys::EXTRA, keys::DRUPAL_SCAFFOLD]) else {
    return;
  };
  let allowed = section
    .entry(keys::ALLOWED_PACKAGES.to_string())
    .or_insert_with(|| Value::Array(Vec::new()));
  let Value::Array(packages) = allowed else {
    warn!("extra.drupal-scaffold.allowed-packages is not a list, leaving it alone");
    return;
  };

  packages.push(Value::String(config.package.clone()));
  let mut names: Vec<Value> = std::mem::take(packages);
  // Non-string entries sort first, ordered by their JSON text.
  names.sort_by_cached_key(|name| (name.as_str().map(str::to_string), name.to_string()));
  names.dedup();
  *packages = names;
}

/// An empty `extra.patches` must stay an object: tooling reads `[]` as a
/// list that has been emptied rather than as "no patches configured".
fn preserve_empty_patches(manifest: &mut Manifest) {
  if let Some(patches) = manifest.get_mut(&[keys::EXTRA, keys::PATCHES]) {
    if matches!(patches, Value::Array(items) if items.is_empty()) {
      *patches = Value::Object(serde_json::Map::new());
    }
  }
}

fn allow_plugin(manifest: &mut Manifest, package: &str) {
  if let Some(allowed) = manifest.section_mut(&[keys::CONFIG, keys::ALLOW_PLUGINS]) {
    allowed.insert(package.to_string(), Value::Bool(true));
  }
}

fn add_dependency(manifest: &mut Manifest, config: &GeneralizeConfig, outcome: &mut GeneralizeOutcome) {
  if manifest
    .get(&[keys::REQUIRE_DEV, config.package.as_str()])
    .is_some()
  {
    debug!(package = %config.package, "package already a dev dependency");
    return;
  }

  match outcome.path {
    InstallPath::Deferred => {
      let Some(require_dev) = manifest.section_mut(&[keys::REQUIRE_DEV]) else {
        warn!("require-dev is not a mapping, cannot add the package");
        return;
      };
      require_dev.insert(config.package.clone(), Value::String(outcome.version.clone()));
      sort_keys(require_dev);
      outcome.dependency_added = true;
      outcome.notices.push(format!(
        "Added {} as dev dependency with version {}",
        config.package, outcome.version
      ));
    }
    InstallPath::Immediate => {
      // The running install will not re-read the manifest from disk.
      outcome.scheduled.push(
        ScheduledAction::require_dev(LifecycleEvent::PostCreateProject, config.package.clone())
          .with_version(outcome.version.clone()),
      );
    }
  }
}

/// Make sure `scripts.pre-update-cmd` lists `hook` exactly once.
fn register_pre_update_hook(manifest: &mut Manifest, hook: &str) {
  let Some(scripts) = manifest.section_mut(&[keys::SCRIPTS]) else {
    warn!("scripts is not a mapping, cannot register the pre-update hook");
    return;
  };

  let hook_value = Value::String(hook.to_string());
  let entry = scripts
    .entry(keys::PRE_UPDATE_CMD.to_string())
    .or_insert_with(|| Value::Array(Vec::new()));

  match entry {
    Value::Array(items) => {
      if !items.contains(&hook_value) {
        items.push(hook_value);
      }
    }
    Value::String(existing) if existing.as_str() == hook => {}
    Value::String(_) => {
      let previous = entry.take();
      *entry = Value::Array(vec![previous, hook_value]);
    }
    _ => warn!("scripts.pre-update-cmd has an unexpected shape, leaving it alone"),
  }
}

fn remove_self_references(manifest: &mut Manifest, config: &GeneralizeConfig) {
  prune(
    manifest,
    &[keys::SCRIPTS, keys::POST_ROOT_PACKAGE_INSTALL],
    &config.trigger,
  );
  prune(manifest, &[keys::AUTOLOAD, keys::CLASSMAP], &config.script_file);
  for namespace in &config.psr4_namespaces {
    prune_key(manifest, &[keys::AUTOLOAD, keys::PSR4], namespace);
  }
}
