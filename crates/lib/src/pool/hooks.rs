use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Package, dedup_autoload, filter_pool};
use crate::config::GeneralizeConfig;
use crate::consts::keys;
use crate::manifest::Manifest;

/// The hook chain installed by generalization.
///
/// The pre-update hook persisted in the manifest registers the other two
/// for the duration of one resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionHooks {
  pub package: String,
  pub pre_update: String,
  pub pre_pool_create: String,
  pub pre_autoload_dump: String,
  pub classmap_script_files: Vec<String>,
}

impl ResolutionHooks {
  pub fn from_config(config: &GeneralizeConfig) -> Self {
    Self {
      package: config.package.clone(),
      pre_update: config.pre_update_hook.clone(),
      pre_pool_create: config.pre_pool_create_hook.clone(),
      pre_autoload_dump: config.pre_autoload_dump_hook.clone(),
      classmap_script_files: config.classmap_script_files.clone(),
    }
  }

  /// Register the pool and autoload hooks in `scripts`. Returns whether
  /// anything was added.
  pub fn on_pre_update(&self, scripts: &mut Map<String, Value>) -> bool {
    let pool = register(scripts, keys::PRE_POOL_CREATE, &self.pre_pool_create);
    let autoload = register(scripts, keys::PRE_AUTOLOAD_DUMP, &self.pre_autoload_dump);
    pool || autoload
  }

  pub fn on_pre_pool_create(&self, pool: &mut [Package]) -> usize {
    filter_pool(pool, &self.package)
  }

  pub fn on_pre_autoload_dump(&self, installed: &mut [Package]) -> bool {
    dedup_autoload(installed, &self.package, &self.classmap_script_files)
  }
}

/// What one resolution cycle changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
  /// Whether the manifest carried the pre-update hook.
  pub hooked: bool,
  /// Pool entries whose requirements were cleared.
  pub filtered: usize,
  /// Whether class-map entries were removed.
  pub autoload_cleaned: bool,
}

/// One dependency-resolution cycle over in-memory state.
///
/// `scripts` starts as a copy of the manifest's scripts and plays the role
/// of the runtime script registry; the manifest itself is never changed.
#[derive(Debug, Clone)]
pub struct ResolutionCycle {
  pub scripts: Map<String, Value>,
  pub pool: Vec<Package>,
  pub installed: Vec<Package>,
}

impl ResolutionCycle {
  pub fn new(manifest: &Manifest, pool: Vec<Package>, installed: Vec<Package>) -> Self {
    let scripts = manifest
      .get(&[keys::SCRIPTS])
      .and_then(Value::as_object)
      .cloned()
      .unwrap_or_default();
    Self {
      scripts,
      pool,
      installed,
    }
  }

  /// Fire the pre-update, pre-pool-create and pre-autoload-dump events in
  /// order, running whichever of `hooks` is registered for each.
  pub fn run(&mut self, hooks: &ResolutionHooks) -> CycleReport {
    let mut report = CycleReport::default();

    if !is_registered(&self.scripts, keys::PRE_UPDATE_CMD, &hooks.pre_update) {
      debug!("pre-update hook not registered, leaving resolution state alone");
      return report;
    }
    report.hooked = true;
    hooks.on_pre_update(&mut self.scripts);

    if is_registered(&self.scripts, keys::PRE_POOL_CREATE, &hooks.pre_pool_create) {
      report.filtered = hooks.on_pre_pool_create(&mut self.pool);
    }
    if is_registered(&self.scripts, keys::PRE_AUTOLOAD_DUMP, &hooks.pre_autoload_dump) {
      report.autoload_cleaned = hooks.on_pre_autoload_dump(&mut self.installed);
    }

    info!(
      filtered = report.filtered,
      autoload_cleaned = report.autoload_cleaned,
      "resolution cycle complete"
    );
    report
  }
}

/// Whether `event` lists `id`. A single script may be given as a plain string.
fn is_registered(scripts: &Map<String, Value>, event: &str, id: &str) -> bool {
  match scripts.get(event) {
    Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(id)),
    Some(Value::String(script)) => script == id,
    _ => false,
  }
}

fn register(scripts: &mut Map<String, Value>, event: &str, id: &str) -> bool {
  if is_registered(scripts, event, id) {
    return false;
  }

  let id = Value::String(id.to_string());
  match scripts.get_mut(event) {
    Some(Value::Array(items)) => items.push(id),
    Some(existing @ Value::String(_)) => {
      let previous = existing.take();
      *existing = Value::Array(vec![previous, id]);
    }
    _ => {
      scripts.insert(event.to_string(), Value::Array(vec![id]));
    }
  }
  true
}
