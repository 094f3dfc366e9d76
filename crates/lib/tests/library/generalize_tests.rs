use std::fs;

use scaffold_lib::action::Schedule;
use scaffold_lib::config::Environment;
use scaffold_lib::generalize::generalize;
use scaffold_lib::invocation::{InstallPath, InvocationContext, select_path};
use scaffold_lib::manifest::Manifest;
use serde_json::{Value, json};
use tempfile::TempDir;

use super::common::{config, template_manifest};

fn string_lists(value: &Value) -> Vec<&str> {
  match value {
    Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
    Value::Object(map) => map.values().flat_map(string_lists).collect(),
    Value::String(s) => vec![s.as_str()],
    _ => Vec::new(),
  }
}

#[test]
fn generalizing_twice_changes_nothing() {
  for path in [InstallPath::Deferred, InstallPath::Immediate] {
    let mut once = template_manifest();
    generalize(&mut once, &Environment::default(), path, &config());

    let mut twice = once.clone();
    generalize(&mut twice, &Environment::default(), path, &config());

    assert_eq!(once, twice, "second run changed the manifest on the {path} path");
    assert_eq!(once.to_pretty_string().unwrap(), twice.to_pretty_string().unwrap());
  }
}

#[test]
fn generalizing_twice_schedules_one_install() {
  let mut m = template_manifest();
  let first = generalize(&mut m, &Environment::default(), InstallPath::Immediate, &config());
  let second = generalize(&mut m, &Environment::default(), InstallPath::Immediate, &config());

  let mut schedule = Schedule::new();
  assert_eq!(schedule.extend(first.scheduled).len(), 1);
  assert!(schedule.extend(second.scheduled).is_empty());

  assert_eq!(schedule.len(), 1);
  assert_eq!(schedule.actions()[0].version.as_deref(), Some("^1.2.0"));
}

#[test]
fn untouched_keys_keep_their_order() {
  let source = template_manifest();
  let touched = ["name", "description", "type", "license", "version", "authors"];
  let before: Vec<String> = source
    .keys()
    .filter(|k| !touched.contains(k))
    .map(str::to_string)
    .collect();

  let mut m = source.clone();
  generalize(&mut m, &Environment::default(), InstallPath::Deferred, &config());

  let after: Vec<String> = m
    .keys()
    .filter(|k| before.iter().any(|b| b == k))
    .map(str::to_string)
    .collect();
  assert_eq!(before, after);

  assert_eq!(
    m.keys().take(5).collect::<Vec<_>>(),
    vec!["name", "description", "type", "license", "homepage"]
  );
}

#[test]
fn no_self_references_remain() {
  let config = config();
  let mut m = template_manifest();
  generalize(&mut m, &Environment::default(), InstallPath::Deferred, &config);

  let scripts = m.get(&["scripts"]).unwrap();
  let listed = string_lists(scripts);
  assert!(!listed.contains(&config.trigger.as_str()));

  let classmap = m.get(&["autoload", "classmap"]).unwrap();
  assert_eq!(classmap, &json!(["scripts/composer/ScriptHandler.php"]));
}

#[test]
fn exactly_one_dependency_route_per_path() {
  for no_install in [true, false] {
    let context = InvocationContext::new(Some("create-project"), no_install);
    let path = select_path(&context);

    let mut m = template_manifest();
    let outcome = generalize(&mut m, &Environment::default(), path, &config());
    let edited = m.contains(&["require-dev", "drevops/scaffold"]);

    assert_ne!(edited, !outcome.scheduled.is_empty());
    assert_eq!(edited, path == InstallPath::Deferred);
  }
}

#[test]
fn file_round_trip() {
  let temp = TempDir::new().unwrap();
  let path = temp.path().join("composer.json");
  template_manifest().save(&path).unwrap();

  let mut m = Manifest::load(&path).unwrap();
  let outcome = generalize(&mut m, &Environment::default(), InstallPath::Deferred, &config());
  m.save(&path).unwrap();

  let content = fs::read_to_string(&path).unwrap();
  assert!(content.ends_with("}\n"));
  assert!(content.contains("\n  \"name\": \"your_org/your_site\""));
  assert!(content.contains("\"patches\": {}"));
  assert!(content.contains("\"drevops/scaffold\": \"^1.2.0\""));
  assert!(!content.contains("\\/"));
  assert!(!content.contains("\"version\""));
  assert!(!content.contains(".circleci"));

  let reloaded = Manifest::load(&path).unwrap();
  assert_eq!(reloaded, m);
  assert_eq!(
    reloaded.get(&["require-dev"]).unwrap().as_object().unwrap().keys().collect::<Vec<_>>(),
    vec!["behat/behat", "drevops/scaffold", "phpunit/phpunit"]
  );
  assert_eq!(outcome.version, "^1.2.0");
}

#[test]
fn scaffold_section_keeps_other_mappings() {
  let mut m = template_manifest();
  generalize(&mut m, &Environment::default(), InstallPath::Deferred, &config());

  assert_eq!(
    m.get(&["extra", "drupal-scaffold"]),
    Some(&json!({
      "locations": {"web-root": "./web"},
      "file-mapping": {"[web-root]/robots.txt": false},
      "allowed-packages": ["drevops/scaffold"]
    }))
  );
}
