use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

const POOL: &str = r#"[
  {"name": "drevops/scaffold", "version": "1.2.0", "require": {"some/lib": "^1"}},
  {"name": "some/lib", "version": "1.4.0", "require": {"php": ">=8.1"}}
]"#;

const INSTALLED: &str = r#"[
  {
    "name": "drevops/scaffold",
    "type": "project",
    "autoload": {"classmap": [
      "scripts/composer/ScaffoldScriptHandler.php",
      "scripts/composer/ScriptHandler.php",
      "src/Kept.php"
    ]}
  }
]"#;

#[test]
fn resolve_cleans_up_after_generalization() {
  let env = TestEnv::from_fixture("template.json");
  env.scaffold_cmd().args(["generalize", "--no-install"]).assert().success();
  env.write_file("pool.json", POOL);
  env.write_file("installed.json", INSTALLED);

  env
    .scaffold_cmd()
    .args(["resolve", "--pool", "pool.json", "--installed", "installed.json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Resolution cycle complete"));

  assert_eq!(
    env.read_json("pool.json"),
    json!([
      {"name": "drevops/scaffold", "version": "1.2.0"},
      {"name": "some/lib", "version": "1.4.0", "require": {"php": ">=8.1"}}
    ])
  );
  assert_eq!(
    env.read_json("installed.json"),
    json!([{
      "name": "drevops/scaffold",
      "autoload": {"classmap": ["src/Kept.php"]},
      "type": "project"
    }])
  );
}

#[test]
fn resolve_without_hook_leaves_files_alone() {
  let env = TestEnv::from_fixture("template.json");
  env.write_file("pool.json", POOL);

  env
    .scaffold_cmd()
    .args(["resolve", "--pool", "pool.json"])
    .assert()
    .success()
    .stderr(predicate::str::contains("nothing to do"));

  assert_eq!(std::fs::read_to_string(env.path("pool.json")).unwrap(), POOL);
}

#[test]
fn resolve_json_report() {
  let env = TestEnv::from_fixture("template.json");
  env.scaffold_cmd().args(["generalize", "--no-install"]).assert().success();
  env.write_file("pool.json", POOL);

  let assert = env
    .scaffold_cmd()
    .args(["resolve", "--pool", "pool.json", "--format", "json"])
    .assert()
    .success();

  let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(
    report,
    json!({"hooked": true, "filtered": 1, "autoload_cleaned": false})
  );
}
