use predicates::prelude::*;
use serde_json::{Value, json};

use super::common::TestEnv;

#[test]
fn no_install_edits_require_dev() {
  let env = TestEnv::from_fixture("template.json");

  env
    .scaffold_cmd()
    .args(["generalize", "--no-install"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Initialised project from DrevOps Scaffold"))
    .stdout(predicate::str::contains(
      "Added drevops/scaffold as dev dependency with version ^1.2.0",
    ))
    .stdout(predicate::str::contains("Run `composer install` to further customise the project"));

  let manifest = env.manifest();
  assert_eq!(manifest["name"], json!("your_org/your_site"));
  assert_eq!(
    manifest["description"],
    json!("Drupal implementation of YOURSITE for YOURORG")
  );
  assert_eq!(manifest["license"], json!("proprietary"));
  assert!(manifest.get("version").is_none());
  assert!(manifest.get("authors").is_none());
  assert_eq!(
    manifest["require-dev"],
    json!({"drevops/scaffold": "^1.2.0", "phpunit/phpunit": "^10"})
  );
  assert!(manifest["scripts"].get("post-root-package-install").is_none());
  assert_eq!(
    manifest["scripts"]["pre-update-cmd"],
    json!(["DrevOps\\composer\\ScaffoldScriptHandler::preUpdateCmd"])
  );
  assert_eq!(manifest["autoload"]["classmap"], json!(["scripts/composer/ScriptHandler.php"]));
  assert_eq!(manifest["extra"]["patches"], json!({}));
  assert_eq!(
    manifest["extra"]["drupal-scaffold"],
    json!({"file-mapping": {}, "allowed-packages": ["drevops/scaffold"]})
  );

  assert!(!env.schedule_path().exists());
  assert!(!env.script_path().exists());
}

#[test]
fn create_project_schedules_install() {
  let env = TestEnv::from_fixture("template.json");

  env
    .scaffold_cmd()
    .args(["generalize", "--command", "create-project"])
    .assert()
    .success()
    .stdout(predicate::str::contains("drevops/scaffold:^1.2.0 (post-create-project)"))
    .stdout(predicate::str::contains("composer install").not());

  let manifest = env.manifest();
  assert!(manifest["require-dev"].get("drevops/scaffold").is_none());
  assert_eq!(
    env.read_json(".scaffold-schedule.json"),
    json!([{"event": "post-create-project", "action": "drevops/scaffold", "version": "^1.2.0"}])
  );
  assert!(env.script_path().exists());
}

#[test]
fn running_twice_leaves_manifest_unchanged() {
  let env = TestEnv::from_fixture("template.json");

  env.scaffold_cmd().args(["generalize", "--no-install"]).assert().success();
  let first = std::fs::read_to_string(&env.manifest_path).unwrap();

  env.scaffold_cmd().args(["generalize", "--no-install"]).assert().success();
  let second = std::fs::read_to_string(&env.manifest_path).unwrap();

  assert_eq!(first, second);
  assert!(second.ends_with("}\n"));
  assert!(!second.contains("\\/"));
}

#[test]
fn version_override_from_environment() {
  let env = TestEnv::from_fixture("template.json");

  env
    .scaffold_cmd()
    .args(["generalize", "--no-install"])
    .env("DREVOPS_SCAFFOLD_VERSION", "@dev")
    .assert()
    .success();

  assert_eq!(env.manifest()["require-dev"]["drevops/scaffold"], json!("@dev"));
}

#[test]
fn json_output() {
  let env = TestEnv::from_fixture("template.json");

  let assert = env
    .scaffold_cmd()
    .args(["generalize", "--no-install", "--format", "json"])
    .assert()
    .success();

  let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(report["path"], json!("deferred"));
  assert_eq!(report["version"], json!("^1.2.0"));
  assert_eq!(report["dependency_added"], json!(true));
  assert_eq!(report["scheduled"], json!([]));
  assert_eq!(report["script_removed"], json!(true));
}

#[test]
fn config_file_overrides_identity() {
  let env = TestEnv::from_fixture("template.json");
  env.write_file(
    "scaffold.json",
    r#"{"project-name": "acme/site", "project-description": null}"#,
  );

  env
    .scaffold_cmd()
    .args(["generalize", "--no-install", "--config", "scaffold.json"])
    .assert()
    .success();

  let manifest = env.manifest();
  assert_eq!(manifest["name"], json!("acme/site"));
  assert_eq!(manifest["description"], json!("Drupal project scaffold"));
}

#[test]
fn manifest_from_composer_env() {
  let env = TestEnv::empty();
  env.write_file("other.json", &super::common::fixture_content("template.json"));

  env
    .scaffold_cmd()
    .args(["generalize", "--no-install"])
    .env("COMPOSER", "other.json")
    .assert()
    .success();

  assert_eq!(env.read_json("other.json")["name"], json!("your_org/your_site"));
  assert!(!env.manifest_path.exists());
}

#[test]
fn malformed_manifest_is_not_rewritten() {
  let env = TestEnv::empty();
  env.write_file("composer.json", "{not json");

  env
    .scaffold_cmd()
    .args(["generalize", "--no-install"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Failed to load manifest"));

  assert_eq!(std::fs::read_to_string(&env.manifest_path).unwrap(), "{not json");
}

#[test]
fn missing_manifest_fails() {
  let env = TestEnv::empty();

  env
    .scaffold_cmd()
    .args(["generalize", "--no-install"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("manifest not found"));
}
