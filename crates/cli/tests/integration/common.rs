//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated project directory.
pub struct TestEnv {
  pub temp: TempDir,
  pub manifest_path: PathBuf,
}

impl TestEnv {
  /// Create a project whose manifest is the given fixture, with the
  /// generalizer script present.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    std::fs::write(&env.manifest_path, fixture_content(name)).unwrap();
    env.write_file("scripts/composer/ScaffoldGeneralizer.php", "<?php\n");
    env
  }

  /// Create a project without a manifest.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let manifest_path = temp.path().join("composer.json");
    Self { temp, manifest_path }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  pub fn read_json(&self, relative_path: &str) -> Value {
    let content = std::fs::read_to_string(self.path(relative_path)).unwrap();
    serde_json::from_str(&content).unwrap()
  }

  pub fn manifest(&self) -> Value {
    self.read_json("composer.json")
  }

  pub fn schedule_path(&self) -> PathBuf {
    self.path(".scaffold-schedule.json")
  }

  pub fn script_path(&self) -> PathBuf {
    self.path("scripts/composer/ScaffoldGeneralizer.php")
  }

  /// Install a fake package manager that logs its arguments to
  /// `composer.log` and exits with `$FAKE_COMPOSER_EXIT` (default 0).
  #[cfg(unix)]
  pub fn install_fake_composer(&self) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = self.path("composer.log");
    let script = self.path("bin/composer");
    self.write_file(
      "bin/composer",
      &format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\necho \"fake composer: $*\"\nexit ${{FAKE_COMPOSER_EXIT:-0}}\n",
        log.display()
      ),
    );
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
  }

  /// Lines logged by the fake package manager.
  pub fn composer_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.path("composer.log"))
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// Get a pre-configured Command for the scaffold binary.
  ///
  /// Runs inside the project directory with the version and manifest
  /// overrides cleared, and points `COMPOSER_BINARY` at the fake package
  /// manager when one is installed.
  pub fn scaffold_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("scaffold");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("DREVOPS_SCAFFOLD_VERSION");
    cmd.env_remove("COMPOSER");
    cmd.env_remove("RUST_LOG");
    let fake = self.path("bin/composer");
    if fake.exists() {
      cmd.env("COMPOSER_BINARY", fake);
    } else {
      cmd.env_remove("COMPOSER_BINARY");
    }
    cmd
  }
}
