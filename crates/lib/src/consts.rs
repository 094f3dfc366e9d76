//! Well-known identifiers and defaults.
//!
//! These values describe the bootstrap package and the script references it
//! leaves in a freshly created project. Every one of them can be overridden
//! through [`crate::config::GeneralizeConfig`].

/// Identifier of the bootstrap package that is both the project template and
/// a dev dependency of the generated project.
pub const SCAFFOLD_PACKAGE: &str = "drevops/scaffold";

/// Generic `name` written into the consumer manifest.
pub const PROJECT_NAME: &str = "your_org/your_site";

/// Generic `description` written into the consumer manifest.
pub const PROJECT_DESCRIPTION: &str = "Drupal implementation of YOURSITE for YOURORG";

/// Version constraint used when neither the environment nor the source
/// manifest provides one.
pub const FALLBACK_VERSION: &str = "^1";

/// Environment variable overriding the version constraint of the dev dependency.
pub const VERSION_ENV: &str = "DREVOPS_SCAFFOLD_VERSION";

/// Environment variable overriding the program used for install commands.
pub const COMPOSER_BINARY_ENV: &str = "COMPOSER_BINARY";

/// Environment variable naming the manifest file, mirroring the package manager.
pub const MANIFEST_ENV: &str = "COMPOSER";

/// Manifest file name used when nothing else is specified.
pub const MANIFEST_FILENAME: &str = "composer.json";

/// Default schedule file name, stored beside the manifest.
pub const SCHEDULE_FILENAME: &str = ".scaffold-schedule.json";

/// File mappings that the bootstrap package manages itself once it is a
/// dependency, so the consumer manifest must not pin them.
pub const FILE_MAPPINGS: &[&str] = &["[project-root]/.circleci/config.yml"];

/// Script reference that triggers generalization during project creation.
pub const GENERALIZE_TRIGGER: &str =
  "DrevOps\\composer\\ScaffoldGeneralizer::generalizeAndRemoveItselfAfterProjectCreate";

/// Standing hook run before every dependency update.
pub const PRE_UPDATE_HOOK: &str = "DrevOps\\composer\\ScaffoldScriptHandler::preUpdateCmd";

/// Hook registered by the pre-update hook to filter the candidate pool.
pub const PRE_POOL_CREATE_HOOK: &str = "DrevOps\\composer\\ScaffoldScriptHandler::prePoolCreate";

/// Hook registered by the pre-update hook to clean the class map.
pub const PRE_AUTOLOAD_DUMP_HOOK: &str = "DrevOps\\composer\\ScaffoldScriptHandler::preAutoloadDump";

/// Project-relative path of the generalizer script file.
pub const SCRIPT_FILE: &str = "scripts/composer/ScaffoldGeneralizer.php";

/// Class-map entries stripped from the installed bootstrap package.
pub const CLASSMAP_SCRIPT_FILES: &[&str] = &[
  "scripts/composer/ScaffoldScriptHandler.php",
  "scripts/composer/ScriptHandler.php",
];

/// Manifest section names.
pub mod keys {
  pub const NAME: &str = "name";
  pub const DESCRIPTION: &str = "description";
  pub const TYPE: &str = "type";
  pub const LICENSE: &str = "license";
  pub const VERSION: &str = "version";
  pub const AUTHORS: &str = "authors";
  pub const REQUIRE_DEV: &str = "require-dev";
  pub const SCRIPTS: &str = "scripts";
  pub const AUTOLOAD: &str = "autoload";
  pub const CLASSMAP: &str = "classmap";
  pub const PSR4: &str = "psr-4";
  pub const EXTRA: &str = "extra";
  pub const CONFIG: &str = "config";
  pub const ALLOW_PLUGINS: &str = "allow-plugins";
  pub const DRUPAL_SCAFFOLD: &str = "drupal-scaffold";
  pub const FILE_MAPPING: &str = "file-mapping";
  pub const ALLOWED_PACKAGES: &str = "allowed-packages";
  pub const PATCHES: &str = "patches";
  pub const POST_ROOT_PACKAGE_INSTALL: &str = "post-root-package-install";
  pub const PRE_UPDATE_CMD: &str = "pre-update-cmd";
  pub const PRE_POOL_CREATE: &str = "pre-pool-create";
  pub const PRE_AUTOLOAD_DUMP: &str = "pre-autoload-dump";
}
