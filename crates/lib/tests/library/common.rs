//! Shared fixtures for library tests.

use scaffold_lib::config::GeneralizeConfig;
use scaffold_lib::manifest::Manifest;
use serde_json::json;

/// A template manifest as shipped by the bootstrap package.
pub fn template_manifest() -> Manifest {
  Manifest::from_value(json!({
    "name": "drevops/scaffold",
    "description": "Drupal project scaffold",
    "type": "project",
    "license": "GPL-2.0-or-later",
    "version": "1.2.0",
    "authors": [{"name": "Maintainer", "role": "Maintainer"}],
    "homepage": "https://github.com/drevops/scaffold",
    "require": {
      "php": ">=8.1",
      "drupal/core-recommended": "^10"
    },
    "require-dev": {
      "phpunit/phpunit": "^10",
      "behat/behat": "^3.13"
    },
    "config": {"sort-packages": true},
    "autoload": {
      "classmap": [
        "scripts/composer/ScaffoldGeneralizer.php",
        "scripts/composer/ScriptHandler.php"
      ]
    },
    "scripts": {
      "post-root-package-install": [
        "DrevOps\\composer\\ScaffoldGeneralizer::generalizeAndRemoveItselfAfterProjectCreate"
      ],
      "post-install-cmd": ["DrevOps\\composer\\ScriptHandler::createRequiredFiles"]
    },
    "extra": {
      "drupal-scaffold": {
        "locations": {"web-root": "./web"},
        "file-mapping": {
          "[project-root]/.circleci/config.yml": "scripts/config.yml",
          "[web-root]/robots.txt": false
        }
      },
      "patches": []
    }
  }))
  .unwrap()
}

pub fn config() -> GeneralizeConfig {
  GeneralizeConfig::default()
}
