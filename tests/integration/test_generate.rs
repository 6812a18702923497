//! Tests for the `generate` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  workspace.add_project(
    "lib-a",
    "libs/lib-a",
    "library",
    r#"{"build": {"executor": "@nx/js:tsc"}}"#,
  )?;

  let output = run_lintgen(
    &workspace.path,
    &["generate", "lib-a", "--pattern", "libs/lib-a/**/*.ts"],
  )?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("dry-run"));
  assert!(!workspace.file_exists("libs/lib-a/.eslintrc.json"));

  Ok(())
}

#[test]
fn test_generate_creates_project_config() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  workspace.add_project(
    "lib-a",
    "libs/lib-a",
    "library",
    r#"{"build": {"executor": "@nx/js:tsc"}}"#,
  )?;

  run_lintgen(
    &workspace.path,
    &["generate", "lib-a", "--pattern", "libs/lib-a/**/*.ts", "--apply"],
  )?;

  let config = workspace.read_json("libs/lib-a/.eslintrc.json")?;
  assert_eq!(config["extends"][0], "../../.eslintrc.json");
  assert_eq!(config["ignorePatterns"][0], "!**/*");

  // buildable library: last override lints package.json dependencies
  let overrides = config["overrides"].as_array().unwrap();
  assert_eq!(overrides.len(), 4);
  let json_override = &overrides[3];
  assert_eq!(json_override["files"][0], "*.json");
  assert_eq!(json_override["parser"], "jsonc-eslint-parser");
  assert_eq!(json_override["rules"]["@nx/dependency-checks"], "error");

  // lint target wired with the manifest pattern appended
  let descriptor = workspace.read_json("libs/lib-a/project.json")?;
  assert_eq!(descriptor["targets"]["lint"]["executor"], "@nx/eslint:lint");
  let patterns = descriptor["targets"]["lint"]["options"]["lintFilePatterns"]
    .as_array()
    .unwrap();
  assert_eq!(patterns.len(), 2);
  assert_eq!(patterns[0], "libs/lib-a/**/*.ts");
  assert_eq!(patterns[1], "{projectRoot}/package.json");

  Ok(())
}

#[test]
fn test_generate_adds_tooling_dependencies() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  workspace.add_project("lib-a", "libs/lib-a", "library", "{}")?;

  run_lintgen(&workspace.path, &["generate", "lib-a", "--apply"])?;

  let package = workspace.read_json("package.json")?;
  assert!(package["devDependencies"]["eslint"].is_string());
  assert!(package["devDependencies"]["@nx/eslint"].is_string());

  Ok(())
}

#[test]
fn test_generate_unknown_project_fails() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;

  let result = run_lintgen(&workspace.path, &["generate", "missing", "--apply"]);
  assert!(result.is_err());
  assert!(!workspace.file_exists(".eslintrc.base.json"));

  Ok(())
}

#[test]
fn test_flat_workspace_gets_flat_config() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_project("app", ".", "application", r#"{"lint": {"executor": "@nx/eslint:lint"}}"#)?;
  std::fs::write(workspace.path.join("eslint.config.js"), "module.exports = [];\n")?;
  workspace.add_project(
    "lib-a",
    "libs/lib-a",
    "library",
    r#"{"build": {"executor": "@nx/js:tsc"}}"#,
  )?;

  run_lintgen(&workspace.path, &["generate", "lib-a", "--apply"])?;

  let config = workspace.read_file("libs/lib-a/eslint.config.js")?;
  assert!(config.contains("const baseConfig = require('../../eslint.config.js');"));
  assert!(config.contains("...baseConfig,"));
  assert!(config.contains("module.exports = ["));
  // buildable library bridges the JSON override through the compat shim
  assert!(config.contains("FlatCompat"));
  assert!(config.contains("@nx/dependency-checks"));

  Ok(())
}
