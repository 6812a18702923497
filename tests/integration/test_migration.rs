//! Tests for the monorepo migration path

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_single_known_project_skips_migration() -> Result<()> {
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

  // only the root app was known before this call: no shared base appears,
  // the root config stays the root project's own config
  assert!(!workspace.file_exists(".eslintrc.base.json"));
  let root_config = workspace.read_json(".eslintrc.json")?;
  assert_eq!(root_config["root"], true);
  assert!(root_config.get("extends").is_none());

  Ok(())
}

#[test]
fn test_two_existing_projects_trigger_migration() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  workspace.add_project("lib-a", "libs/lib-a", "library", "{}")?;
  workspace.add_project("lib-b", "libs/lib-b", "library", "{}")?;

  run_lintgen(
    &workspace.path,
    &["generate", "lib-b", "--pattern", "libs/lib-b/**/*.ts", "--apply"],
  )?;

  // the flat root config was promoted to the shared base
  let base = workspace.read_json(".eslintrc.base.json")?;
  assert_eq!(base["root"], true);

  // every project except the target was rewritten to extend the base
  let root_config = workspace.read_json(".eslintrc.json")?;
  assert_eq!(root_config["extends"][0], "./.eslintrc.base.json");
  let lib_a = workspace.read_json("libs/lib-a/.eslintrc.json")?;
  assert_eq!(lib_a["extends"][0], "../../.eslintrc.base.json");

  // and the target itself extends it too
  let lib_b = workspace.read_json("libs/lib-b/.eslintrc.json")?;
  assert_eq!(lib_b["extends"][0], "../../.eslintrc.base.json");

  Ok(())
}

#[test]
fn test_existing_base_config_is_left_alone() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  std::fs::write(
    workspace.path.join(".eslintrc.base.json"),
    "{\n  \"root\": true,\n  \"ignorePatterns\": [\"**/*\"]\n}\n",
  )?;
  workspace.add_project("lib-a", "libs/lib-a", "library", "{}")?;
  workspace.add_project("lib-b", "libs/lib-b", "library", "{}")?;

  let before = workspace.read_file(".eslintrc.json")?;
  run_lintgen(&workspace.path, &["generate", "lib-b", "--apply"])?;

  // already migrated: the root's own config is not rewritten again
  assert_eq!(workspace.read_file(".eslintrc.json")?, before);
  assert!(!workspace.file_exists("libs/lib-a/.eslintrc.json"));

  Ok(())
}
