//! Tests for the `status` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_status_reports_workspace_layout() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  workspace.add_project("lib-a", "libs/lib-a", "library", "{}")?;

  let output = run_lintgen(&workspace.path, &["status"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("structured"));
  assert!(stdout.contains("app"));
  assert!(stdout.contains("lib-a"));

  Ok(())
}

#[test]
fn test_status_json_output() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_root_app_with_lint()?;
  workspace.add_project("lib-a", "libs/lib-a", "library", "{}")?;

  let output = run_lintgen(&workspace.path, &["status", "--json"])?;
  let status: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(status["format"], "structured");
  assert_eq!(status["base_config"], serde_json::Value::Null);
  assert_eq!(status["inference_plugin"], false);

  let projects = status["projects"].as_array().unwrap();
  assert_eq!(projects.len(), 2);
  assert_eq!(projects[0]["name"], "app");
  assert_eq!(projects[0]["lint_target"], true);
  assert_eq!(projects[0]["config_file"], ".eslintrc.json");
  assert_eq!(projects[1]["name"], "lib-a");
  assert_eq!(projects[1]["lint_target"], false);

  Ok(())
}
