//! Status command implementation

use crate::core::error::GenResult;
use crate::core::tree::Tree;
use crate::core::workspace::{WorkspaceState, join_root};
use crate::eslint::files::{Format, detect_format, find_lint_target, has_inference_plugin, locate_base_config};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ProjectStatus {
  name: String,
  root: String,
  lint_target: bool,
  config_file: Option<String>,
}

#[derive(Debug, Serialize)]
struct WorkspaceStatus {
  format: String,
  base_config: Option<String>,
  inference_plugin: bool,
  projects: Vec<ProjectStatus>,
}

/// Run the status command: show the workspace lint layout
pub fn run_status(workspace_root: &Path, json: bool) -> GenResult<()> {
  let tree = Tree::open(workspace_root);
  let state = WorkspaceState::load(&tree)?;

  let format = match detect_format(&tree) {
    Format::StructuredList => "structured",
    Format::FlatModule => "flat",
    Format::Absent => "absent",
  };

  let projects = state
    .projects()
    .map(|project| {
      let structured = join_root(&project.root, ".eslintrc.json");
      let flat = join_root(&project.root, "eslint.config.js");
      let config_file = if tree.exists(&structured) {
        Some(structured)
      } else if tree.exists(&flat) {
        Some(flat)
      } else {
        None
      };
      ProjectStatus {
        name: project.name.clone(),
        root: project.root.clone(),
        lint_target: find_lint_target(project).is_some(),
        config_file,
      }
    })
    .collect();

  let status = WorkspaceStatus {
    format: format.to_string(),
    base_config: locate_base_config(&tree).map(String::from),
    inference_plugin: has_inference_plugin(&tree),
    projects,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&status)?);
    return Ok(());
  }

  println!("Lint config format: {}", status.format);
  match &status.base_config {
    Some(base) => println!("Shared base config: {}", base),
    None => println!("Shared base config: (none)"),
  }
  println!(
    "Inference plugin:   {}",
    if status.inference_plugin { "active" } else { "inactive" }
  );
  println!();

  if state.is_empty() {
    println!("No projects found.");
    return Ok(());
  }
  println!("{} project(s):", state.len());
  for project in &status.projects {
    let target = if project.lint_target { "lint target" } else { "no lint target" };
    let config = project.config_file.as_deref().unwrap_or("(no config)");
    println!("📦 {} ({})", project.name, project.root);
    println!("   {} · {}", target, config);
  }
  Ok(())
}
