//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// An Nx-style test workspace on disk
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a new test workspace with basic structure
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("package.json"),
      r#"{
  "name": "test-workspace",
  "devDependencies": {}
}
"#,
    )?;
    std::fs::write(
      path.join("nx.json"),
      r#"{
  "extends": "nx/presets/core.json",
  "plugins": []
}
"#,
    )?;
    // keep lint targets explicit unless a test opts back in
    std::fs::write(path.join("lintgen.toml"), "[generator]\ninfer_targets = false\n")?;

    Ok(Self { _root: root, path })
  }

  /// Add a project descriptor at the given root
  pub fn add_project(&self, name: &str, root: &str, project_type: &str, targets: &str) -> Result<()> {
    let dir = if root == "." {
      self.path.clone()
    } else {
      let dir = self.path.join(root);
      std::fs::create_dir_all(&dir)?;
      dir
    };
    std::fs::write(
      dir.join("project.json"),
      format!(
        r#"{{
  "name": "{}",
  "projectType": "{}",
  "targets": {}
}}
"#,
        name, project_type, targets
      ),
    )?;
    Ok(())
  }

  /// Add a root project that already carries an explicit lint target and a
  /// flat single-project config
  pub fn add_root_app_with_lint(&self) -> Result<()> {
    self.add_project("app", ".", "application", r#"{"lint": {"executor": "@nx/eslint:lint"}}"#)?;
    std::fs::write(
      self.path.join(".eslintrc.json"),
      "{\n  \"root\": true,\n  \"ignorePatterns\": [\"**/*\"]\n}\n",
    )?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(path)).with_context(|| format!("Failed to read {}", path))
  }

  /// Read and parse a JSON file
  pub fn read_json(&self, path: &str) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(&self.read_file(path)?)?)
  }
}

/// Run the lintgen CLI, failing the test on a non-zero exit
pub fn run_lintgen(cwd: &Path, args: &[&str]) -> Result<Output> {
  let lintgen_bin = env!("CARGO_BIN_EXE_lintgen");

  let output = Command::new(lintgen_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run lintgen")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "lintgen command failed: lintgen {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
