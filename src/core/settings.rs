//! Tool settings for lintgen
//! Searched in order: lintgen.toml, .lintgen.toml, .config/lintgen.toml
//!
//! Settings only supply *defaults* for the generator entry call. Nothing in
//! the core reads ambient process state; every toggle is threaded explicitly
//! through `GenerateOptions`.

use crate::core::error::{FormatError, GenError, GenResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for lintgen
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
  #[serde(default)]
  pub generator: GeneratorSettings,
}

/// Defaults for the generator entry call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
  /// Whether lint targets are inferred by the workspace plugin rather than
  /// declared per project (default: true, matching plugin-first workspaces)
  #[serde(default = "default_infer_targets")]
  pub infer_targets: bool,

  /// Preferred config format when the workspace has none yet:
  /// "structured" (.eslintrc.json) or "flat" (eslint.config.js)
  #[serde(default = "default_format")]
  pub default_format: String,

  /// Skip touching package.json dev dependencies
  #[serde(default)]
  pub skip_package_json: bool,
}

fn default_infer_targets() -> bool {
  true
}

fn default_format() -> String {
  "structured".to_string()
}

impl Default for GeneratorSettings {
  fn default() -> Self {
    Self {
      infer_targets: default_infer_targets(),
      default_format: default_format(),
      skip_package_json: false,
    }
  }
}

impl Settings {
  /// Find settings file in search order: lintgen.toml, .lintgen.toml, .config/lintgen.toml
  pub fn find_settings_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("lintgen.toml"),
      path.join(".lintgen.toml"),
      path.join(".config").join("lintgen.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load settings, falling back to defaults when no file exists
  pub fn load(path: &Path) -> GenResult<Self> {
    let Some(settings_path) = Self::find_settings_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&settings_path)
      .with_context(|| format!("Failed to read settings from {}", settings_path.display()))?;
    let settings: Settings = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse settings from {}", settings_path.display()))?;

    settings
      .validate()
      .with_context(|| format!("Invalid settings in {}", settings_path.display()))?;

    Ok(settings)
  }

  /// Validate settings values
  pub fn validate(&self) -> GenResult<()> {
    match self.generator.default_format.as_str() {
      "structured" | "flat" => Ok(()),
      other => Err(GenError::Format(FormatError::Unsupported { found: other.to_string() })),
    }
  }
}
