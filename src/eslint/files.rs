//! Lint config file location and format detection
//!
//! Two canonical shared-base filenames exist, one per serialization format,
//! checked in a fixed priority order (structured first). A set of legacy
//! root-level filenames signals a pre-monorepo flat setup; together with an
//! active inference plugin it means lint targets are synthesized rather than
//! declared.

use crate::core::tree::Tree;
use crate::core::workspace::{LINT_TARGET, ProjectDescriptor, TargetSpec};
use crate::eslint::LINT_EXECUTOR;

/// Shared base config, structured-list format
pub const BASE_CONFIG_JSON: &str = ".eslintrc.base.json";

/// Shared base config, flat-module format
pub const BASE_CONFIG_FLAT: &str = "eslint.base.config.js";

/// Workspace plugin that infers lint targets from config files on disk
pub const INFERENCE_PLUGIN: &str = "@nx/eslint/plugin";

/// Legacy root config filenames recognized by the migration planner
pub const LEGACY_CONFIG_FILENAMES: &[&str] = &[
  ".eslintrc",
  ".eslintrc.js",
  ".eslintrc.cjs",
  ".eslintrc.yaml",
  ".eslintrc.yml",
  ".eslintrc.json",
  "eslint.config.js",
];

/// Workspace-wide config serialization format, detected once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  /// `.eslintrc.json` style: one JSON document with an overrides list
  StructuredList,
  /// `eslint.config.js` style: an exported list built from a config module
  FlatModule,
  /// No recognized config anywhere in the workspace
  Absent,
}

/// Detect the workspace config format.
///
/// Flat wins when a root `eslint.config.js` (or flat base) exists; otherwise
/// any structured root file decides; otherwise the format is absent and the
/// caller chooses a default.
pub fn detect_format(tree: &Tree) -> Format {
  if tree.exists("eslint.config.js") || tree.exists(BASE_CONFIG_FLAT) {
    return Format::FlatModule;
  }
  if tree.exists(BASE_CONFIG_JSON)
    || LEGACY_CONFIG_FILENAMES
      .iter()
      .any(|f| *f != "eslint.config.js" && tree.exists(f))
  {
    return Format::StructuredList;
  }
  Format::Absent
}

/// Locate an existing shared base config; structured checked first
pub fn locate_base_config(tree: &Tree) -> Option<&'static str> {
  if tree.exists(BASE_CONFIG_JSON) {
    Some(BASE_CONFIG_JSON)
  } else if tree.exists(BASE_CONFIG_FLAT) {
    Some(BASE_CONFIG_FLAT)
  } else {
    None
  }
}

/// Find the root config file a per-project config should extend:
/// a shared base first, then any legacy root file.
pub fn find_eslint_file(tree: &Tree) -> Option<&'static str> {
  locate_base_config(tree).or_else(|| LEGACY_CONFIG_FILENAMES.iter().copied().find(|f| tree.exists(f)))
}

/// Whether the workspace declares the lint inference plugin in nx.json
pub fn has_inference_plugin(tree: &Tree) -> bool {
  let Ok(nx_json) = tree.read_json::<serde_json::Value>("nx.json") else {
    return false;
  };
  let Some(plugins) = nx_json.get("plugins").and_then(|p| p.as_array()) else {
    return false;
  };
  plugins.iter().any(|p| match p {
    serde_json::Value::String(name) => name == INFERENCE_PLUGIN,
    serde_json::Value::Object(obj) => obj.get("plugin").and_then(|v| v.as_str()) == Some(INFERENCE_PLUGIN),
    _ => false,
  })
}

/// Find an explicit lint target on a project: either the `lint` entry or any
/// target wired to the lint executor.
pub fn find_lint_target(project: &ProjectDescriptor) -> Option<&TargetSpec> {
  if project.has_lint_target() {
    return project.targets.get(LINT_TARGET);
  }
  project
    .targets
    .values()
    .find(|t| t.executor.as_deref() == Some(LINT_EXECUTOR))
}

/// Relative prefix from a project root back to the workspace root,
/// one `../` per path segment.
pub fn offset_from_root(project_root: &str) -> String {
  if project_root == "." || project_root.is_empty() {
    return String::new();
  }
  project_root
    .trim_matches('/')
    .split('/')
    .map(|_| "../")
    .collect::<String>()
}
