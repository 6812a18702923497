//! Shared lint tooling initialization
//!
//! Ensures the workspace-level pieces every generated config relies on:
//! dev dependency pins in the root package.json, the inference plugin entry
//! in nx.json, and a root config when one is being established for the
//! first time.

use crate::core::error::GenResult;
use crate::core::tree::Tree;
use crate::eslint::files::{Format, INFERENCE_PLUGIN, find_eslint_file};
use serde_json::json;

/// Baseline dev dependencies every linted workspace gets
pub const BASE_DEV_DEPENDENCIES: &[(&str, &str)] = &[("@nx/eslint", "^19.8.0"), ("eslint", "~8.57.0")];

/// Extra dev dependencies for flat configs that bridge through the compat shim
pub const COMPAT_DEV_DEPENDENCIES: &[(&str, &str)] = &[("@eslint/eslintrc", "^2.1.1"), ("@eslint/js", "~8.57.0")];

/// Parser dependency for JSON override entries
pub const JSONC_DEV_DEPENDENCIES: &[(&str, &str)] = &[("jsonc-eslint-parser", "^3.1.0")];

fn clean_version(spec: &str) -> Option<semver::Version> {
  semver::Version::parse(spec.trim_start_matches(['^', '~', '=', 'v'])).ok()
}

/// Stage dev dependency pins into the root package.json.
///
/// Missing entries are added. Existing pins are kept when
/// `keep_existing_versions` is set, and otherwise only replaced when the
/// requested version is strictly newer than the parseable existing pin.
pub fn ensure_dev_dependencies(tree: &mut Tree, deps: &[(&str, &str)], keep_existing_versions: bool) -> GenResult<()> {
  if !tree.exists("package.json") {
    return Ok(());
  }

  let mut package: serde_json::Value = tree.read_json("package.json")?;
  let dev_deps = package
    .as_object_mut()
    .and_then(|obj| {
      if !obj.contains_key("devDependencies") {
        obj.insert("devDependencies".into(), json!({}));
      }
      obj.get_mut("devDependencies")
    })
    .and_then(|v| v.as_object_mut());
  let Some(dev_deps) = dev_deps else {
    return Ok(());
  };

  let mut changed = false;
  for (name, requested) in deps {
    match dev_deps.get(*name).and_then(|v| v.as_str()) {
      None => {
        dev_deps.insert(name.to_string(), json!(requested));
        changed = true;
      }
      Some(_) if keep_existing_versions => {}
      Some(existing) => {
        let existing_version = clean_version(existing);
        let requested_version = clean_version(requested);
        if let (Some(existing_version), Some(requested_version)) = (existing_version, requested_version)
          && requested_version > existing_version
        {
          dev_deps.insert(name.to_string(), json!(requested));
          changed = true;
        }
      }
    }
  }

  if changed {
    tree.write_json("package.json", &package)?;
  }
  Ok(())
}

/// Register the lint inference plugin in nx.json when target inference is on
pub fn ensure_inference_plugin(tree: &mut Tree) -> GenResult<()> {
  if !tree.exists("nx.json") {
    return Ok(());
  }
  let mut nx_json: serde_json::Value = tree.read_json("nx.json")?;
  let Some(obj) = nx_json.as_object_mut() else {
    return Ok(());
  };
  if !obj.contains_key("plugins") {
    obj.insert("plugins".into(), json!([]));
  }
  let Some(plugins) = obj.get_mut("plugins").and_then(|v| v.as_array_mut()) else {
    return Ok(());
  };

  let present = plugins.iter().any(|p| match p {
    serde_json::Value::String(name) => name == INFERENCE_PLUGIN,
    serde_json::Value::Object(entry) => entry.get("plugin").and_then(|v| v.as_str()) == Some(INFERENCE_PLUGIN),
    _ => false,
  });
  if !present {
    plugins.push(json!(INFERENCE_PLUGIN));
    tree.write_json("nx.json", &nx_json)?;
  }
  Ok(())
}

/// Establish a root config when generating for the workspace-root project and
/// none exists yet. The root config is also the shared base for later
/// non-root projects, so it excludes everything by default.
pub fn setup_root_config(tree: &mut Tree, format: Format, root_project: bool) -> GenResult<()> {
  if !root_project || find_eslint_file(tree).is_some() {
    return Ok(());
  }

  match format {
    Format::FlatModule => {
      tree.write("eslint.config.js", "module.exports = [];\n");
      Ok(())
    }
    Format::StructuredList | Format::Absent => tree.write_json(
      ".eslintrc.json",
      &json!({
        "root": true,
        "ignorePatterns": ["**/*"],
      }),
    ),
  }
}
