//! Config document construction and serialization
//!
//! A generated config is first built as an immutable, ordered sequence of
//! tagged nodes, then serialized as a pure function of that sequence. Node
//! order is override precedence (later entries win), so serialization must
//! preserve construction order exactly, and identical input must produce
//! byte-identical text.

use crate::core::error::{ConstructionError, GenError, GenResult};
use crate::core::tree::Tree;
use crate::core::workspace::{ProjectDescriptor, join_root};
use crate::eslint::files::{Format, find_eslint_file, offset_from_root};
use crate::eslint::policy::{OverrideEntry, OverridePolicy};
use serde::Serialize;
use std::collections::BTreeSet;

/// Local name bound to the extended base config in flat modules
pub const BASE_CONFIG_LOCAL: &str = "baseConfig";

/// Compat shim module and its destructured binding
const COMPAT_MODULE: &str = "@eslint/eslintrc";
const COMPAT_LOCAL: &str = "FlatCompat";
const JS_MODULE: &str = "@eslint/js";
const JS_LOCAL: &str = "js";

/// One node of a flat config module
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
  /// `const <local_name> = require('<path>');`
  ImportBinding { path: String, local_name: String },
  /// `...<local_name>` inside the exported list
  SpreadOf { local_name: String },
  /// One override entry, emitted as an object literal
  Override(OverrideEntry),
  /// Overrides bridged through the flat-config compatibility shim
  CompatWrapper(Vec<ConfigNode>),
}

/// Finalized, ordered sequence of config nodes.
///
/// Immutable once built; produced fresh per generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeList {
  nodes: Vec<ConfigNode>,
}

impl NodeList {
  pub fn nodes(&self) -> &[ConfigNode] {
    &self.nodes
  }
}

/// Accumulates config nodes and validates reference integrity on finish
#[derive(Debug, Default)]
pub struct NodeListBuilder {
  nodes: Vec<ConfigNode>,
}

impl NodeListBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare an import binding
  pub fn import(mut self, path: impl Into<String>, local_name: impl Into<String>) -> Self {
    self.nodes.push(ConfigNode::ImportBinding {
      path: path.into(),
      local_name: local_name.into(),
    });
    self
  }

  /// Spread a previously imported config into the exported list
  pub fn spread(mut self, local_name: impl Into<String>) -> Self {
    self.nodes.push(ConfigNode::SpreadOf {
      local_name: local_name.into(),
    });
    self
  }

  /// Append one override node
  pub fn override_entry(mut self, entry: OverrideEntry) -> Self {
    self.nodes.push(ConfigNode::Override(entry));
    self
  }

  /// Wrap overrides in the compatibility shim
  pub fn compat(mut self, inner: Vec<ConfigNode>) -> Self {
    self.nodes.push(ConfigNode::CompatWrapper(inner));
    self
  }

  /// Finalize the sequence.
  ///
  /// A `SpreadOf` that references an undeclared import, or a duplicate import
  /// binding, is a construction error: a sequencing bug in the generator,
  /// never a user-facing condition.
  pub fn finish(self) -> GenResult<NodeList> {
    let mut declared = BTreeSet::new();
    for node in &self.nodes {
      if let ConfigNode::ImportBinding { local_name, .. } = node {
        if !declared.insert(local_name.clone()) {
          return Err(GenError::Construction(ConstructionError::DuplicateBinding {
            local_name: local_name.clone(),
          }));
        }
      }
    }
    check_spreads(&self.nodes, &declared)?;
    Ok(NodeList { nodes: self.nodes })
  }
}

fn check_spreads(nodes: &[ConfigNode], declared: &BTreeSet<String>) -> GenResult<()> {
  for node in nodes {
    match node {
      ConfigNode::SpreadOf { local_name } if !declared.contains(local_name) => {
        return Err(GenError::Construction(ConstructionError::DanglingSpread {
          local_name: local_name.clone(),
        }));
      }
      ConfigNode::CompatWrapper(inner) => check_spreads(inner, declared)?,
      _ => {}
    }
  }
  Ok(())
}

/// Build the flat config module for a policy.
///
/// Import bindings come first (compat shim, then the base config), then the
/// base spread, then one node per override in policy order, with
/// compat-requiring overrides wrapped individually.
pub fn build_flat_nodes(
  policy: &OverridePolicy,
  base_config_path: Option<&str>,
  needs_compat: bool,
) -> GenResult<NodeList> {
  let mut builder = NodeListBuilder::new();
  if needs_compat {
    builder = builder.import(COMPAT_MODULE, COMPAT_LOCAL).import(JS_MODULE, JS_LOCAL);
  }
  if let Some(path) = base_config_path {
    builder = builder.import(path, BASE_CONFIG_LOCAL).spread(BASE_CONFIG_LOCAL);
  }
  for entry in policy.entries() {
    if entry.needs_compat() {
      builder = builder.compat(vec![ConfigNode::Override(entry.clone())]);
    } else {
      builder = builder.override_entry(entry.clone());
    }
  }
  builder.finish()
}

/// Serialize a flat config module: `build(policy, base, compat)` is
/// deterministic, identical arguments yield byte-identical text.
pub fn build_flat(policy: &OverridePolicy, base_config_path: Option<&str>, needs_compat: bool) -> GenResult<String> {
  Ok(stringify(&build_flat_nodes(policy, base_config_path, needs_compat)?))
}

/// Serialize a finalized node list to CommonJS source text
pub fn stringify(list: &NodeList) -> String {
  let mut out = String::new();

  let mut has_compat = false;
  let mut has_imports = false;
  for node in list.nodes() {
    if let ConfigNode::ImportBinding { path, local_name } = node {
      has_imports = true;
      if path == COMPAT_MODULE {
        has_compat = true;
        out.push_str(&format!("const {{ {} }} = require('{}');\n", local_name, path));
      } else {
        out.push_str(&format!("const {} = require('{}');\n", local_name, path));
      }
    }
  }
  if has_imports {
    out.push('\n');
  }

  if has_compat {
    out.push_str("const compat = new FlatCompat({\n");
    out.push_str("  baseDirectory: __dirname,\n");
    out.push_str("  recommendedConfig: js.configs.recommended,\n");
    out.push_str("});\n\n");
  }

  out.push_str("module.exports = [\n");
  for node in list.nodes() {
    stringify_node(node, &mut out);
  }
  out.push_str("];\n");
  out
}

fn stringify_node(node: &ConfigNode, out: &mut String) {
  match node {
    ConfigNode::ImportBinding { .. } => {}
    ConfigNode::SpreadOf { local_name } => {
      out.push_str(&format!("  ...{},\n", local_name));
    }
    ConfigNode::Override(entry) => {
      out.push_str(&indent_json(&entry_json(entry), 1));
      out.push_str(",\n");
    }
    ConfigNode::CompatWrapper(inner) => {
      for node in inner {
        let ConfigNode::Override(entry) = node else {
          continue;
        };
        // the eslintrc-only bits go through compat.config; files and rules
        // are re-applied on the flattened result
        let mut env = serde_json::Map::new();
        if let Some(parser) = &entry.parser {
          env.insert("parser".into(), serde_json::Value::String(parser.clone()));
        }
        if let Some(parser_options) = &entry.parser_options {
          env.insert("parserOptions".into(), parser_options.clone());
        }
        let mut patch = serde_json::Map::new();
        patch.insert(
          "files".into(),
          serde_json::Value::Array(entry.files.iter().map(|f| f.clone().into()).collect()),
        );
        patch.insert("rules".into(), serde_json::Value::Object(entry.rules.clone()));

        out.push_str("  ...compat.config(");
        out.push_str(indent_json(&serde_json::Value::Object(env), 1).trim_start());
        out.push_str(").map(config => ({\n    ...config,\n");
        for (key, value) in &patch {
          out.push_str("    ");
          out.push_str(&format!("\"{}\": ", key));
          out.push_str(indent_json(value, 2).trim_start());
          out.push_str(",\n");
        }
        out.push_str("  })),\n");
      }
    }
  }
}

fn entry_json(entry: &OverrideEntry) -> serde_json::Value {
  serde_json::to_value(entry).expect("override entry serializes")
}

/// Pretty-print a JSON value at a 2-space indent depth
fn indent_json(value: &serde_json::Value, depth: usize) -> String {
  let text = serde_json::to_string_pretty(value).expect("value serializes");
  let pad = "  ".repeat(depth);
  text
    .lines()
    .map(|line| format!("{}{}", pad, line))
    .collect::<Vec<_>>()
    .join("\n")
}

/// The structured-list config document (`.eslintrc.json`)
#[derive(Debug, Clone, Serialize)]
pub struct StructuredConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub extends: Option<Vec<String>>,

  /// The shared root config excludes everything by default, so every
  /// per-project file must re-include itself.
  #[serde(rename = "ignorePatterns")]
  pub ignore_patterns: Vec<String>,

  pub overrides: OverridePolicy,
}

impl StructuredConfig {
  pub fn new(base: Option<String>, policy: OverridePolicy) -> Self {
    Self {
      extends: base.map(|b| vec![b]),
      ignore_patterns: vec!["!**/*".to_string()],
      overrides: policy,
    }
  }
}

/// Write a project's config file in the detected format, extending the root
/// config unless the project is standalone.
pub fn write_project_config(
  tree: &mut Tree,
  project: &ProjectDescriptor,
  policy: &OverridePolicy,
  format: Format,
  extend_root: bool,
) -> GenResult<()> {
  let extended = if extend_root { find_eslint_file(tree) } else { None };
  let base_path = extended.map(|file| {
    let offset = offset_from_root(&project.root);
    if offset.is_empty() {
      format!("./{}", file)
    } else {
      format!("{}{}", offset, file)
    }
  });

  match format {
    Format::FlatModule => {
      let text = build_flat(policy, base_path.as_deref(), policy.needs_compat())?;
      tree.write(&join_root(&project.root, "eslint.config.js"), text.into_bytes());
      Ok(())
    }
    Format::StructuredList | Format::Absent => {
      let document = StructuredConfig::new(base_path, policy.clone());
      tree.write_json(&join_root(&project.root, ".eslintrc.json"), &document)
    }
  }
}
