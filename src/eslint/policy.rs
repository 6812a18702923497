//! Override policy evaluation
//!
//! Produces the ordered set of file-pattern scoped overrides for a project.
//! The evaluation is total: malformed glob strings pass through uninterpreted,
//! validation belongs to the lint runner.

use crate::core::workspace::ProjectDescriptor;
use crate::eslint::{DEPENDENCY_CHECKS_RULE, JSONC_PARSER};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Placeholder for the project root inside caller-supplied patterns
pub const PROJECT_ROOT_TOKEN: &str = "{projectRoot}";

/// Default pattern for a workspace-root project with no supplied patterns
pub const ROOT_DEFAULT_PATTERN: &str = "./src";

/// One file-pattern scoped override. Field order is serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
  pub files: Vec<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub parser: Option<String>,

  #[serde(rename = "parserOptions", skip_serializing_if = "Option::is_none")]
  pub parser_options: Option<serde_json::Value>,

  pub rules: serde_json::Map<String, serde_json::Value>,
}

impl OverrideEntry {
  /// Empty-rule override for a pattern set; acts as an explicit extension point
  pub fn empty(files: &[&str]) -> Self {
    Self {
      files: files.iter().map(|f| f.to_string()).collect(),
      parser: None,
      parser_options: None,
      rules: serde_json::Map::new(),
    }
  }

  /// Whether this override needs the flat-config compatibility shim
  pub fn needs_compat(&self) -> bool {
    self.parser.as_deref() == Some(JSONC_PARSER)
  }
}

/// Ordered sequence of overrides. Later entries win; declaration order must
/// survive serialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverridePolicy(pub Vec<OverrideEntry>);

impl OverridePolicy {
  pub fn entries(&self) -> &[OverrideEntry] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Whether any entry requires the flat-config compatibility shim
  pub fn needs_compat(&self) -> bool {
    self.0.iter().any(OverrideEntry::needs_compat)
  }
}

/// Resolve the effective lint file patterns for a project.
///
/// 1. No supplied patterns and the project owns the workspace root: default
///    to `["./src"]`.
/// 2. Supplied, non-empty, placeholder-free patterns on a buildable library:
///    append `{projectRoot}/package.json` so the manifest participates in the
///    dependency-consistency check.
pub fn resolve_patterns(
  project: &ProjectDescriptor,
  supplied: Option<Vec<String>>,
  root_project: bool,
) -> Option<Vec<String>> {
  let mut patterns = match supplied {
    None if root_project && project.is_root_project() => return Some(vec![ROOT_DEFAULT_PATTERN.to_string()]),
    None => return None,
    Some(patterns) => patterns,
  };

  if !patterns.is_empty()
    && !patterns.iter().any(|p| p == PROJECT_ROOT_TOKEN)
    && project.is_buildable_library()
  {
    patterns.push(format!("{}/package.json", PROJECT_ROOT_TOKEN));
  }

  Some(patterns)
}

/// Evaluate the override policy for a project, in fixed order:
///
/// 1. Source files (`*.ts`, `*.tsx`, `*.js`, `*.jsx`) with empty rules;
///    type-aware `parserOptions.project` only when the caller opted in.
/// 2. Empty-rule split by `*.ts`/`*.tsx`.
/// 3. Empty-rule split by `*.js`/`*.jsx`.
/// 4. Buildable libraries: `*.json` parsed as JSON-with-comments with the
///    dependency-consistency rule at error severity.
pub fn evaluate(project: &ProjectDescriptor, set_parser_options_project: bool) -> OverridePolicy {
  let mut source_override = OverrideEntry::empty(&["*.ts", "*.tsx", "*.js", "*.jsx"]);
  if set_parser_options_project {
    // Opt-in only: a populated parserOptions.project forces full program
    // construction on every lint run, which most workspaces never need.
    source_override.parser_options = Some(json!({
      "project": [format!("{}/tsconfig.*?.json", project.root)],
    }));
  }

  let mut entries = vec![
    source_override,
    OverrideEntry::empty(&["*.ts", "*.tsx"]),
    OverrideEntry::empty(&["*.js", "*.jsx"]),
  ];

  if project.is_buildable_library() {
    let mut rules = serde_json::Map::new();
    rules.insert(DEPENDENCY_CHECKS_RULE.to_string(), json!("error"));
    entries.push(OverrideEntry {
      files: vec!["*.json".to_string()],
      parser: Some(JSONC_PARSER.to_string()),
      parser_options: None,
      rules,
    });
  }

  OverridePolicy(entries)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::workspace::{ProjectKind, TargetSpec};

  fn buildable_lib(root: &str) -> ProjectDescriptor {
    let mut project = ProjectDescriptor::new("lib-a", root, ProjectKind::Library);
    project.targets.insert("build".into(), TargetSpec::executor("@nx/js:tsc"));
    project
  }

  #[test]
  fn test_root_default_pattern() {
    let project = ProjectDescriptor::new("app", ".", ProjectKind::Application);
    let patterns = resolve_patterns(&project, None, true);
    assert_eq!(patterns, Some(vec!["./src".to_string()]));
  }

  #[test]
  fn test_no_patterns_for_non_root() {
    let project = buildable_lib("libs/lib-a");
    assert_eq!(resolve_patterns(&project, None, false), None);
  }

  #[test]
  fn test_buildable_library_appends_manifest() {
    let project = buildable_lib("libs/lib-a");
    let patterns = resolve_patterns(&project, Some(vec!["libs/lib-a/**/*.ts".into()]), false).unwrap();
    assert_eq!(
      patterns,
      vec!["libs/lib-a/**/*.ts".to_string(), "{projectRoot}/package.json".to_string()]
    );
  }

  #[test]
  fn test_placeholder_suppresses_manifest_append() {
    let project = buildable_lib("libs/lib-a");
    let patterns = resolve_patterns(&project, Some(vec!["{projectRoot}".into()]), false).unwrap();
    assert_eq!(patterns, vec!["{projectRoot}".to_string()]);
  }

  #[test]
  fn test_non_buildable_library_untouched() {
    let project = ProjectDescriptor::new("lib-b", "libs/lib-b", ProjectKind::Library);
    let patterns = resolve_patterns(&project, Some(vec!["libs/lib-b/**/*.ts".into()]), false).unwrap();
    assert_eq!(patterns, vec!["libs/lib-b/**/*.ts".to_string()]);
  }

  #[test]
  fn test_policy_shape_for_application() {
    let project = ProjectDescriptor::new("app", "apps/app", ProjectKind::Application);
    let policy = evaluate(&project, false);
    assert_eq!(policy.len(), 3);
    assert_eq!(policy.entries()[0].files, vec!["*.ts", "*.tsx", "*.js", "*.jsx"]);
    assert!(policy.entries()[0].parser_options.is_none());
    assert!(policy.entries().iter().all(|e| e.rules.is_empty()));
    assert!(!policy.needs_compat());
  }

  #[test]
  fn test_parser_options_opt_in() {
    let project = ProjectDescriptor::new("app", "apps/app", ProjectKind::Application);
    let policy = evaluate(&project, true);
    let parser_options = policy.entries()[0].parser_options.as_ref().unwrap();
    assert_eq!(parser_options["project"][0], "apps/app/tsconfig.*?.json");
  }

  #[test]
  fn test_buildable_library_json_override() {
    let project = buildable_lib("libs/lib-a");
    let policy = evaluate(&project, false);
    assert_eq!(policy.len(), 4);

    let json_override = &policy.entries()[3];
    assert_eq!(json_override.files, vec!["*.json"]);
    assert_eq!(json_override.parser.as_deref(), Some(JSONC_PARSER));
    assert_eq!(json_override.rules[DEPENDENCY_CHECKS_RULE], "error");
    assert!(policy.needs_compat());
  }
}
