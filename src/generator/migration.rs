//! Monorepo migration planning and application
//!
//! Decides whether a workspace still carries a single flat lint setup that
//! must be converted to the shared-base + per-project-override layout before
//! a new project's config can be added, and applies that conversion as one
//! all-or-nothing batch against the staged tree.

use crate::core::error::{GenError, GenResult, MigrationError};
use crate::core::tree::Tree;
use crate::core::workspace::{ProjectDescriptor, WorkspaceState, join_root};
use crate::eslint::ast::write_project_config;
use crate::eslint::files::{
  BASE_CONFIG_FLAT, BASE_CONFIG_JSON, Format, LEGACY_CONFIG_FILENAMES, find_eslint_file, find_lint_target,
  has_inference_plugin, locate_base_config, offset_from_root,
};
use crate::eslint::policy::evaluate;
use crate::generator::init::ensure_dev_dependencies;
use crate::ui::progress::BatchProgress;
use serde_json::json;

/// Decision plus the descriptors to rewrite. Computed once per run and
/// consumed exactly once, before the target project's own files are written.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
  pub needed: bool,
  pub projects: Vec<ProjectDescriptor>,
}

impl MigrationPlan {
  fn no_migration() -> Self {
    Self {
      needed: false,
      projects: Vec::new(),
    }
  }
}

/// Decide whether migration is needed.
///
/// The decision operates on the projects known *prior* to this generation
/// call: the registry snapshot minus the generation target. The plan covers
/// exactly those projects.
///
/// 1. A shared base config already exists: already migrated.
/// 2. Exactly one prior project: nothing to share yet.
/// 3. No workspace-root project, or it declares no targets at all: nothing
///    to split.
/// 4. Inference plugin active and a legacy config file sits at the root:
///    inferred targets must be made explicit before splitting.
/// 5. Otherwise, migrate iff the root project has an explicit lint target.
pub fn decide(state: &WorkspaceState, tree: &Tree, target: &str) -> MigrationPlan {
  if locate_base_config(tree).is_some() {
    return MigrationPlan::no_migration();
  }

  let prior: Vec<&ProjectDescriptor> = state.projects().filter(|p| p.name != target).collect();
  if prior.len() <= 1 {
    return MigrationPlan::no_migration();
  }

  let Some(root_project) = prior.iter().find(|p| p.is_root_project()) else {
    return MigrationPlan::no_migration();
  };
  if root_project.targets.is_empty() {
    return MigrationPlan::no_migration();
  }

  let plan = MigrationPlan {
    needed: true,
    projects: prior.iter().map(|p| (*p).clone()).collect(),
  };

  if has_inference_plugin(tree) && LEGACY_CONFIG_FILENAMES.iter().any(|f| tree.exists(f)) {
    return plan;
  }

  if find_lint_target(root_project).is_some() {
    return plan;
  }

  MigrationPlan::no_migration()
}

/// Options threaded into the batch rewrite
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateOptions {
  pub set_parser_options_project: bool,
  pub keep_existing_versions: bool,
}

/// Apply a migration plan: promote the root config to the shared base file,
/// then rewrite every planned project to extend it.
///
/// The batch has no partial-success mode. Any per-project failure surfaces as
/// `MigrationError::Aborted`; the caller discards the whole staged tree, so
/// no project is left half-migrated.
pub fn apply(tree: &mut Tree, plan: &MigrationPlan, format: Format, opts: MigrateOptions) -> GenResult<()> {
  if !plan.needed {
    return Ok(());
  }

  promote_root_config(tree, format)?;
  ensure_dev_dependencies(
    tree,
    crate::generator::init::BASE_DEV_DEPENDENCIES,
    opts.keep_existing_versions,
  )?;

  let mut progress = BatchProgress::new(plan.projects.len(), "Migrating lint configs");
  for project in &plan.projects {
    rewrite_project(tree, project, format, opts).map_err(|source| {
      GenError::Migration(MigrationError::Aborted {
        project: project.name.clone(),
        source: Box::new(source),
      })
    })?;
    progress.inc();
  }
  Ok(())
}

/// Move the existing root config under the shared base name, creating a
/// minimal base when the root never had a config file of its own.
///
/// Legacy files whose serialization the base cannot absorb directly (JS and
/// YAML variants) keep their content in a renamed sidecar the base extends,
/// so no rule is dropped and no stale file shadows the rewritten root config.
fn promote_root_config(tree: &mut Tree, format: Format) -> GenResult<()> {
  if locate_base_config(tree).is_some() {
    return Ok(());
  }
  match format {
    Format::FlatModule => {
      if tree.exists("eslint.config.js") {
        tree.rename("eslint.config.js", BASE_CONFIG_FLAT)?;
      } else {
        tree.write(BASE_CONFIG_FLAT, "module.exports = [];\n");
      }
      Ok(())
    }
    Format::StructuredList | Format::Absent => {
      let Some(found) = find_eslint_file(tree) else {
        return tree.write_json(
          BASE_CONFIG_JSON,
          &json!({
            "root": true,
            "ignorePatterns": ["**/*"],
          }),
        );
      };
      if found == ".eslintrc.json" {
        return tree.rename(found, BASE_CONFIG_JSON);
      }
      let sidecar = found.replacen(".eslintrc", ".eslintrc.base", 1);
      tree.rename(found, &sidecar)?;
      tree.write_json(
        BASE_CONFIG_JSON,
        &json!({
          "extends": [format!("./{}", sidecar)],
          "root": true,
          "ignorePatterns": ["**/*"],
        }),
      )
    }
  }
}

/// Rewrite one project onto the shared-base layout.
///
/// A project that already carries its own structured config keeps it; only
/// its `extends` chain is pointed at the base. Projects without a config get
/// a freshly generated one. Existing flat configs are left untouched, they
/// cannot be patched without evaluating them.
fn rewrite_project(tree: &mut Tree, project: &ProjectDescriptor, format: Format, opts: MigrateOptions) -> GenResult<()> {
  if format == Format::FlatModule {
    if tree.exists(&join_root(&project.root, "eslint.config.js")) {
      return Ok(());
    }
  } else {
    let config_path = join_root(&project.root, ".eslintrc.json");
    if tree.exists(&config_path) {
      return extend_base(tree, &config_path, &project.root);
    }
  }
  let policy = evaluate(project, opts.set_parser_options_project);
  write_project_config(tree, project, &policy, format, true)
}

/// Prepend the shared base to an existing config's `extends` chain
fn extend_base(tree: &mut Tree, config_path: &str, project_root: &str) -> GenResult<()> {
  let offset = offset_from_root(project_root);
  let base = if offset.is_empty() {
    format!("./{}", BASE_CONFIG_JSON)
  } else {
    format!("{}{}", offset, BASE_CONFIG_JSON)
  };

  let mut config: serde_json::Value = tree.read_json(config_path)?;
  let Some(obj) = config.as_object_mut() else {
    return Err(GenError::message(format!("Expected a JSON object in {}", config_path)));
  };
  match obj.get("extends") {
    Some(serde_json::Value::Array(_)) => {}
    Some(single) => {
      let single = single.clone();
      obj.insert("extends".into(), json!([single]));
    }
    None => {
      obj.insert("extends".into(), json!([]));
    }
  }
  if let Some(entries) = obj.get_mut("extends").and_then(|v| v.as_array_mut())
    && !entries.iter().any(|e| e.as_str().is_some_and(|s| s.ends_with(BASE_CONFIG_JSON)))
  {
    entries.insert(0, json!(base));
  }
  tree.write_json(config_path, &config)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::workspace::{ProjectKind, TargetSpec};
  use crate::eslint::LINT_EXECUTOR;

  fn root_with_lint() -> ProjectDescriptor {
    let mut project = ProjectDescriptor::new("app", ".", ProjectKind::Application);
    project.targets.insert("lint".into(), TargetSpec::executor(LINT_EXECUTOR));
    project
  }

  fn lib(name: &str) -> ProjectDescriptor {
    ProjectDescriptor::new(name, format!("libs/{}", name), ProjectKind::Library)
  }

  #[test]
  fn test_existing_base_config_gates_migration() {
    let mut tree = Tree::in_memory();
    tree.write(BASE_CONFIG_JSON, "{}");

    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());
    state.insert(lib("lib-a"));
    state.insert(lib("lib-b"));

    assert!(!decide(&state, &tree, "lib-c").needed);
  }

  #[test]
  fn test_single_prior_project_skips_migration() {
    // the registry holds only the root app; "lib-a" is the project being
    // generated, so prior-known projects == 1
    let tree = Tree::in_memory();
    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());

    assert!(!decide(&state, &tree, "lib-a").needed);
  }

  #[test]
  fn test_target_excluded_from_prior_count() {
    let tree = Tree::in_memory();
    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());
    state.insert(lib("lib-a"));

    // lib-a is the generation target, so only the root app counts
    assert!(!decide(&state, &tree, "lib-a").needed);
  }

  #[test]
  fn test_root_lint_target_triggers_migration() {
    let tree = Tree::in_memory();
    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());
    state.insert(lib("lib-a"));

    let plan = decide(&state, &tree, "lib-b");
    assert!(plan.needed);
    let names: Vec<&str> = plan.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["app", "lib-a"]);
  }

  #[test]
  fn test_missing_root_project_skips_migration() {
    let tree = Tree::in_memory();
    let mut state = WorkspaceState::new();
    state.insert(lib("lib-a"));
    state.insert(lib("lib-b"));

    assert!(!decide(&state, &tree, "lib-c").needed);
  }

  #[test]
  fn test_inferred_targets_with_legacy_config_triggers_migration() {
    let mut tree = Tree::in_memory();
    tree.write("nx.json", r#"{"plugins":["@nx/eslint/plugin"]}"#);
    tree.write(".eslintrc.json", "{}");

    // root project has targets but no explicit lint entry
    let mut root = ProjectDescriptor::new("app", ".", ProjectKind::Application);
    root.targets.insert("build".into(), TargetSpec::executor("@nx/webpack:webpack"));

    let mut state = WorkspaceState::new();
    state.insert(root);
    state.insert(lib("lib-a"));

    assert!(decide(&state, &tree, "lib-b").needed);
  }

  #[test]
  fn test_apply_promotes_root_config_and_rewrites_projects() {
    let mut tree = Tree::in_memory();
    tree.write(".eslintrc.json", r#"{"root":true,"ignorePatterns":["**/*"]}"#);

    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());
    state.insert(lib("lib-a"));

    let plan = decide(&state, &tree, "lib-b");
    assert!(plan.needed);
    apply(&mut tree, &plan, Format::StructuredList, MigrateOptions::default()).unwrap();

    // root config promoted to the shared base
    assert!(!tree.exists(".eslintrc.json") || tree.exists(BASE_CONFIG_JSON));
    let base: serde_json::Value = tree.read_json(BASE_CONFIG_JSON).unwrap();
    assert_eq!(base["root"], true);

    // every planned project now extends the base
    let lib_config: serde_json::Value = tree.read_json("libs/lib-a/.eslintrc.json").unwrap();
    assert_eq!(lib_config["extends"][0], "../../.eslintrc.base.json");
  }

  #[test]
  fn test_legacy_root_config_promoted_into_base() {
    let mut tree = Tree::in_memory();
    tree.write(".eslintrc.js", "module.exports = { rules: { 'no-console': 'error' } };\n");

    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());
    state.insert(lib("lib-a"));

    let plan = decide(&state, &tree, "lib-b");
    assert!(plan.needed);
    apply(&mut tree, &plan, Format::StructuredList, MigrateOptions::default()).unwrap();

    // the legacy file no longer shadows the rewritten root config
    assert!(!tree.exists(".eslintrc.js"));

    // its rules survive in the sidecar the base extends
    let sidecar = tree.read_string(".eslintrc.base.js").unwrap();
    assert!(sidecar.contains("no-console"));
    let base: serde_json::Value = tree.read_json(BASE_CONFIG_JSON).unwrap();
    assert_eq!(base["extends"][0], "./.eslintrc.base.js");
    assert_eq!(base["ignorePatterns"][0], "**/*");
  }

  #[test]
  fn test_existing_project_config_keeps_rules_and_extends_base() {
    let mut tree = Tree::in_memory();
    tree.write(".eslintrc.json", r#"{"root":true,"ignorePatterns":["**/*"]}"#);
    tree.write(
      "libs/lib-a/.eslintrc.json",
      r#"{"rules":{"no-console":"error"},"extends":["plugin:import/recommended"]}"#,
    );

    let mut state = WorkspaceState::new();
    state.insert(root_with_lint());
    state.insert(lib("lib-a"));

    let plan = decide(&state, &tree, "lib-b");
    apply(&mut tree, &plan, Format::StructuredList, MigrateOptions::default()).unwrap();

    let config: serde_json::Value = tree.read_json("libs/lib-a/.eslintrc.json").unwrap();
    assert_eq!(config["extends"][0], "../../.eslintrc.base.json");
    assert_eq!(config["extends"][1], "plugin:import/recommended");
    assert_eq!(config["rules"]["no-console"], "error");
  }

  #[test]
  fn test_malformed_project_config_aborts_batch() {
    let mut tree = Tree::in_memory();
    tree.write(".eslintrc.json", r#"{"root":true}"#);
    tree.write("libs/lib-a/.eslintrc.json", "{ not json");

    let plan = MigrationPlan {
      needed: true,
      projects: vec![lib("lib-a")],
    };
    let err = apply(&mut tree, &plan, Format::StructuredList, MigrateOptions::default()).unwrap_err();

    assert!(matches!(
      &err,
      GenError::Migration(MigrationError::Aborted { .. })
    ));
    assert!(err.to_string().contains("lib-a"));
    // no partial batch survives: the staged tree is discarded by the caller,
    // and the failing project's config was never rewritten
    assert!(tree.read_json::<serde_json::Value>("libs/lib-a/.eslintrc.json").is_err());
  }

  #[test]
  fn test_apply_without_root_config_creates_base() {
    let mut tree = Tree::in_memory();
    let plan = MigrationPlan {
      needed: true,
      projects: vec![lib("lib-a")],
    };
    apply(&mut tree, &plan, Format::StructuredList, MigrateOptions::default()).unwrap();

    assert!(tree.exists(BASE_CONFIG_JSON));
  }
}
