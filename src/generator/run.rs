//! Generator orchestration
//!
//! Sequences a full generation run against the staged tree: tooling init,
//! root config setup, override policy, migration, the target's own config,
//! and the single project-configuration write-back. The run stages everything
//! in the overlay; the caller commits only after the whole run succeeds.

use crate::core::error::GenResult;
use crate::core::settings::Settings;
use crate::core::tree::Tree;
use crate::core::workspace::{LINT_TARGET, TargetSpec, WorkspaceState};
use crate::eslint::LINT_EXECUTOR;
use crate::eslint::ast::write_project_config;
use crate::eslint::files::{Format, detect_format, has_inference_plugin};
use crate::eslint::policy::{PROJECT_ROOT_TOKEN, ROOT_DEFAULT_PATTERN, evaluate, resolve_patterns};
use crate::generator::init::{
  BASE_DEV_DEPENDENCIES, COMPAT_DEV_DEPENDENCIES, JSONC_DEV_DEPENDENCIES, ensure_dev_dependencies,
  ensure_inference_plugin, setup_root_config,
};
use crate::generator::migration::{self, MigrateOptions};
use serde_json::json;

/// Options for one generation run.
///
/// Every toggle is explicit; defaults come from [`Settings`] exactly once at
/// this boundary, never from ambient process state inside core components.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
  /// Target project name
  pub project: String,

  /// Caller-supplied lint file patterns
  pub patterns: Option<Vec<String>>,

  /// Populate type-aware parserOptions.project (off by default: forces full
  /// program construction on every lint run)
  pub set_parser_options_project: bool,

  /// The target is the workspace-root project
  pub root_project: bool,

  /// Skip the follow-up formatting task
  pub skip_format: bool,

  /// Do not touch package.json dev dependencies
  pub skip_package_json: bool,

  /// Preserve pre-existing dependency version pins
  pub keep_existing_versions: bool,

  /// Whether lint targets are inferred by the workspace plugin;
  /// `None` takes the settings default
  pub infer_targets: Option<bool>,
}

/// Post-generation side-effect tasks, returned for the caller to run in
/// sequence. Formatting and dependency installation are external
/// collaborators, not part of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowupTask {
  FormatFiles,
  InstallDependencies,
}

/// Run the generator for one target project.
///
/// Migration, when decided, is applied to all non-target projects before the
/// target's own config is written. Any error leaves the tree uncommitted.
pub fn generate(tree: &mut Tree, settings: &Settings, opts: &GenerateOptions) -> GenResult<Vec<FollowupTask>> {
  let infer_targets = opts.infer_targets.unwrap_or(settings.generator.infer_targets);
  let skip_package_json = opts.skip_package_json || settings.generator.skip_package_json;

  let state = WorkspaceState::load(tree)?;
  let mut project = state.get(&opts.project)?.clone();

  // format is detected once and cached for the whole run
  let format = match detect_format(tree) {
    Format::Absent => match settings.generator.default_format.as_str() {
      "flat" => Format::FlatModule,
      _ => Format::StructuredList,
    },
    detected => detected,
  };

  if !skip_package_json {
    ensure_dev_dependencies(tree, BASE_DEV_DEPENDENCIES, opts.keep_existing_versions)?;
  }
  if infer_targets {
    ensure_inference_plugin(tree)?;
  }
  setup_root_config(tree, format, opts.root_project)?;

  let patterns = resolve_patterns(&project, opts.patterns.clone(), opts.root_project);
  wire_lint_target(tree, &mut project, patterns.as_deref());

  let policy = evaluate(&project, opts.set_parser_options_project);
  if !skip_package_json {
    if policy.needs_compat() && format == Format::FlatModule {
      ensure_dev_dependencies(tree, COMPAT_DEV_DEPENDENCIES, opts.keep_existing_versions)?;
    }
    if project.is_buildable_library() {
      ensure_dev_dependencies(tree, JSONC_DEV_DEPENDENCIES, opts.keep_existing_versions)?;
    }
  }

  // a new non-root project may force the workspace into monorepo layout
  // before its own config can be added
  if !opts.root_project {
    let plan = migration::decide(&state, tree, &project.name);
    migration::apply(
      tree,
      &plan,
      format,
      MigrateOptions {
        set_parser_options_project: opts.set_parser_options_project,
        keep_existing_versions: opts.keep_existing_versions,
      },
    )?;
  }

  // the root config already is the root project's config; never override it
  if !opts.root_project || !project.is_root_project() {
    write_project_config(tree, &project, &policy, format, !opts.root_project)?;
  }

  if project.is_buildable_library() && !source_analysis_enabled(tree) {
    enable_source_analysis(tree)?;
  }

  WorkspaceState::update_project_configuration(tree, &project)?;

  let mut tasks = Vec::new();
  if !opts.skip_format {
    tasks.push(FollowupTask::FormatFiles);
  }
  if !skip_package_json {
    tasks.push(FollowupTask::InstallDependencies);
  }
  Ok(tasks)
}

/// Wire the lint target onto the descriptor.
///
/// With the inference plugin active, only non-standard patterns warrant an
/// explicit command target; standard ones stay inferred. Without the plugin
/// the target gets the lint executor, plus the patterns when the caller
/// supplied any.
fn wire_lint_target(tree: &Tree, project: &mut crate::core::workspace::ProjectDescriptor, patterns: Option<&[String]>) {
  if has_inference_plugin(tree) {
    let Some(patterns) = patterns else { return };
    let standard = [ROOT_DEFAULT_PATTERN, PROJECT_ROOT_TOKEN, project.root.as_str()];
    if !patterns.is_empty() && patterns.iter().any(|p| !standard.contains(&p.as_str())) {
      let joined = patterns.join(" ").replace(PROJECT_ROOT_TOKEN, &project.root);
      project
        .targets
        .insert(LINT_TARGET.into(), TargetSpec::command(format!("eslint {}", joined)));
    }
    return;
  }

  let mut target = TargetSpec::executor(LINT_EXECUTOR);
  if let Some(patterns) = patterns
    && !patterns.is_empty()
  {
    let mut options = serde_json::Map::new();
    options.insert("lintFilePatterns".into(), json!(patterns));
    target.options = Some(options);
  }
  project.targets.insert(LINT_TARGET.into(), target);
}

fn source_analysis_enabled(tree: &Tree) -> bool {
  let Ok(nx_json) = tree.read_json::<serde_json::Value>("nx.json") else {
    return true;
  };
  match nx_json
    .get("pluginsConfig")
    .and_then(|c| c.get("@nx/js"))
    .and_then(|c| c.get("analyzeSourceFiles"))
    .and_then(|v| v.as_bool())
  {
    Some(enabled) => enabled,
    None => nx_json.get("extends").and_then(|v| v.as_str()) != Some("nx/presets/npm.json"),
  }
}

fn enable_source_analysis(tree: &mut Tree) -> GenResult<()> {
  if !tree.exists("nx.json") {
    return Ok(());
  }
  tree.update_json("nx.json", |mut nx_json| {
    let Some(obj) = nx_json.as_object_mut() else {
      return nx_json;
    };
    let plugins_config = obj.entry("pluginsConfig").or_insert_with(|| json!({}));
    if !plugins_config.is_object() {
      *plugins_config = json!({});
    }
    if let Some(plugins_config) = plugins_config.as_object_mut() {
      let js_config = plugins_config.entry("@nx/js").or_insert_with(|| json!({}));
      if !js_config.is_object() {
        *js_config = json!({});
      }
      if let Some(js_config) = js_config.as_object_mut() {
        js_config.insert("analyzeSourceFiles".into(), json!(true));
      }
    }
    nx_json
  })
}
