//! Workspace project registry - read-only snapshot of project descriptors
//!
//! The registry is loaded once at generator start by scanning the tree for
//! `project.json` descriptors. Writes made later in the same run live only in
//! the staged overlay; the snapshot does not observe them. The single
//! write-back path is [`WorkspaceState::update_project_configuration`].

use crate::core::error::{GenError, GenResult, WorkspaceError};
use crate::core::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the lint target on a project
pub const LINT_TARGET: &str = "lint";

/// Name of the build target marking a library as buildable
pub const BUILD_TARGET: &str = "build";

/// Project kind as declared in `project.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
  Application,
  Library,
  #[default]
  #[serde(other)]
  Other,
}

/// A single target on a project: a distinguished executor-or-command field
/// plus an opaque bag of remaining keys which is preserved on write-back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TargetSpec {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub executor: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub command: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub options: Option<serde_json::Map<String, serde_json::Value>>,

  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TargetSpec {
  /// Target backed by an executor
  pub fn executor(executor: impl Into<String>) -> Self {
    Self {
      executor: Some(executor.into()),
      ..Self::default()
    }
  }

  /// Target backed by a raw command
  pub fn command(command: impl Into<String>) -> Self {
    Self {
      command: Some(command.into()),
      ..Self::default()
    }
  }
}

/// A project descriptor as loaded from `<root>/project.json`.
///
/// `root` is derived from the descriptor location, not stored in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
  #[serde(default)]
  pub name: String,

  #[serde(skip)]
  pub root: String,

  #[serde(rename = "projectType", default, skip_serializing_if = "is_other_kind")]
  pub kind: ProjectKind,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub targets: BTreeMap<String, TargetSpec>,

  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

fn is_other_kind(kind: &ProjectKind) -> bool {
  *kind == ProjectKind::Other
}

impl ProjectDescriptor {
  /// Minimal descriptor, used by tests and by workspace scanning
  pub fn new(name: impl Into<String>, root: impl Into<String>, kind: ProjectKind) -> Self {
    Self {
      name: name.into(),
      root: root.into(),
      kind,
      targets: BTreeMap::new(),
      extra: serde_json::Map::new(),
    }
  }

  /// Whether the descriptor declares a lint target
  pub fn has_lint_target(&self) -> bool {
    self.targets.contains_key(LINT_TARGET)
  }

  /// Whether this is the workspace-root project
  pub fn is_root_project(&self) -> bool {
    self.root == "."
  }

  /// Buildable library: kind Library and a build target is present
  pub fn is_buildable_library(&self) -> bool {
    self.kind == ProjectKind::Library && self.targets.contains_key(BUILD_TARGET)
  }

  /// Path to this project's descriptor file
  pub fn descriptor_path(&self) -> String {
    join_root(&self.root, "project.json")
  }
}

/// Join a project root and a file name into a tree path
pub fn join_root(root: &str, file: &str) -> String {
  if root == "." || root.is_empty() {
    file.to_string()
  } else {
    format!("{}/{}", root.trim_end_matches('/'), file)
  }
}

/// Snapshot of all known projects at generation start
#[derive(Debug, Clone, Default)]
pub struct WorkspaceState {
  projects: BTreeMap<String, ProjectDescriptor>,
}

impl WorkspaceState {
  /// Empty state, for tests
  pub fn new() -> Self {
    Self::default()
  }

  /// Scan the tree for `project.json` descriptors and build the snapshot.
  ///
  /// Fails on malformed descriptors and on invariant violations (duplicate
  /// roots, more than one project at the workspace root).
  pub fn load(tree: &Tree) -> GenResult<Self> {
    let mut state = Self::new();
    for path in tree.walk() {
      if path != "project.json" && !path.ends_with("/project.json") {
        continue;
      }
      let root = match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => ".".to_string(),
      };
      let text = tree.read_string(&path)?;
      let mut descriptor: ProjectDescriptor =
        serde_json::from_str(&text).map_err(|e| {
          GenError::Workspace(WorkspaceError::InvalidDescriptor {
            path: path.clone().into(),
            reason: e.to_string(),
          })
        })?;
      descriptor.root = root.clone();
      if descriptor.name.is_empty() {
        // fall back to the directory name
        descriptor.name = root.rsplit('/').next().unwrap_or(&root).to_string();
      }
      state.insert(descriptor);
    }
    state.validate()?;
    Ok(state)
  }

  /// Add or replace a descriptor in the snapshot
  pub fn insert(&mut self, descriptor: ProjectDescriptor) {
    self.projects.insert(descriptor.name.clone(), descriptor);
  }

  /// Look up a project; unknown names are fatal
  pub fn get(&self, name: &str) -> GenResult<&ProjectDescriptor> {
    self
      .projects
      .get(name)
      .ok_or_else(|| GenError::Workspace(WorkspaceError::ProjectNotFound { name: name.to_string() }))
  }

  /// All descriptors in name order
  pub fn projects(&self) -> impl Iterator<Item = &ProjectDescriptor> {
    self.projects.values()
  }

  /// Number of known projects
  pub fn len(&self) -> usize {
    self.projects.len()
  }

  /// Whether the snapshot is empty
  pub fn is_empty(&self) -> bool {
    self.projects.is_empty()
  }

  /// Enforce the registry invariants
  fn validate(&self) -> GenResult<()> {
    let mut by_root: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for project in self.projects.values() {
      by_root.entry(project.root.as_str()).or_default().push(&project.name);
    }
    for (root, names) in by_root {
      if names.len() > 1 {
        let projects = names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        if root == "." {
          return Err(GenError::Workspace(WorkspaceError::MultipleRootProjects { projects }));
        }
        return Err(GenError::Workspace(WorkspaceError::DuplicateRoot {
          root: root.to_string(),
          projects,
        }));
      }
    }
    Ok(())
  }

  /// Single write-back path for a project's declared configuration
  pub fn update_project_configuration(tree: &mut Tree, descriptor: &ProjectDescriptor) -> GenResult<()> {
    tree.write_json(&descriptor.descriptor_path(), descriptor)
  }
}
