//! Generate command implementation

use crate::core::error::GenResult;
use crate::core::settings::Settings;
use crate::core::tree::{ChangeKind, Tree};
use crate::generator::{FollowupTask, GenerateOptions, generate};
use std::path::Path;

/// Run the generate command: stage a full generation run and commit it
/// only when every step succeeded.
pub fn run_generate(workspace_root: &Path, opts: GenerateOptions, dry_run: bool) -> GenResult<()> {
  let settings = Settings::load(workspace_root)?;
  let mut tree = Tree::open(workspace_root);

  let tasks = generate(&mut tree, &settings, &opts)?;

  let changes = tree.changes();
  if changes.is_empty() {
    println!("✅ Nothing to generate for '{}'", opts.project);
    return Ok(());
  }

  if dry_run {
    println!("Plan for '{}' (dry-run, nothing written):", opts.project);
  } else {
    println!("Generated lint configuration for '{}':", opts.project);
  }
  for (path, kind) in &changes {
    match kind {
      ChangeKind::Write => println!("   + {}", path),
      ChangeKind::Delete => println!("   - {}", path),
    }
  }

  if dry_run {
    println!("\nRe-run with --apply to write these files.");
    return Ok(());
  }

  tree.commit()?;

  if !tasks.is_empty() {
    println!("\nFollow-up steps:");
    for task in tasks {
      match task {
        FollowupTask::FormatFiles => println!("   • format the generated files"),
        FollowupTask::InstallDependencies => println!("   • install updated dev dependencies"),
      }
    }
  }
  Ok(())
}
