//! Staged workspace tree - all mutation goes through an in-memory overlay
//!
//! # Design
//!
//! Every generation run owns exactly one `Tree`. Reads fall through the staged
//! overlay to the backing directory; writes stay in the overlay until the
//! caller commits after a fully successful run. A failed run is discarded by
//! simply dropping the tree, which gives all-or-nothing semantics without any
//! rollback machinery.
//!
//! Paths are workspace-relative, forward-slash normalized strings.

use crate::core::error::{GenError, GenResult, ResultExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories never traversed when walking the backing store
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "tmp", ".nx"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Staged {
  Write(Vec<u8>),
  Delete,
}

/// Kind of staged change, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
  Write,
  Delete,
}

/// In-memory overlay over an optional backing directory.
///
/// With no backing directory the tree is purely virtual, which is what the
/// unit tests use.
pub struct Tree {
  root: Option<PathBuf>,
  staged: BTreeMap<String, Staged>,
}

impl Tree {
  /// Open a tree backed by a workspace directory on disk
  pub fn open(root: impl Into<PathBuf>) -> Self {
    Self {
      root: Some(root.into()),
      staged: BTreeMap::new(),
    }
  }

  /// Create a purely virtual tree (no backing directory)
  pub fn in_memory() -> Self {
    Self {
      root: None,
      staged: BTreeMap::new(),
    }
  }

  fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.strip_prefix("./").unwrap_or(&path);
    path.trim_matches('/').to_string()
  }

  fn disk_path(&self, rel: &str) -> Option<PathBuf> {
    self.root.as_ref().map(|r| r.join(rel))
  }

  /// Read raw bytes; `None` if the path does not exist
  pub fn read(&self, path: &str) -> Option<Vec<u8>> {
    let rel = Self::normalize(path);
    match self.staged.get(&rel) {
      Some(Staged::Write(bytes)) => Some(bytes.clone()),
      Some(Staged::Delete) => None,
      None => self.disk_path(&rel).and_then(|p| fs::read(p).ok()),
    }
  }

  /// Read a file as UTF-8 text
  pub fn read_string(&self, path: &str) -> GenResult<String> {
    let bytes = self
      .read(path)
      .ok_or_else(|| GenError::message(format!("File not found in tree: {}", path)))?;
    Ok(String::from_utf8(bytes)?)
  }

  /// Read and deserialize a JSON file
  pub fn read_json<T: DeserializeOwned>(&self, path: &str) -> GenResult<T> {
    let text = self.read_string(path)?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON from {}", path))
  }

  /// Stage a write
  pub fn write(&mut self, path: &str, contents: impl Into<Vec<u8>>) {
    self.staged.insert(Self::normalize(path), Staged::Write(contents.into()));
  }

  /// Serialize a value to pretty JSON and stage it with a trailing newline
  pub fn write_json<T: Serialize>(&mut self, path: &str, value: &T) -> GenResult<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    self.write(path, text.into_bytes());
    Ok(())
  }

  /// Read a JSON file, transform it, and stage the result.
  ///
  /// The file must exist; updating is not creating.
  pub fn update_json<F>(&mut self, path: &str, update: F) -> GenResult<()>
  where
    F: FnOnce(serde_json::Value) -> serde_json::Value,
  {
    let value: serde_json::Value = self.read_json(path)?;
    self.write_json(path, &update(value))
  }

  /// Stage a deletion
  pub fn delete(&mut self, path: &str) {
    self.staged.insert(Self::normalize(path), Staged::Delete);
  }

  /// Stage a rename (read + write new + delete old)
  pub fn rename(&mut self, from: &str, to: &str) -> GenResult<()> {
    let bytes = self
      .read(from)
      .ok_or_else(|| GenError::message(format!("Cannot rename missing file: {}", from)))?;
    self.write(to, bytes);
    self.delete(from);
    Ok(())
  }

  /// Check whether a path exists (staged state wins over disk)
  pub fn exists(&self, path: &str) -> bool {
    let rel = Self::normalize(path);
    match self.staged.get(&rel) {
      Some(Staged::Write(_)) => true,
      Some(Staged::Delete) => false,
      None => self.disk_path(&rel).map(|p| p.exists()).unwrap_or(false),
    }
  }

  /// List every file path visible through the overlay.
  ///
  /// Disk entries under `SKIPPED_DIRS` are not traversed. Output is sorted.
  pub fn walk(&self) -> Vec<String> {
    let mut files: BTreeMap<String, bool> = BTreeMap::new();
    if let Some(root) = &self.root {
      let mut stack = vec![root.clone()];
      while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
          let path = entry.path();
          let name = entry.file_name().to_string_lossy().to_string();
          if path.is_dir() {
            if !SKIPPED_DIRS.contains(&name.as_str()) {
              stack.push(path);
            }
          } else if let Ok(rel) = path.strip_prefix(root) {
            files.insert(rel.to_string_lossy().replace('\\', "/"), true);
          }
        }
      }
    }
    for (path, change) in &self.staged {
      match change {
        Staged::Write(_) => {
          files.insert(path.clone(), true);
        }
        Staged::Delete => {
          files.remove(path);
        }
      }
    }
    files.into_keys().collect()
  }

  /// Report staged changes in path order
  pub fn changes(&self) -> Vec<(String, ChangeKind)> {
    self
      .staged
      .iter()
      .map(|(path, change)| {
        let kind = match change {
          Staged::Write(_) => ChangeKind::Write,
          Staged::Delete => ChangeKind::Delete,
        };
        (path.clone(), kind)
      })
      .collect()
  }

  /// Whether any change is staged
  pub fn is_dirty(&self) -> bool {
    !self.staged.is_empty()
  }

  /// Materialize all staged changes to the backing directory.
  ///
  /// A virtual tree commits by clearing its staged set; the tests read the
  /// overlay directly instead.
  pub fn commit(&mut self) -> GenResult<()> {
    if let Some(root) = self.root.clone() {
      for (path, change) in &self.staged {
        let full = root.join(path);
        match change {
          Staged::Write(bytes) => {
            if let Some(parent) = full.parent() {
              fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&full, bytes).with_context(|| format!("Failed to write {}", full.display()))?;
          }
          Staged::Delete => {
            if full.exists() {
              fs::remove_file(&full).with_context(|| format!("Failed to delete {}", full.display()))?;
            }
          }
        }
      }
    }
    self.staged.clear();
    Ok(())
  }

  /// Backing directory, if any
  pub fn root(&self) -> Option<&Path> {
    self.root.as_deref()
  }
}
