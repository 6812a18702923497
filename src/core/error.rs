//! Error types for lintgen with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Errors propagate uncaught to the command
//! boundary; the staged tree is never committed after a failed run.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for lintgen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (unknown project, bad settings, invalid args)
  User = 1,
  /// System error (I/O, malformed workspace files)
  System = 2,
  /// Aborted migration batch (no file was committed)
  Migration = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for lintgen
#[derive(Debug)]
pub enum GenError {
  /// Workspace registry errors
  Workspace(WorkspaceError),

  /// Monorepo migration errors
  Migration(MigrationError),

  /// Config AST construction contract violations
  Construction(ConstructionError),

  /// Config file format errors
  Format(FormatError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl GenError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    GenError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      GenError::Message { message, context, help } => GenError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => GenError::Message {
        message: other.to_string(),
        context: Some(ctx_str),
        help: other.help_message(),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      GenError::Workspace(_) => ExitCode::User,
      GenError::Migration(_) => ExitCode::Migration,
      GenError::Construction(_) => ExitCode::System,
      GenError::Format(_) => ExitCode::User,
      GenError::Io(_) => ExitCode::System,
      GenError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      GenError::Workspace(e) => e.help_message(),
      GenError::Migration(e) => e.help_message(),
      GenError::Format(e) => e.help_message(),
      GenError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for GenError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GenError::Workspace(e) => write!(f, "{}", e),
      GenError::Migration(e) => write!(f, "{}", e),
      GenError::Construction(e) => write!(f, "{}", e),
      GenError::Format(e) => write!(f, "{}", e),
      GenError::Io(e) => write!(f, "I/O error: {}", e),
      GenError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for GenError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      GenError::Io(e) => Some(e),
      GenError::Migration(MigrationError::Aborted { source, .. }) => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for GenError {
  fn from(err: io::Error) -> Self {
    GenError::Io(err)
  }
}

impl From<String> for GenError {
  fn from(msg: String) -> Self {
    GenError::message(msg)
  }
}

impl From<&str> for GenError {
  fn from(msg: &str) -> Self {
    GenError::message(msg)
  }
}

impl From<serde_json::Error> for GenError {
  fn from(err: serde_json::Error) -> Self {
    GenError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::TomlError> for GenError {
  fn from(err: toml_edit::TomlError) -> Self {
    GenError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for GenError {
  fn from(err: toml_edit::de::Error) -> Self {
    GenError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for GenError {
  fn from(err: toml_edit::ser::Error) -> Self {
    GenError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<semver::Error> for GenError {
  fn from(err: semver::Error) -> Self {
    GenError::message(format!("Version parse error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for GenError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    GenError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Convert anyhow::Error to GenError (for transition period)
impl From<anyhow::Error> for GenError {
  fn from(err: anyhow::Error) -> Self {
    GenError::message(err.to_string())
  }
}

/// Workspace registry errors
#[derive(Debug)]
pub enum WorkspaceError {
  /// Project not found in the workspace state
  ProjectNotFound { name: String },

  /// Duplicate project root across descriptors
  DuplicateRoot { root: String, projects: Vec<String> },

  /// More than one project claims the workspace root
  MultipleRootProjects { projects: Vec<String> },

  /// project.json could not be parsed
  InvalidDescriptor { path: PathBuf, reason: String },
}

impl WorkspaceError {
  fn help_message(&self) -> Option<String> {
    match self {
      WorkspaceError::ProjectNotFound { name } => Some(format!(
        "Known projects can be listed with `lintgen status`. Is '{}' spelled correctly?",
        name
      )),
      WorkspaceError::InvalidDescriptor { path, .. } => {
        Some(format!("Fix the JSON in {} and re-run.", path.display()))
      }
      _ => None,
    }
  }
}

impl fmt::Display for WorkspaceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WorkspaceError::ProjectNotFound { name } => {
        write!(f, "Project '{}' not found in the workspace", name)
      }
      WorkspaceError::DuplicateRoot { root, projects } => {
        write!(f, "Projects {} share the same root '{}'", projects.join(", "), root)
      }
      WorkspaceError::MultipleRootProjects { projects } => {
        write!(
          f,
          "Multiple projects claim the workspace root '.': {}",
          projects.join(", ")
        )
      }
      WorkspaceError::InvalidDescriptor { path, reason } => {
        write!(f, "Invalid project descriptor {}: {}", path.display(), reason)
      }
    }
  }
}

/// Monorepo migration errors
#[derive(Debug)]
pub enum MigrationError {
  /// A per-project rewrite failed; the whole batch is discarded
  Aborted {
    project: String,
    source: Box<GenError>,
  },
}

impl MigrationError {
  fn help_message(&self) -> Option<String> {
    match self {
      MigrationError::Aborted { .. } => {
        Some("No file was written. Fix the reported project and re-run the generator.".to_string())
      }
    }
  }
}

impl fmt::Display for MigrationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MigrationError::Aborted { project, source } => {
        write!(
          f,
          "Monorepo migration aborted while rewriting project '{}': {}",
          project, source
        )
      }
    }
  }
}

/// Config AST construction contract violations.
///
/// These indicate a sequencing bug inside the generator, not a user-facing
/// condition. They are asserted loudly instead of being silently tolerated.
#[derive(Debug)]
pub enum ConstructionError {
  /// A spread references an import binding that was never declared
  DanglingSpread { local_name: String },

  /// An import binding local name was declared twice
  DuplicateBinding { local_name: String },
}

impl fmt::Display for ConstructionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConstructionError::DanglingSpread { local_name } => {
        write!(
          f,
          "Config AST spreads '{}' but no import binding declares it (internal sequencing bug)",
          local_name
        )
      }
      ConstructionError::DuplicateBinding { local_name } => {
        write!(f, "Config AST declares import binding '{}' twice", local_name)
      }
    }
  }
}

/// Config file format errors
#[derive(Debug)]
pub enum FormatError {
  /// Workspace signals a lint config format this tool does not recognize
  Unsupported { found: String },
}

impl FormatError {
  fn help_message(&self) -> Option<String> {
    match self {
      FormatError::Unsupported { .. } => Some(
        "Supported formats are .eslintrc.json (structured) and eslint.config.js (flat).".to_string(),
      ),
    }
  }
}

impl fmt::Display for FormatError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FormatError::Unsupported { found } => {
        write!(f, "Unsupported lint config format: {}", found)
      }
    }
  }
}

/// Result type alias for lintgen
pub type GenResult<T> = Result<T, GenError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> GenResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> GenResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<GenError>,
{
  fn context(self, ctx: impl Into<String>) -> GenResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> GenResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with colors and help text
pub fn print_error(error: &GenError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
