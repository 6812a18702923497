//! Core building blocks for lintgen
//!
//! - **error**: Error taxonomy with contextual help messages and exit codes
//! - **settings**: Tool settings (lintgen.toml) supplying generator defaults
//! - **tree**: Staged workspace overlay; nothing hits disk until commit
//! - **workspace**: Read-only project registry loaded from project.json files

pub mod error;
pub mod settings;
pub mod tree;
pub mod workspace;
