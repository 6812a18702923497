//! Lint config generation pipeline
//!
//! - **init**: Shared tooling dependencies, plugin registration, root config
//! - **migration**: Monorepo migration planning and batch application
//! - **run**: Orchestration of a full generation run

pub mod init;
pub mod migration;
pub mod run;

pub use run::{FollowupTask, GenerateOptions, generate};
