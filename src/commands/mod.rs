//! CLI commands for lintgen
//!
//! - **generate**: Generate (and, when needed, migrate) lint configuration
//!   for one project
//! - **status**: Show the workspace lint layout

pub mod generate;
pub mod status;

pub use generate::run_generate;
pub use status::run_status;
