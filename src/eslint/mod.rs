//! ESLint-specific knowledge: file names, override policy, config documents
//!
//! - **files**: Config file location, format detection, inference plugin probe
//! - **policy**: File-pattern scoped override evaluation
//! - **ast**: Config document construction and deterministic serialization

pub mod ast;
pub mod files;
pub mod policy;

/// Executor wired onto explicit lint targets
pub const LINT_EXECUTOR: &str = "@nx/eslint:lint";

/// Dependency-consistency rule enabled for buildable library manifests
pub const DEPENDENCY_CHECKS_RULE: &str = "@nx/dependency-checks";

/// Parser for JSON-with-comments override entries
pub const JSONC_PARSER: &str = "jsonc-eslint-parser";
