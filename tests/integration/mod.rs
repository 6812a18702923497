//! Integration test suite for lintgen

mod helpers;
mod test_generate;
mod test_migration;
mod test_status;
