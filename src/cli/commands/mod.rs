//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check_deps;
pub mod export_schema;
pub mod init;
pub mod process;
pub mod validate;
