//! Environment checks.
//!
//! # Modules
//!
//! - [`probe`] - PATH lookup, executable bits and version parsing
//! - [`status`] - Check result types
//! - [`checker`] - The [`EnvironmentChecker`]

pub mod checker;
pub mod probe;
pub mod status;

pub use checker::{default_context, CheckContext, EnvironmentChecker, PYTHON_MODULES};
pub use probe::{extract_version, is_executable, resolve_tool_path};
pub use status::{CheckCategory, CheckItem, CheckReport, CheckStatus};
