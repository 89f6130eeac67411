//! Process execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{execute_program, CommandResult};
pub use platform::{is_ci, is_elevated, is_on_path, path_entries};
