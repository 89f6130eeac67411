//! hgtdeps - provision the external binaries FlexiHGT shells out to.
//!
//! hgtdeps downloads the DIAMOND and MMseqs2 release archives, extracts
//! their executables and installs them into a directory on PATH. Runs are
//! idempotent: a dependency whose executable is already present is left
//! alone and costs no network traffic.
//!
//! # Modules
//!
//! - [`check`] - Verifying binaries, Python modules and the taxonomy database
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - The dependency manifest and its validation
//! - [`provision`] - Download, extraction and installation of dependencies
//! - [`shell`] - Process execution and platform queries
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use hgtdeps::manifest::builtin_manifest;
//!
//! let manifest = builtin_manifest().unwrap();
//! let specs = manifest
//!     .resolve(Some(std::path::Path::new("/opt/hgt/bin")))
//!     .unwrap();
//! assert_eq!(specs[0].name, "diamond");
//! assert_eq!(specs[1].install_path, std::path::Path::new("/opt/hgt/bin/mmseqs"));
//! ```

pub mod check;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod provision;
pub mod shell;
pub mod ui;

pub use error::{HgtError, Result};
