//! Dependency manifests.
//!
//! A manifest lists the binaries to provision. The built-in one covers
//! DIAMOND and MMseqs2; `--manifest` swaps in a user-provided file.

pub mod loader;
pub mod schema;

pub use loader::{builtin_manifest, load_manifest, load_manifest_file};
pub use schema::{DependencyEntry, Manifest, DEFAULT_INSTALL_DIR};
