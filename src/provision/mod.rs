//! Dependency provisioning.
//!
//! Fetches archives, unpacks them and installs the executables they
//! contain, skipping anything already present.
//!
//! # Modules
//!
//! - [`spec`] - [`DependencySpec`] and [`ArchiveKind`]
//! - [`fetch`] - HTTP downloads with checksum verification
//! - [`extract`] - tar / tar.gz unpacking
//! - [`install`] - Atomic placement of executables
//! - [`outcome`] - Per-dependency outcomes and the aggregate report
//! - [`provisioner`] - The [`Provisioner`] tying it all together

pub mod extract;
pub mod fetch;
pub mod install;
pub mod outcome;
pub mod provisioner;
pub mod spec;

pub use fetch::{ArchiveFetcher, Download, DEFAULT_TIMEOUT};
pub use install::{install_executable, is_installed};
pub use outcome::{ErrorKind, ProvisionError, ProvisionOutcome, ProvisionReport, SpecResult};
pub use provisioner::{ProvisionOptions, Provisioner};
pub use spec::{ArchiveKind, DependencySpec};
