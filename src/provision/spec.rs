//! Declarative description of one external binary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Format of a downloaded archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArchiveKind {
    /// Gzip-compressed tarball.
    #[default]
    #[serde(rename = "tar.gz", alias = "tgz")]
    TarGz,
    /// Uncompressed tarball.
    #[serde(rename = "tar")]
    Tar,
    /// The download is the executable itself.
    #[serde(rename = "raw")]
    Raw,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::TarGz => write!(f, "tar.gz"),
            ArchiveKind::Tar => write!(f, "tar"),
            ArchiveKind::Raw => write!(f, "raw"),
        }
    }
}

/// One external binary to provision.
///
/// Specs are built fresh from a manifest on every run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Human-readable identifier (e.g. "diamond").
    pub name: String,
    /// Location of the downloadable archive.
    pub archive_url: String,
    /// Format of the archive.
    pub archive_kind: ArchiveKind,
    /// Path of the executable inside the extracted archive.
    pub member_path: PathBuf,
    /// Absolute destination of the executable.
    pub install_path: PathBuf,
    /// Expected lowercase hex SHA-256 of the archive, if pinned.
    pub sha256: Option<String>,
    /// Arguments used to ask the binary for its version.
    pub version_args: Vec<String>,
}

impl DependencySpec {
    /// Create a tar.gz spec with no checksum and `--version` probing.
    pub fn new(
        name: impl Into<String>,
        archive_url: impl Into<String>,
        member_path: impl Into<PathBuf>,
        install_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            archive_url: archive_url.into(),
            archive_kind: ArchiveKind::TarGz,
            member_path: member_path.into(),
            install_path: install_path.into(),
            sha256: None,
            version_args: vec!["--version".to_string()],
        }
    }

    /// Set the archive kind.
    pub fn with_archive_kind(mut self, kind: ArchiveKind) -> Self {
        self.archive_kind = kind;
        self
    }

    /// Pin the archive to a SHA-256 digest.
    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.sha256 = Some(digest.into().to_lowercase());
        self
    }

    /// The command name the installed binary answers to.
    pub fn binary_name(&self) -> String {
        self.install_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}
