//! Per-dependency outcomes and the aggregate report.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which step of provisioning failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Download,
    Extraction,
    Install,
}

/// A failure isolated to a single dependency.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisionError {
    /// Network failure, non-2xx response, empty payload or checksum mismatch.
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Malformed archive or missing member.
    #[error("Extraction of {archive} failed: {message}")]
    Extraction { archive: String, message: String },

    /// Destination not writable, disk full, etc.
    #[error("Install to {} failed: {message}", path.display())]
    Install { path: PathBuf, message: String },
}

impl ProvisionError {
    pub fn download(url: &str, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn extraction(archive: &str, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.to_string(),
            message: message.into(),
        }
    }

    pub fn install(path: &Path, message: impl Into<String>) -> Self {
        Self::Install {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProvisionError::Download { .. } => ErrorKind::Download,
            ProvisionError::Extraction { .. } => ErrorKind::Extraction,
            ProvisionError::Install { .. } => ErrorKind::Install,
        }
    }
}

/// What happened to one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// An executable was already at the install path; nothing was touched.
    AlreadySatisfied,
    /// The binary was downloaded and installed.
    Installed {
        /// Size of the downloaded archive.
        bytes_downloaded: u64,
    },
    /// Dry run: the binary would have been installed.
    WouldInstall,
    /// Provisioning failed; nothing was written to the install path.
    Failed(ProvisionError),
}

impl ProvisionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProvisionOutcome::Failed(_))
    }

    /// Short label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ProvisionOutcome::AlreadySatisfied => "already satisfied",
            ProvisionOutcome::Installed { .. } => "installed",
            ProvisionOutcome::WouldInstall => "would install",
            ProvisionOutcome::Failed(_) => "failed",
        }
    }
}

/// Outcome for a named dependency.
#[derive(Debug, Clone)]
pub struct SpecResult {
    pub name: String,
    pub install_path: PathBuf,
    pub outcome: ProvisionOutcome,
}

/// Results of one `provision` call, in input order.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub results: Vec<SpecResult>,
}

impl ProvisionReport {
    /// True when no dependency failed.
    pub fn is_success(&self) -> bool {
        !self.results.iter().any(|r| r.outcome.is_failure())
    }

    /// Failed dependencies with their errors.
    pub fn failures(&self) -> Vec<(&str, &ProvisionError)> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                ProvisionOutcome::Failed(err) => Some((r.name.as_str(), err)),
                _ => None,
            })
            .collect()
    }

    /// Total bytes fetched across all dependencies.
    pub fn bytes_downloaded(&self) -> u64 {
        self.results
            .iter()
            .map(|r| match r.outcome {
                ProvisionOutcome::Installed { bytes_downloaded } => bytes_downloaded,
                _ => 0,
            })
            .sum()
    }

    /// Process exit code: 0 when everything resolved, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Convert into an error naming every failed dependency.
    pub fn into_result(self) -> crate::error::Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            let failed = self
                .failures()
                .into_iter()
                .map(|(name, _)| name.to_string())
                .collect();
            Err(crate::error::HgtError::ProvisionFailed { failed })
        }
    }
}
