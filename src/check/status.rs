//! Check result types.

use serde::Serialize;
use std::path::PathBuf;

/// What kind of prerequisite was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// An executable such as `diamond` or `mmseqs`.
    Binary,
    /// A Python module FlexiHGT imports.
    PythonModule,
    /// The ete3 NCBI taxonomy database.
    Database,
}

/// The result of checking a single prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Present and working.
    Found {
        path: Option<PathBuf>,
        version: Option<String>,
    },

    /// Installed at its install path, but that directory is not on PATH.
    NotOnPath { path: PathBuf },

    /// Present on PATH but failed to report its version.
    Broken { path: PathBuf, message: String },

    /// Not installed.
    Missing { hint: String },
}

impl CheckStatus {
    /// Whether the prerequisite is usable as-is.
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Found { .. })
    }
}

/// One checked prerequisite.
#[derive(Debug, Clone, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub category: CheckCategory,
    #[serde(flatten)]
    pub status: CheckStatus,
}

/// All prerequisites checked in one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub items: Vec<CheckItem>,
}

impl CheckReport {
    /// True when every prerequisite was found.
    pub fn all_ok(&self) -> bool {
        self.items.iter().all(|item| item.status.is_ok())
    }

    /// Items that are not usable.
    pub fn problems(&self) -> impl Iterator<Item = &CheckItem> {
        self.items.iter().filter(|item| !item.status.is_ok())
    }
}
