//! Manifest file schema.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::error::{HgtError, Result};
use crate::provision::{ArchiveKind, DependencySpec};

/// Default directory binaries are installed into.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

/// A list of dependencies plus shared defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Directory for dependencies that don't set `install_path`.
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,

    /// Per-download timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Dependencies in provisioning order.
    pub dependencies: Vec<DependencyEntry>,
}

/// One dependency as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub archive: ArchiveKind,
    /// Path of the executable inside the archive.
    pub member: PathBuf,
    /// Overrides `install_dir/<file name of member>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default = "default_version_args")]
    pub version_args: Vec<String>,
}

fn default_install_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INSTALL_DIR)
}

fn default_version_args() -> Vec<String> {
    vec!["--version".to_string()]
}

impl Manifest {
    /// Turn entries into validated specs.
    ///
    /// `install_dir` replaces the manifest's own `install_dir`; entries with
    /// an explicit `install_path` keep it.
    pub fn resolve(&self, install_dir: Option<&Path>) -> Result<Vec<DependencySpec>> {
        let install_dir = install_dir.unwrap_or(&self.install_dir);
        let mut problems = Vec::new();

        if self.dependencies.is_empty() {
            problems.push("no dependencies listed".to_string());
        }
        if self.timeout_secs == Some(0) {
            problems.push("timeout_secs must be at least 1".to_string());
        }
        if !install_dir.is_absolute() {
            problems.push(format!(
                "install_dir '{}' must be absolute",
                install_dir.display()
            ));
        }

        let mut names = HashSet::new();
        let mut destinations = HashSet::new();
        let mut specs = Vec::with_capacity(self.dependencies.len());

        for entry in &self.dependencies {
            let spec = entry.to_spec(install_dir);
            problems.extend(entry.problems(&spec));

            if !names.insert(entry.name.clone()) {
                problems.push(format!("duplicate dependency name '{}'", entry.name));
            }
            if !destinations.insert(spec.install_path.clone()) {
                problems.push(format!(
                    "'{}' installs to {} which another dependency also uses",
                    entry.name,
                    spec.install_path.display()
                ));
            }
            specs.push(spec);
        }

        if problems.is_empty() {
            Ok(specs)
        } else {
            Err(HgtError::ConfigValidationError {
                message: problems.join("; "),
            })
        }
    }
}

impl DependencyEntry {
    fn to_spec(&self, install_dir: &Path) -> DependencySpec {
        let install_path = self.install_path.clone().unwrap_or_else(|| {
            let file_name = self
                .member
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&self.name));
            install_dir.join(file_name)
        });

        DependencySpec {
            name: self.name.clone(),
            archive_url: self.url.clone(),
            archive_kind: self.archive,
            member_path: self.member.clone(),
            install_path,
            sha256: self.sha256.as_ref().map(|s| s.to_lowercase()),
            version_args: self.version_args.clone(),
        }
    }

    fn problems(&self, spec: &DependencySpec) -> Vec<String> {
        let mut problems = Vec::new();
        let name = &self.name;

        if name.trim().is_empty() {
            problems.push("dependency with empty name".to_string());
        }
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            problems.push(format!("'{}': url must be http or https, got '{}'", name, self.url));
        }
        if self.member.as_os_str().is_empty()
            || !self
                .member
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            problems.push(format!(
                "'{}': member '{}' must be a relative path inside the archive",
                name,
                self.member.display()
            ));
        }
        if !spec.install_path.is_absolute() {
            problems.push(format!(
                "'{}': install_path '{}' must be absolute",
                name,
                spec.install_path.display()
            ));
        }
        if let Some(digest) = &self.sha256 {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                problems.push(format!("'{}': sha256 must be 64 hex characters", name));
            }
        }

        problems
    }
}
