//! Applying dependency specs to the local filesystem.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tempfile::TempDir;

use super::extract::extract_member;
use super::fetch::ArchiveFetcher;
use super::install::{install_executable, is_installed};
use super::outcome::{ProvisionError, ProvisionOutcome, ProvisionReport, SpecResult};
use super::spec::DependencySpec;
use crate::error::{HgtError, Result};

/// Knobs for a provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Reinstall even when an executable is already present.
    pub force: bool,
    /// Report what would happen without downloading or writing anything.
    pub dry_run: bool,
    /// Number of dependencies processed concurrently.
    pub jobs: usize,
    /// Parent of the per-dependency scratch directories.
    pub work_dir: PathBuf,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            jobs: 1,
            work_dir: std::env::temp_dir(),
        }
    }
}

/// Ensures each dependency's executable is present at its install path.
pub struct Provisioner {
    fetcher: ArchiveFetcher,
    options: ProvisionOptions,
}

impl Provisioner {
    /// Create a provisioner.
    pub fn new(fetcher: ArchiveFetcher, options: ProvisionOptions) -> Self {
        Self { fetcher, options }
    }

    /// Get the run options.
    pub fn options(&self) -> &ProvisionOptions {
        &self.options
    }

    /// Provision every spec, isolating failures.
    ///
    /// Returns `Err` only for an empty spec list. Per-dependency failures
    /// are recorded in the report, which preserves input order.
    pub fn provision(&self, specs: &[DependencySpec]) -> Result<ProvisionReport> {
        if specs.is_empty() {
            return Err(HgtError::EmptySpecList);
        }

        let jobs = self.options.jobs.clamp(1, specs.len());
        tracing::debug!(
            "Provisioning {} dependencies with {} job(s), {}s download timeout",
            specs.len(),
            jobs,
            self.fetcher.timeout().as_secs()
        );

        let results = if jobs == 1 {
            specs.iter().map(|spec| self.apply(spec)).collect()
        } else {
            self.apply_parallel(specs, jobs)
        };

        Ok(ProvisionReport { results })
    }

    /// Provision a single spec.
    pub fn apply(&self, spec: &DependencySpec) -> SpecResult {
        let outcome = self.outcome_for(spec);
        match &outcome {
            ProvisionOutcome::AlreadySatisfied => {
                tracing::debug!("{} already present at {}", spec.name, spec.install_path.display());
            }
            ProvisionOutcome::Installed { .. } => {
                tracing::debug!("Installed {} to {}", spec.name, spec.install_path.display());
            }
            ProvisionOutcome::WouldInstall => {
                tracing::debug!("Would install {} to {}", spec.name, spec.install_path.display());
            }
            ProvisionOutcome::Failed(err) => {
                tracing::debug!("Failed to provision {}: {}", spec.name, err);
            }
        }

        SpecResult {
            name: spec.name.clone(),
            install_path: spec.install_path.clone(),
            outcome,
        }
    }

    fn outcome_for(&self, spec: &DependencySpec) -> ProvisionOutcome {
        if !self.options.force && is_installed(&spec.install_path) {
            return ProvisionOutcome::AlreadySatisfied;
        }
        if self.options.dry_run {
            return ProvisionOutcome::WouldInstall;
        }

        match self.fetch_and_install(spec) {
            Ok(bytes_downloaded) => ProvisionOutcome::Installed { bytes_downloaded },
            Err(err) => ProvisionOutcome::Failed(err),
        }
    }

    /// Download, extract and install. Scratch space is dropped on every path.
    fn fetch_and_install(&self, spec: &DependencySpec) -> std::result::Result<u64, ProvisionError> {
        let scratch = self.scratch_dir(spec)?;

        let archive = scratch.path().join("archive");
        let download =
            self.fetcher
                .fetch_to(&spec.archive_url, &archive, spec.sha256.as_deref())?;
        tracing::debug!("{} archive sha256 {}", spec.name, download.sha256);

        let unpacked = scratch.path().join("unpacked");
        std::fs::create_dir(&unpacked).map_err(|e| {
            ProvisionError::extraction(&spec.archive_url, format!("cannot create work dir: {}", e))
        })?;
        let executable =
            extract_member(&archive, spec.archive_kind, &spec.member_path, &unpacked)?;

        install_executable(&executable, &spec.install_path)?;

        Ok(download.bytes)
    }

    fn scratch_dir(&self, spec: &DependencySpec) -> std::result::Result<TempDir, ProvisionError> {
        let prefix = format!("hgtdeps-{}-", sanitize(&spec.name));
        tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(&self.options.work_dir)
            .map_err(|e| {
                ProvisionError::download(
                    &spec.archive_url,
                    format!(
                        "cannot create scratch dir in {}: {}",
                        self.options.work_dir.display(),
                        e
                    ),
                )
            })
    }

    fn apply_parallel(&self, specs: &[DependencySpec], jobs: usize) -> Vec<SpecResult> {
        let next = AtomicUsize::new(0);
        let done: Mutex<Vec<(usize, SpecResult)>> = Mutex::new(Vec::with_capacity(specs.len()));

        // A panicking worker propagates out of the scope.
        std::thread::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|| loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(spec) = specs.get(index) else {
                        break;
                    };
                    let result = self.apply(spec);
                    done.lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push((index, result));
                });
            }
        });

        let mut done = done.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        done.sort_by_key(|(index, _)| *index);
        done.into_iter().map(|(_, result)| result).collect()
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
