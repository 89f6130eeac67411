//! Install command implementation.
//!
//! The `hgtdeps install` command downloads and installs every manifest
//! dependency that is not already present. It is also what runs when
//! no subcommand is given.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::InstallArgs;
use crate::error::{HgtError, Result};
use crate::provision::{
    ArchiveFetcher, DependencySpec, ProvisionError, ProvisionOptions, ProvisionReport,
    Provisioner, DEFAULT_TIMEOUT,
};
use crate::shell::{is_on_path, path_entries};
use crate::ui::UserInterface;

use super::display::{failure_hint, finish_spinner, format_bytes, show_outcome};
use super::dispatcher::{Command, CommandResult, ManifestSource};

/// The install command implementation.
pub struct InstallCommand {
    source: ManifestSource,
    args: InstallArgs,
    work_dir: Option<PathBuf>,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(source: ManifestSource, args: InstallArgs) -> Self {
        Self {
            source,
            args,
            work_dir: None,
        }
    }

    /// Place scratch directories under `dir` instead of the system temp dir.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    fn select(&self, specs: Vec<DependencySpec>) -> Result<Vec<DependencySpec>> {
        if self.args.only.is_empty() {
            return Ok(specs);
        }

        let known: BTreeSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        let unknown: Vec<&str> = self
            .args
            .only
            .iter()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(HgtError::ConfigValidationError {
                message: format!(
                    "unknown dependency: {} (known: {})",
                    unknown.join(", "),
                    known.into_iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        Ok(specs
            .into_iter()
            .filter(|spec| self.args.only.contains(&spec.name))
            .collect())
    }

    fn provisioner(&self, manifest_timeout: Option<u64>) -> Result<Provisioner> {
        let timeout = self
            .args
            .timeout
            .or(manifest_timeout)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let fetcher = ArchiveFetcher::with_timeout(timeout)?;

        let mut options = ProvisionOptions {
            force: self.args.force,
            dry_run: self.args.dry_run,
            jobs: usize::from(self.args.jobs),
            ..ProvisionOptions::default()
        };
        if let Some(dir) = &self.work_dir {
            options.work_dir = dir.clone();
        }
        Ok(Provisioner::new(fetcher, options))
    }

    fn run_sequential(
        &self,
        provisioner: &Provisioner,
        specs: &[DependencySpec],
        ui: &mut dyn UserInterface,
    ) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();
        for spec in specs {
            if ui.output_mode().shows_detail() {
                ui.message(&format!(
                    "  {} <- {} ({})",
                    spec.install_path.display(),
                    spec.archive_url,
                    spec.archive_kind
                ));
            }
            let mut spinner = ui.start_spinner(&format!("Provisioning {}...", spec.name));
            let single = provisioner.provision(std::slice::from_ref(spec))?;
            for result in &single.results {
                finish_spinner(spinner.as_mut(), result);
            }
            report.results.extend(single.results);
        }
        Ok(report)
    }

    fn run_parallel(
        &self,
        provisioner: &Provisioner,
        specs: &[DependencySpec],
        ui: &mut dyn UserInterface,
    ) -> Result<ProvisionReport> {
        let mut spinner = ui.start_spinner(&format!(
            "Provisioning {} dependencies ({} jobs)...",
            specs.len(),
            self.args.jobs
        ));
        let report = provisioner.provision(specs)?;
        if report.is_success() {
            spinner.finish_success("Provisioning finished");
        } else {
            spinner.finish_error("Provisioning finished with failures");
        }
        for result in &report.results {
            show_outcome(ui, result);
        }
        Ok(report)
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (manifest, specs) = self.source.load()?;
        let specs = self.select(specs)?;
        let provisioner = self.provisioner(manifest.timeout_secs)?;

        let title = if self.args.dry_run {
            "hgtdeps install (dry run)"
        } else {
            "hgtdeps install"
        };
        ui.show_header(title);

        let report = if provisioner.options().jobs > 1 && specs.len() > 1 {
            self.run_parallel(&provisioner, &specs, ui)?
        } else {
            self.run_sequential(&provisioner, &specs, ui)?
        };

        for (_, err) in report.failures() {
            if let Some(hint) = failure_hint(err) {
                ui.hint(hint);
            }
            if let ProvisionError::Install { .. } = err {
                if !self.args.dry_run {
                    ui.hint("Choose a writable directory with --install-dir");
                }
            }
        }

        warn_if_not_on_path(ui, &report);

        if report.is_success() {
            let downloaded = report.bytes_downloaded();
            if downloaded > 0 {
                ui.success(&format!(
                    "All {} dependencies ready ({} downloaded)",
                    report.results.len(),
                    format_bytes(downloaded)
                ));
            } else {
                ui.success(&format!("All {} dependencies ready", report.results.len()));
            }
            Ok(CommandResult::success())
        } else {
            let failed: Vec<&str> = report.failures().into_iter().map(|(n, _)| n).collect();
            ui.error(&format!("Failed to provision: {}", failed.join(", ")));
            Ok(CommandResult::failure(report.exit_code()))
        }
    }
}

/// Warn once per install directory that is missing from PATH.
fn warn_if_not_on_path(ui: &mut dyn UserInterface, report: &ProvisionReport) {
    let entries = path_entries();
    let dirs: BTreeSet<&Path> = report
        .results
        .iter()
        .filter(|r| !r.outcome.is_failure())
        .filter_map(|r| r.install_path.parent())
        .collect();

    for dir in dirs {
        if !is_on_path(dir, &entries) {
            ui.warning(&format!("{} is not on your PATH", dir.display()));
            ui.hint(&format!("export PATH=\"{}:$PATH\"", dir.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use httpmock::prelude::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn tar_gz(path: &str, data: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path, data).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&builder.into_inner().unwrap()).unwrap();
        encoder.finish().unwrap()
    }

    struct Fixture {
        temp: TempDir,
        bin: PathBuf,
        work: PathBuf,
        manifest: PathBuf,
    }

    fn fixture(server: &MockServer) -> Fixture {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        let work = temp.path().join("work");
        fs::create_dir(&bin).unwrap();
        fs::create_dir(&work).unwrap();
        let manifest = temp.path().join("deps.yml");
        fs::write(
            &manifest,
            format!(
                "install_dir: {}\ndependencies:\n  - name: diamond\n    url: {}\n    member: diamond\n  - name: mmseqs\n    url: {}\n    member: mmseqs/bin/mmseqs\n",
                bin.display(),
                server.url("/diamond.tar.gz"),
                server.url("/mmseqs.tar.gz"),
            ),
        )
        .unwrap();
        Fixture {
            temp,
            bin,
            work,
            manifest,
        }
    }

    fn command(f: &Fixture, args: InstallArgs) -> InstallCommand {
        let source = ManifestSource {
            manifest: Some(f.manifest.clone()),
            install_dir: None,
        };
        InstallCommand::new(source, args).with_work_dir(&f.work)
    }

    #[test]
    fn installs_all_and_then_is_idempotent() {
        let server = MockServer::start();
        let diamond = server.mock(|when, then| {
            when.method(GET).path("/diamond.tar.gz");
            then.status(200).body(tar_gz("diamond", b"d"));
        });
        let mmseqs = server.mock(|when, then| {
            when.method(GET).path("/mmseqs.tar.gz");
            then.status(200).body(tar_gz("mmseqs/bin/mmseqs", b"m"));
        });
        let f = fixture(&server);

        let mut ui = MockUI::new();
        let result = command(&f, InstallArgs::default()).execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(f.bin.join("diamond").is_file());
        assert!(f.bin.join("mmseqs").is_file());
        assert!(ui.has_success("All 2 dependencies ready"));

        let mut ui = MockUI::new();
        let result = command(&f, InstallArgs::default()).execute(&mut ui).unwrap();
        assert!(result.success);
        diamond.assert_calls(1);
        mmseqs.assert_calls(1);
        assert_eq!(fs::read_dir(&f.work).unwrap().count(), 0);
        assert!(f.temp.path().exists());
    }

    #[test]
    fn failure_is_isolated_and_exits_one() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/diamond.tar.gz");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/mmseqs.tar.gz");
            then.status(200).body(tar_gz("mmseqs/bin/mmseqs", b"m"));
        });
        let f = fixture(&server);

        let mut ui = MockUI::new();
        let result = command(&f, InstallArgs::default()).execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(!f.bin.join("diamond").exists());
        assert!(f.bin.join("mmseqs").is_file());
        assert!(ui.has_error("Failed to provision: diamond"));
        assert!(ui.spinner_finishes().iter().any(|s| s.starts_with("err:")));
    }

    #[test]
    fn only_filters_dependencies() {
        let server = MockServer::start();
        let diamond = server.mock(|when, then| {
            when.method(GET).path("/diamond.tar.gz");
            then.status(200).body(tar_gz("diamond", b"d"));
        });
        let f = fixture(&server);

        let args = InstallArgs {
            only: vec!["diamond".to_string()],
            ..InstallArgs::default()
        };
        let mut ui = MockUI::new();
        let result = command(&f, args).execute(&mut ui).unwrap();

        assert!(result.success);
        diamond.assert_calls(1);
        assert!(!f.bin.join("mmseqs").exists());
    }

    #[test]
    fn unknown_only_name_is_rejected() {
        let server = MockServer::start();
        let f = fixture(&server);
        let args = InstallArgs {
            only: vec!["blast".to_string()],
            ..InstallArgs::default()
        };

        let err = command(&f, args).execute(&mut MockUI::new()).unwrap_err();
        assert!(err.to_string().contains("blast"));
    }

    #[test]
    fn dry_run_downloads_nothing() {
        let server = MockServer::start();
        let any = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });
        let f = fixture(&server);
        let args = InstallArgs {
            dry_run: true,
            ..InstallArgs::default()
        };

        let mut ui = MockUI::new();
        let result = command(&f, args).execute(&mut ui).unwrap();

        assert!(result.success);
        any.assert_calls(0);
        assert_eq!(fs::read_dir(&f.bin).unwrap().count(), 0);
        assert!(ui.headers().iter().any(|h| h.contains("dry run")));
    }

    #[test]
    fn parallel_jobs_install_everything() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/diamond.tar.gz");
            then.status(200).body(tar_gz("diamond", b"d"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/mmseqs.tar.gz");
            then.status(200).body(tar_gz("mmseqs/bin/mmseqs", b"m"));
        });
        let f = fixture(&server);
        let args = InstallArgs {
            jobs: 2,
            ..InstallArgs::default()
        };

        let mut ui = MockUI::new();
        let result = command(&f, args).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("diamond installed"));
        assert!(ui.has_success("mmseqs installed"));
    }

    #[test]
    fn install_dir_missing_from_path_is_warned() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/diamond.tar.gz");
            then.status(200).body(tar_gz("diamond", b"d"));
        });
        let f = fixture(&server);
        let args = InstallArgs {
            only: vec!["diamond".to_string()],
            ..InstallArgs::default()
        };

        let mut ui = MockUI::new();
        command(&f, args).execute(&mut ui).unwrap();

        assert!(ui.has_warning("not on your PATH"));
    }
}
