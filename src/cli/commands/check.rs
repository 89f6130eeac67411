//! Check command implementation.
//!
//! The `hgtdeps check` command verifies that FlexiHGT's external
//! prerequisites are usable: the provisioned binaries, its Python modules
//! and the ete3 taxonomy database.

use crate::check::{default_context, CheckContext, CheckReport, EnvironmentChecker};
use crate::cli::args::CheckArgs;
use crate::error::{HgtError, Result};
use crate::ui::UserInterface;

use super::display::show_check_item;
use super::dispatcher::{Command, CommandResult, ManifestSource};

/// The check command implementation.
pub struct CheckCommand {
    source: ManifestSource,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(source: ManifestSource, args: CheckArgs) -> Self {
        Self { source, args }
    }

    /// Run the checks against an explicit context.
    pub fn run_with(&self, ctx: CheckContext<'_>) -> Result<CheckReport> {
        let (_, specs) = self.source.load()?;
        Ok(EnvironmentChecker::new(ctx)
            .skip_python(self.args.skip_python)
            .check(&specs))
    }

    fn render(&self, report: &CheckReport, ui: &mut dyn UserInterface) -> Result<()> {
        if self.args.json {
            let json = serde_json::to_string_pretty(report)
                .map_err(|e| HgtError::Other(e.into()))?;
            println!("{}", json);
            return Ok(());
        }

        ui.show_header("hgtdeps check");
        for item in &report.items {
            show_check_item(ui, item);
        }

        let problems = report.problems().count();
        if problems == 0 {
            ui.success("Everything FlexiHGT needs is in place");
        } else {
            ui.error(&format!(
                "{} of {} checks need attention",
                problems,
                report.items.len()
            ));
        }
        Ok(())
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.run_with(default_context())?;
        self.render(&report, ui)?;

        if report.all_ok() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::CommandResult as RunResult;
    use crate::ui::MockUI;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    fn fake_binary(path: &Path) {
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn source(bin: &Path) -> ManifestSource {
        ManifestSource {
            manifest: None,
            install_dir: Some(bin.to_path_buf()),
        }
    }

    fn version_ok(_: &Path, _: &[String]) -> Option<RunResult> {
        Some(RunResult {
            exit_code: Some(0),
            stdout: "tool version 2.1.10\n".to_string(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: true,
        })
    }

    #[test]
    fn binaries_on_path_pass() {
        let temp = TempDir::new().unwrap();
        fake_binary(&temp.path().join("diamond"));
        fake_binary(&temp.path().join("mmseqs"));

        let cmd = CheckCommand::new(
            source(temp.path()),
            CheckArgs {
                skip_python: true,
                json: false,
            },
        );
        let report = cmd
            .run_with(CheckContext {
                path_entries: vec![temp.path().to_path_buf()],
                run: &version_ok,
                python_import: &|_| true,
                home_dir: None,
            })
            .unwrap();

        assert!(report.all_ok());
        assert_eq!(report.items.len(), 2);

        let mut ui = MockUI::new();
        cmd.render(&report, &mut ui).unwrap();
        assert!(ui.has_success("diamond 2.1.10"));
    }

    #[test]
    fn missing_python_modules_are_problems() {
        let temp = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fake_binary(&temp.path().join("diamond"));
        fake_binary(&temp.path().join("mmseqs"));

        let cmd = CheckCommand::new(source(temp.path()), CheckArgs::default());
        let report = cmd
            .run_with(CheckContext {
                path_entries: vec![temp.path().to_path_buf()],
                run: &version_ok,
                python_import: &|module| module != "ete3",
                home_dir: Some(home.path().to_path_buf()),
            })
            .unwrap();

        assert!(!report.all_ok());
        let names: Vec<&str> = report.problems().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"ete3"));
        assert!(names.contains(&"ete3 taxonomy database"));

        let mut ui = MockUI::new();
        cmd.render(&report, &mut ui).unwrap();
        assert!(ui.has_hint("pip install ete3"));
        assert!(ui.has_error("2 of 7 checks need attention"));
    }

    #[test]
    fn installed_but_not_on_path_is_flagged() {
        let temp = TempDir::new().unwrap();
        fake_binary(&temp.path().join("diamond"));

        let cmd = CheckCommand::new(
            source(temp.path()),
            CheckArgs {
                skip_python: true,
                json: false,
            },
        );
        let report = cmd
            .run_with(CheckContext {
                path_entries: vec![PathBuf::from("/nonexistent")],
                run: &version_ok,
                python_import: &|_| true,
                home_dir: None,
            })
            .unwrap();

        let mut ui = MockUI::new();
        cmd.render(&report, &mut ui).unwrap();
        assert!(ui.has_warning("diamond is installed at"));
        assert!(ui.has_error("mmseqs is missing"));
    }
}
