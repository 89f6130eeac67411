//! Environment checks for the FlexiHGT toolchain.
//!
//! Verifies that the provisioned binaries resolve on PATH and answer
//! their version probe, that FlexiHGT's Python modules import, and that
//! the ete3 taxonomy database has been downloaded.

use std::path::{Path, PathBuf};

use super::probe::{extract_version, is_executable, resolve_tool_path};
use super::status::{CheckCategory, CheckItem, CheckReport, CheckStatus};
use crate::provision::DependencySpec;
use crate::shell::{execute_program, path_entries, CommandResult};

/// Python modules FlexiHGT imports, with the pip package providing each.
pub const PYTHON_MODULES: &[(&str, &str)] = &[
    ("Bio", "biopython"),
    ("pandas", "pandas"),
    ("ete3", "ete3"),
    ("numpy", "numpy"),
];

/// Location of the ete3 taxonomy database, relative to the home directory.
pub const ETE3_DB_RELATIVE: &str = ".etetoolkit/taxa.sqlite";

/// Mockable dependencies for the checker.
pub struct CheckContext<'a> {
    /// Directories searched for binaries.
    pub path_entries: Vec<PathBuf>,
    /// Run a binary with arguments; `None` when it cannot be spawned.
    pub run: &'a dyn Fn(&Path, &[String]) -> Option<CommandResult>,
    /// Whether a Python module can be imported.
    pub python_import: &'a dyn Fn(&str) -> bool,
    /// The user's home directory.
    pub home_dir: Option<PathBuf>,
}

/// Build the default `CheckContext` for production use.
pub fn default_context() -> CheckContext<'static> {
    CheckContext {
        path_entries: path_entries(),
        run: &run_program,
        python_import: &python_can_import,
        home_dir: dirs::home_dir(),
    }
}

fn run_program(program: &Path, args: &[String]) -> Option<CommandResult> {
    execute_program(program, args).ok()
}

fn python_can_import(module: &str) -> bool {
    let code = format!("import {}", module);
    execute_program("python3", &["-c", code.as_str()]).is_ok_and(|r| r.success)
}

/// Checks that everything FlexiHGT needs is present.
pub struct EnvironmentChecker<'a> {
    ctx: CheckContext<'a>,
    skip_python: bool,
}

impl<'a> EnvironmentChecker<'a> {
    /// Create a checker.
    pub fn new(ctx: CheckContext<'a>) -> Self {
        Self {
            ctx,
            skip_python: false,
        }
    }

    /// Skip the Python module and taxonomy database checks.
    pub fn skip_python(mut self, skip: bool) -> Self {
        self.skip_python = skip;
        self
    }

    /// Check every binary in `specs`, then the Python side.
    pub fn check(&self, specs: &[DependencySpec]) -> CheckReport {
        let mut items: Vec<CheckItem> = specs.iter().map(|spec| self.check_binary(spec)).collect();

        if !self.skip_python {
            items.extend(
                PYTHON_MODULES
                    .iter()
                    .map(|(module, package)| self.check_python_module(module, package)),
            );
            items.push(self.check_taxonomy_db());
        }

        CheckReport { items }
    }

    /// Check one provisioned binary.
    pub fn check_binary(&self, spec: &DependencySpec) -> CheckItem {
        let binary = spec.binary_name();
        tracing::debug!("Checking for {} on PATH", binary);

        let status = match resolve_tool_path(&binary, &self.ctx.path_entries) {
            Some(path) => self.probe_version(path, &spec.version_args),
            None if spec.install_path.is_file() && is_executable(&spec.install_path) => {
                CheckStatus::NotOnPath {
                    path: spec.install_path.clone(),
                }
            }
            None => CheckStatus::Missing {
                hint: format!(
                    "{} not found in PATH. Run 'hgtdeps install' to provision it.",
                    binary
                ),
            },
        };

        CheckItem {
            name: spec.name.clone(),
            category: CheckCategory::Binary,
            status,
        }
    }

    fn probe_version(&self, path: PathBuf, args: &[String]) -> CheckStatus {
        match (self.ctx.run)(&path, args) {
            Some(result) if result.success => CheckStatus::Found {
                version: extract_version(&result.combined_output()),
                path: Some(path),
            },
            Some(result) => CheckStatus::Broken {
                message: format!(
                    "'{} {}' exited with code {}",
                    path.display(),
                    args.join(" "),
                    result
                        .exit_code
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "none".to_string())
                ),
                path,
            },
            None => CheckStatus::Broken {
                message: format!("could not execute {}", path.display()),
                path,
            },
        }
    }

    fn check_python_module(&self, module: &str, package: &str) -> CheckItem {
        let status = if (self.ctx.python_import)(module) {
            CheckStatus::Found {
                path: None,
                version: None,
            }
        } else {
            CheckStatus::Missing {
                hint: format!("{} not found. Install it with: pip install {}", package, package),
            }
        };

        CheckItem {
            name: package.to_string(),
            category: CheckCategory::PythonModule,
            status,
        }
    }

    fn check_taxonomy_db(&self) -> CheckItem {
        let path = self.ctx.home_dir.as_ref().map(|h| h.join(ETE3_DB_RELATIVE));

        let status = match path {
            Some(path) if path.is_file() => CheckStatus::Found {
                path: Some(path),
                version: None,
            },
            _ => CheckStatus::Missing {
                hint: "ete3 database not found. Run 'ete3 upgrade' to download the database."
                    .to_string(),
            },
        };

        CheckItem {
            name: "ete3 taxonomy database".to_string(),
            category: CheckCategory::Database,
            status,
        }
    }
}
