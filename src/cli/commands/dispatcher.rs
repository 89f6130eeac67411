//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`ManifestSource`] for resolving the dependency list
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, InstallArgs};
use crate::error::Result;
use crate::manifest::{load_manifest, Manifest};
use crate::provision::DependencySpec;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where the dependency list comes from.
#[derive(Debug, Clone, Default)]
pub struct ManifestSource {
    /// Manifest file; the built-in manifest when `None`.
    pub manifest: Option<PathBuf>,
    /// Replaces the manifest's `install_dir`.
    pub install_dir: Option<PathBuf>,
}

impl ManifestSource {
    /// Load the manifest and resolve it into validated specs.
    pub fn load(&self) -> Result<(Manifest, Vec<DependencySpec>)> {
        let manifest = load_manifest(self.manifest.as_deref())?;
        let specs = manifest.resolve(self.install_dir.as_deref())?;
        Ok((manifest, specs))
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source: ManifestSource,
}

impl CommandDispatcher {
    /// Create a new dispatcher reading dependencies from `source`.
    pub fn new(source: ManifestSource) -> Self {
        Self { source }
    }

    /// Create a dispatcher from parsed CLI flags.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(ManifestSource {
            manifest: cli.manifest.clone(),
            install_dir: cli.install_dir.clone(),
        })
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Install(args)) => {
                let cmd = super::install::InstallCommand::new(self.source.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Check(args)) => {
                let cmd = super::check::CheckCommand::new(self.source.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(self.source.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                // No subcommand means install the built-in set
                let cmd =
                    super::install::InstallCommand::new(self.source.clone(), InstallArgs::default());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn default_source_loads_builtin_specs() {
        let (_, specs) = ManifestSource::default().load().unwrap();
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn install_dir_override_applies() {
        let source = ManifestSource {
            manifest: None,
            install_dir: Some(PathBuf::from("/opt/hgt/bin")),
        };
        let (_, specs) = source.load().unwrap();
        assert!(specs
            .iter()
            .all(|s| s.install_path.starts_with("/opt/hgt/bin")));
    }
}
