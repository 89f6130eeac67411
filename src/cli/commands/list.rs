//! List command implementation.
//!
//! The `hgtdeps list` command shows each manifest dependency, where it
//! installs to and whether it is already there.

use serde::Serialize;
use std::path::PathBuf;

use crate::cli::args::ListArgs;
use crate::error::{HgtError, Result};
use crate::provision::{is_installed, ArchiveKind, DependencySpec};
use crate::ui::theme::HgtTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ManifestSource};

/// The list command implementation.
pub struct ListCommand {
    source: ManifestSource,
    args: ListArgs,
}

/// A dependency as shown by `list --json`.
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub url: String,
    pub archive: ArchiveKind,
    pub member: PathBuf,
    pub install_path: PathBuf,
    pub installed: bool,
}

impl From<&DependencySpec> for ListEntry {
    fn from(spec: &DependencySpec) -> Self {
        Self {
            name: spec.name.clone(),
            url: spec.archive_url.clone(),
            archive: spec.archive_kind,
            member: spec.member_path.clone(),
            install_path: spec.install_path.clone(),
            installed: is_installed(&spec.install_path),
        }
    }
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(source: ManifestSource, args: ListArgs) -> Self {
        Self { source, args }
    }

    /// Collect entries for every dependency in the manifest.
    pub fn entries(&self) -> Result<Vec<ListEntry>> {
        let (_, specs) = self.source.load()?;
        Ok(specs.iter().map(ListEntry::from).collect())
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries = self.entries()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| HgtError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if !ui.output_mode().shows_status() {
            for entry in &entries {
                println!("{}\t{}", entry.name, entry.install_path.display());
            }
            return Ok(CommandResult::success());
        }

        let theme = HgtTheme::new();
        ui.message(&format!("  {}", theme.header.apply_to("Dependencies:")));
        for entry in &entries {
            let state = if entry.installed {
                theme.success.apply_to("installed")
            } else {
                theme.dim.apply_to("not installed")
            };
            ui.message(&format!(
                "    {} {} {}",
                theme.highlight.apply_to(&entry.name),
                theme.dim.apply_to("→"),
                entry.install_path.display()
            ));
            ui.message(&format!(
                "      {} ({}, member {}) {}",
                theme.dim.apply_to(&entry.url),
                entry.archive,
                entry.member.display(),
                state
            ));
        }

        Ok(CommandResult::success())
    }
}
