//! Shared display helpers for provisioning and check results.
//!
//! Used by `install`, `check` and `list` so outcomes read the same
//! everywhere.

use crate::check::{CheckItem, CheckStatus};
use crate::provision::{ProvisionError, ProvisionOutcome, SpecResult};
use crate::ui::{SpinnerHandle, UserInterface};

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// One-line summary of a provisioning result.
pub fn outcome_line(result: &SpecResult) -> String {
    let path = result.install_path.display();
    match &result.outcome {
        ProvisionOutcome::AlreadySatisfied => {
            format!("{} already installed at {}", result.name, path)
        }
        ProvisionOutcome::Installed { bytes_downloaded } => format!(
            "{} installed to {} ({})",
            result.name,
            path,
            format_bytes(*bytes_downloaded)
        ),
        ProvisionOutcome::WouldInstall => format!("{} would be installed to {}", result.name, path),
        ProvisionOutcome::Failed(err) => format!("{}: {}", result.name, err),
    }
}

/// Remediation hint for a failure, if one applies.
pub fn failure_hint(err: &ProvisionError) -> Option<&'static str> {
    match err {
        ProvisionError::Download { .. } => {
            Some("Check your network connection or pin a reachable URL in a manifest")
        }
        ProvisionError::Extraction { .. } => {
            Some("The archive layout may have changed; check the manifest's member path")
        }
        ProvisionError::Install { .. } => None,
    }
}

/// Close a spinner according to a provisioning result.
pub fn finish_spinner(spinner: &mut dyn SpinnerHandle, result: &SpecResult) {
    let line = outcome_line(result);
    match &result.outcome {
        ProvisionOutcome::Installed { .. } => spinner.finish_success(&line),
        ProvisionOutcome::AlreadySatisfied | ProvisionOutcome::WouldInstall => {
            spinner.finish_skipped(&line)
        }
        ProvisionOutcome::Failed(_) => spinner.finish_error(&line),
    }
}

/// Print a provisioning result as a status line.
pub fn show_outcome(ui: &mut dyn UserInterface, result: &SpecResult) {
    let line = outcome_line(result);
    match &result.outcome {
        ProvisionOutcome::Installed { .. } => ui.success(&line),
        ProvisionOutcome::AlreadySatisfied | ProvisionOutcome::WouldInstall => ui.skipped(&line),
        ProvisionOutcome::Failed(_) => ui.error(&line),
    }
}

/// Print a check item, with its hint when it is not usable.
pub fn show_check_item(ui: &mut dyn UserInterface, item: &CheckItem) {
    match &item.status {
        CheckStatus::Found { path, version } => {
            let mut line = item.name.clone();
            if let Some(version) = version {
                line.push_str(&format!(" {}", version));
            }
            if let Some(path) = path {
                line.push_str(&format!(" ({})", path.display()));
            }
            ui.success(&line);
        }
        CheckStatus::NotOnPath { path } => {
            ui.warning(&format!(
                "{} is installed at {} but not on PATH",
                item.name,
                path.display()
            ));
            if let Some(dir) = path.parent() {
                ui.hint(&format!("Add {} to your PATH", dir.display()));
            }
        }
        CheckStatus::Broken { message, .. } => {
            ui.error(&format!("{}: {}", item.name, message));
        }
        CheckStatus::Missing { hint } => {
            ui.error(&format!("{} is missing", item.name));
            ui.hint(hint);
        }
    }
}
