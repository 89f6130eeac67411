//! Locating binaries and reading their versions.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv?(\d+(?:\.[0-9A-Za-z]+)+)\b").unwrap());

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Pull a version string out of `--version` output.
///
/// Prefers a dotted number (`2.1.10`, `15.6f452`); falls back to the first
/// non-empty line for tools that print a bare commit hash.
pub fn extract_version(output: &str) -> Option<String> {
    if let Some(caps) = VERSION_RE.captures(output) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}
