//! Manifest discovery and loading.
//!
//! The built-in manifest is embedded at compile time; a file passed via
//! `--manifest` replaces it wholesale.

use crate::error::{HgtError, Result};
use crate::manifest::schema::Manifest;
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN_MANIFEST: &str = include_str!("default.yml");

/// Parse the manifest shipped with the binary.
pub fn builtin_manifest() -> Result<Manifest> {
    parse_manifest(BUILTIN_MANIFEST, Path::new("<built-in>"))
}

/// Load a manifest from disk.
pub fn load_manifest_file(path: &Path) -> Result<Manifest> {
    if !path.is_file() {
        return Err(HgtError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    tracing::debug!("Loaded manifest from {}", path.display());
    parse_manifest(&content, path)
}

/// Load `path` if given, the built-in manifest otherwise.
pub fn load_manifest(path: Option<&Path>) -> Result<Manifest> {
    match path {
        Some(path) => load_manifest_file(path),
        None => builtin_manifest(),
    }
}

fn parse_manifest(content: &str, path: &Path) -> Result<Manifest> {
    serde_yaml::from_str(content).map_err(|e| HgtError::ConfigParseError {
        path: PathBuf::from(path),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::ArchiveKind;
    use tempfile::TempDir;

    #[test]
    fn builtin_manifest_lists_diamond_and_mmseqs() {
        let manifest = builtin_manifest().unwrap();
        let specs = manifest.resolve(None).unwrap();

        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["diamond", "mmseqs"]);
        assert_eq!(specs[0].install_path, PathBuf::from("/usr/local/bin/diamond"));
        assert_eq!(specs[1].member_path, PathBuf::from("mmseqs/bin/mmseqs"));
        assert_eq!(specs[1].install_path, PathBuf::from("/usr/local/bin/mmseqs"));
        assert!(specs.iter().all(|s| s.archive_kind == ArchiveKind::TarGz));
        assert!(specs.iter().all(|s| s.archive_url.starts_with("https://")));
        assert_eq!(manifest.timeout_secs, Some(600));
    }

    #[test]
    fn loads_manifest_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deps.yml");
        fs::write(
            &path,
            "dependencies:\n  - name: tool\n    url: https://x/t.tar\n    archive: tar\n    member: t\n",
        )
        .unwrap();

        let manifest = load_manifest(Some(&path)).unwrap();
        assert_eq!(manifest.dependencies[0].archive, ArchiveKind::Tar);
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = load_manifest(Some(Path::new("/nonexistent/deps.yml"))).unwrap_err();
        assert!(matches!(err, HgtError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deps.yml");
        fs::write(&path, "dependencies: [unclosed").unwrap();

        let err = load_manifest(Some(&path)).unwrap_err();
        match err {
            HgtError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
