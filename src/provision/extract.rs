//! Archive extraction.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::outcome::ProvisionError;
use super::spec::ArchiveKind;

/// Unpack `archive` into `work_dir` and locate `member`.
///
/// Returns the path of the extracted executable. For [`ArchiveKind::Raw`]
/// the archive itself is the executable and `member` is ignored.
pub fn extract_member(
    archive: &Path,
    kind: ArchiveKind,
    member: &Path,
    work_dir: &Path,
) -> Result<PathBuf, ProvisionError> {
    let label = archive.display().to_string();

    let file = File::open(archive)
        .map_err(|e| ProvisionError::extraction(&label, format!("cannot open: {}", e)))?;
    let reader = BufReader::new(file);

    match kind {
        ArchiveKind::Raw => return Ok(archive.to_path_buf()),
        ArchiveKind::TarGz => unpack_tar(GzDecoder::new(reader), work_dir, &label)?,
        ArchiveKind::Tar => unpack_tar(reader, work_dir, &label)?,
    }

    let candidate = work_dir.join(member);
    let is_regular = std::fs::symlink_metadata(&candidate)
        .map(|meta| meta.file_type().is_file())
        .unwrap_or(false);
    if !is_regular {
        return Err(ProvisionError::extraction(
            &label,
            format!(
                "expected member '{}' not found in archive as a regular file",
                member.display()
            ),
        ));
    }

    // A symlinked parent directory could still point the member outside.
    let resolved = candidate
        .canonicalize()
        .map_err(|e| ProvisionError::extraction(&label, format!("cannot resolve member: {}", e)))?;
    let root = work_dir
        .canonicalize()
        .map_err(|e| ProvisionError::extraction(&label, format!("cannot resolve work dir: {}", e)))?;
    if !resolved.starts_with(&root) {
        return Err(ProvisionError::extraction(
            &label,
            format!("member '{}' resolves outside the archive", member.display()),
        ));
    }

    tracing::debug!("Extracted {} from {}", member.display(), label);
    Ok(candidate)
}

fn unpack_tar<R: Read>(reader: R, dest: &Path, label: &str) -> Result<(), ProvisionError> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive
        .unpack(dest)
        .map_err(|e| ProvisionError::extraction(label, format!("corrupt archive: {}", e)))
}
