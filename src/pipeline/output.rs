//! Writing the finished document.

use crate::error::{ExportError, OutputErrorKind, Result};
use crate::model::clean_for_spdx;
use crate::spdx::SpdxDocument;
use std::path::{Path, PathBuf};

/// Highest numbered backup slot.
const MAX_BACKUPS: u32 = 1000;

/// Output path used when none is configured: `<project>-<version>.json`,
/// sanitized like an SPDX identifier.
#[must_use]
pub fn default_output_path(project: &str, version: &str) -> PathBuf {
    PathBuf::from(format!("{}.json", clean_for_spdx(&format!("{project}-{version}"))))
}

/// Move an existing file to `<stem>.NNN`, using the first free slot.
///
/// Returns the backup path, or `None` if there was nothing to move.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let stem = path.with_extension("");
    let backup = (0..MAX_BACKUPS)
        .map(|i| PathBuf::from(format!("{}.{i:03}", stem.display())))
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| {
            ExportError::output(
                "backing up output file",
                OutputErrorKind::Backup {
                    path: path.to_path_buf(),
                    message: "no free backup slot".to_string(),
                },
            )
        })?;

    std::fs::rename(path, &backup).map_err(|e| {
        ExportError::output(
            "backing up output file",
            OutputErrorKind::Backup {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        )
    })?;
    tracing::info!(
        "Moved old output file '{}' to '{}'",
        path.display(),
        backup.display()
    );
    Ok(Some(backup))
}

/// Serialize `document` to `path`, optionally moving an existing file aside
/// first.
pub fn write_document(document: &SpdxDocument, path: &Path, backup_existing: bool) -> Result<()> {
    let json = document.to_json_string()?;
    if backup_existing {
        backup_file(path)?;
    }

    tracing::info!("Writing SPDX output file {}", path.display());
    std::fs::write(path, json).map_err(|e| {
        ExportError::output(
            "writing document",
            OutputErrorKind::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        )
    })
}
