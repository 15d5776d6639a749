//! Output path handling: `.wav` enforcement and parent directory creation.

use crate::error::{NarratorError, NarratorResult};
use crate::warning::DispatchWarning;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension every narration is written with
pub const WAV_EXTENSION: &str = "wav";

/// How an engine treats an output path that lacks the `.wav` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPathPolicy {
    /// Swap the extension for `.wav`, keeping the base name
    ReplaceExtension,
    /// Keep the full name and append `.wav`, with a warning
    AppendExtension,
}

/// Check whether the file name ends in `.wav` (case-insensitive)
#[must_use]
pub fn has_wav_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_ascii_lowercase()
                .ends_with(".wav")
        })
        .unwrap_or(false)
}

/// Apply `policy` to `path`
///
/// Returns the path to write and, when the policy asks for it, a warning
/// describing the correction. Paths already ending in `.wav` are returned
/// unchanged.
#[must_use]
pub fn normalize_output_path(
    path: &Path,
    policy: OutputPathPolicy,
) -> (PathBuf, Option<DispatchWarning>) {
    if has_wav_extension(path) {
        return (path.to_path_buf(), None);
    }

    match policy {
        OutputPathPolicy::ReplaceExtension => {
            let corrected = path.with_extension(WAV_EXTENSION);
            debug!(
                "Output extension corrected: {} -> {}",
                path.display(),
                corrected.display()
            );
            (corrected, None)
        }
        OutputPathPolicy::AppendExtension => {
            let mut name = OsString::from(path.as_os_str());
            name.push(".");
            name.push(WAV_EXTENSION);
            let corrected = PathBuf::from(name);
            let warning = DispatchWarning::OutputExtension {
                original: path.to_path_buf(),
                corrected: corrected.clone(),
            };
            (corrected, Some(warning))
        }
    }
}

/// Create the parent directory of `path` when it does not exist yet
///
/// # Errors
///
/// Returns [`NarratorError::OutputDirectoryCreation`] if the directory
/// cannot be created
pub fn ensure_parent_dir(path: &Path) -> NarratorResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    debug!("Creating output directory {}", parent.display());
    std::fs::create_dir_all(parent)
        .map_err(|e| NarratorError::output_directory(parent, e.to_string()))
}
