//! Concrete engines.
//!
//! Each binary picks one of these at build time.

pub mod bark;
pub mod kokoro;

pub use bark::BarkEngine;
pub use kokoro::KokoroEngine;

use std::path::{Path, PathBuf};
use tracing::warn;

/// Intermediate render file, removed when dropped
#[derive(Debug)]
pub(crate) struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Hidden, uniquely named sibling of `output`
    pub(crate) fn beside(output: &Path) -> Self {
        let stem = output
            .file_stem()
            .map_or_else(|| "narration".into(), |stem| stem.to_string_lossy());
        let name = format!(".{stem}.{}.render.wav", uuid::Uuid::new_v4().simple());
        let path = output
            .parent()
            .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name));
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}
