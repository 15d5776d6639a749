//! Non-fatal conditions raised while building a request.

use std::path::PathBuf;

/// A recoverable problem that was replaced by a safe fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchWarning {
    /// The requested style is not in the engine's table; neutral was used
    UnknownStyle {
        /// Style name as requested
        requested: String,
    },
    /// The requested speaker is not offered by the engine
    UnknownSpeaker {
        /// Speaker reference as requested
        requested: String,
        /// Speaker used instead
        fallback: String,
        /// Valid speaker references
        valid: Vec<String>,
    },
    /// The output path did not end in `.wav`
    OutputExtension {
        /// Path as given
        original: PathBuf,
        /// Path that will be written
        corrected: PathBuf,
    },
}

impl DispatchWarning {
    /// Short machine-friendly name of the warning
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownStyle { .. } => "unknown_style",
            Self::UnknownSpeaker { .. } => "unknown_speaker",
            Self::OutputExtension { .. } => "output_extension",
        }
    }
}

impl std::fmt::Display for DispatchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStyle { requested } => {
                write!(f, "Unknown style '{requested}'. Using 'neutral'.")
            }
            Self::UnknownSpeaker {
                requested,
                fallback,
                valid,
            } => write!(
                f,
                "Unknown speaker '{requested}'. Available speakers: {}. Using default: {fallback}",
                valid.join(", ")
            ),
            Self::OutputExtension {
                original,
                corrected,
            } => write!(
                f,
                "Output '{}' does not end in .wav; writing '{}'",
                original.display(),
                corrected.display()
            ),
        }
    }
}
