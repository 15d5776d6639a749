//! The capability every external TTS engine exposes to the dispatcher.
//!
//! Each engine owns its style table and speaker catalog. The dispatcher
//! never branches on which engine it holds; the differences live behind
//! [`EngineFlavor`].

use crate::backend::CancelHandle;
use crate::error::NarratorResult;
use crate::output::OutputPathPolicy;
use crate::request::SynthesisRequest;
use crate::speaker::SpeakerCatalog;
use crate::style::StyleTable;
use crate::wav::Waveform;

/// How an engine expresses emotional style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFlavor {
    /// Textual prosody markers wrapped around the input text
    ProsodyMarkers,
    /// A speech-rate multiplier passed next to the speaker
    SpeechRate,
}

impl EngineFlavor {
    /// Policy applied to output paths that lack `.wav`
    #[must_use]
    pub const fn output_policy(self) -> OutputPathPolicy {
        match self {
            Self::ProsodyMarkers => OutputPathPolicy::ReplaceExtension,
            Self::SpeechRate => OutputPathPolicy::AppendExtension,
        }
    }
}

/// What an engine hands back from a synthesis call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    /// Raw audio; the caller writes the WAV
    Waveform(Waveform),
    /// The engine already wrote the WAV at the request's output path
    FileWritten,
}

/// Trait that all external TTS engines implement
pub trait SpeechEngine: Send {
    /// Engine identifier used in logs
    fn engine_id(&self) -> &str;

    /// How this engine expresses style
    fn flavor(&self) -> EngineFlavor;

    /// Style table for this engine
    fn styles(&self) -> &StyleTable;

    /// Valid speaker references for this engine
    fn speakers(&self) -> &SpeakerCatalog;

    /// Load or warm up the underlying model
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be preloaded. Callers treat this
    /// as non-fatal.
    fn preload(&mut self) -> NarratorResult<()>;

    /// Run one blocking synthesis call
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails for any reason
    fn synthesize(&self, request: &SynthesisRequest) -> NarratorResult<EngineOutput>;

    /// Handle that stops an in-flight call from another thread, if the
    /// engine supports it
    fn cancel_handle(&self) -> Option<CancelHandle> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_output_policy() {
        assert_eq!(
            EngineFlavor::ProsodyMarkers.output_policy(),
            OutputPathPolicy::ReplaceExtension
        );
        assert_eq!(
            EngineFlavor::SpeechRate.output_policy(),
            OutputPathPolicy::AppendExtension
        );
    }
}
