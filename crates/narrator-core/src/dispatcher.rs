//! Style dispatch: (text, style, speaker) to one concrete engine call.
//!
//! The dispatcher owns exactly one engine and reads its immutable style
//! table and speaker catalog. Unknown styles and speakers never reach the
//! engine; they are replaced by safe defaults and reported as
//! [`DispatchWarning`]s.

use crate::backend::CancelHandle;
use crate::engine::{EngineFlavor, EngineOutput, SpeechEngine};
use crate::error::{NarratorError, NarratorResult};
use crate::output::{ensure_parent_dir, normalize_output_path};
use crate::request::{SynthesisRequest, SynthesisResult};
use crate::style::StyleProfile;
use crate::warning::DispatchWarning;
use crate::wav;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Maps emotional styles onto a single speech engine
#[derive(Debug)]
pub struct StyleDispatcher<E> {
    engine: E,
}

impl<E: SpeechEngine> StyleDispatcher<E> {
    /// Create a dispatcher around `engine`
    #[must_use]
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The wrapped engine
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Give the engine back
    #[must_use]
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Profile for `style_id`, falling back to neutral
    ///
    /// Never fails. An unknown name, or a style this engine has no profile
    /// for, logs one warning and yields the neutral profile.
    #[must_use]
    pub fn resolve(&self, style_id: &str) -> &StyleProfile {
        self.resolve_checked(style_id).0
    }

    /// Like [`Self::resolve`], also returning the warning raised
    #[must_use]
    pub fn resolve_checked(&self, style_id: &str) -> (&StyleProfile, Option<DispatchWarning>) {
        let styles = self.engine.styles();
        if let Some(profile) = styles.get(style_id) {
            return (profile, None);
        }

        let warning = DispatchWarning::UnknownStyle {
            requested: style_id.to_string(),
        };
        warn!("{}", warning);
        (styles.neutral(), Some(warning))
    }

    /// Speaker to use for `profile` given an optional override
    ///
    /// An override outside the engine's catalog is discarded with a warning.
    /// A missing or blank override yields the profile's speaker.
    #[must_use]
    pub fn validate_speaker(&self, speaker_ref: Option<&str>, profile: &StyleProfile) -> String {
        self.validate_speaker_checked(speaker_ref, profile).0
    }

    /// Like [`Self::validate_speaker`], also returning the warning raised
    #[must_use]
    pub fn validate_speaker_checked(
        &self,
        speaker_ref: Option<&str>,
        profile: &StyleProfile,
    ) -> (String, Option<DispatchWarning>) {
        let Some(requested) = speaker_ref.filter(|speaker| !speaker.trim().is_empty()) else {
            return (profile.speaker.clone(), None);
        };

        let catalog = self.engine.speakers();
        if catalog.contains(requested) {
            return (requested.to_string(), None);
        }

        let warning = DispatchWarning::UnknownSpeaker {
            requested: requested.to_string(),
            fallback: profile.speaker.clone(),
            valid: catalog.ids().into_iter().map(String::from).collect(),
        };
        warn!("{}", warning);
        (profile.speaker.clone(), Some(warning))
    }

    /// Build the request for one synthesis call
    ///
    /// # Errors
    ///
    /// Returns [`NarratorError::EmptyInput`] if `text` is blank, or an
    /// invalid-input error if `output_path` has no file name
    pub fn build_request(
        &self,
        text: &str,
        output_path: &Path,
        style_id: &str,
        speaker_override: Option<&str>,
    ) -> NarratorResult<SynthesisRequest> {
        if text.trim().is_empty() {
            return Err(NarratorError::EmptyInput);
        }

        if output_path.file_name().is_none() {
            return Err(NarratorError::invalid_input(format!(
                "Output path '{}' does not name a file",
                output_path.display()
            )));
        }

        let mut warnings = Vec::new();

        let (profile, style_warning) = self.resolve_checked(style_id);
        warnings.extend(style_warning);

        let (speaker, speaker_warning) = self.validate_speaker_checked(speaker_override, profile);
        warnings.extend(speaker_warning);

        let flavor = self.engine.flavor();
        let (output_path, path_warning) = normalize_output_path(output_path, flavor.output_policy());
        if let Some(warning) = &path_warning {
            warn!("{}", warning);
        }
        warnings.extend(path_warning);

        let (engine_text, speed) = match flavor {
            EngineFlavor::ProsodyMarkers => (profile.decorate(text), None),
            EngineFlavor::SpeechRate => (
                text.to_string(),
                Some(profile.speed_multiplier.unwrap_or(1.0)),
            ),
        };

        debug!(
            "Request: style={} speaker={} speed={:?} output={}",
            profile.style,
            speaker,
            speed,
            output_path.display()
        );

        Ok(SynthesisRequest {
            raw_text: text.to_string(),
            text: engine_text,
            output_path,
            style: profile.style,
            speaker_override: speaker_override.map(String::from),
            speaker,
            speed,
            warnings,
        })
    }

    /// Run one request through the engine and write the result
    ///
    /// Failures are reported in the returned result, never propagated.
    /// Engine errors become [`NarratorError::Synthesis`] with the original
    /// message kept.
    pub fn dispatch(&self, request: &SynthesisRequest) -> SynthesisResult {
        match self.try_dispatch(request) {
            Ok(result) => result,
            Err(e) => {
                error!("Synthesis failed ({}): {}", e.category(), e);
                SynthesisResult::failed(request.output_path.clone(), e)
            }
        }
    }

    fn try_dispatch(&self, request: &SynthesisRequest) -> NarratorResult<SynthesisResult> {
        let path = &request.output_path;
        ensure_parent_dir(path)?;

        info!(
            "Generating speech with {} (style={}, speaker={})",
            self.engine.engine_id(),
            request.style,
            request.speaker
        );

        let output = self
            .engine
            .synthesize(request)
            .map_err(NarratorError::into_synthesis)?;

        let (duration_seconds, sample_rate) = match output {
            EngineOutput::Waveform(waveform) => {
                wav::write_waveform(path, &waveform)?;
                (Some(waveform.duration_seconds()), Some(waveform.sample_rate))
            }
            EngineOutput::FileWritten if path.exists() => match wav::probe(path) {
                Ok(info) => (Some(info.duration_seconds), Some(info.sample_rate)),
                Err(e) => {
                    warn!("Could not read WAV header of {}: {}", path.display(), e);
                    (None, None)
                }
            },
            EngineOutput::FileWritten => (None, None),
        };

        if !path.exists() {
            return Err(NarratorError::synthesis(format!(
                "Output file was not created: {}",
                path.display()
            )));
        }

        let byte_size = std::fs::metadata(path)?.len();
        info!("Wrote {} ({} bytes)", path.display(), byte_size);

        Ok(SynthesisResult::succeeded(
            path.clone(),
            byte_size,
            duration_seconds,
            sample_rate,
        ))
    }

    /// Handle that stops the engine's in-flight call, if it has one
    ///
    /// Take this before moving the dispatcher onto a worker thread.
    #[must_use]
    pub fn cancel_handle(&self) -> Option<CancelHandle> {
        self.engine.cancel_handle()
    }

    /// Ask the engine to load its model ahead of the first call
    ///
    /// A failure only warns: the model then loads on first generation.
    /// Returns whether the preload succeeded.
    pub fn preload(&mut self) -> bool {
        match self.engine.preload() {
            Ok(()) => {
                info!("{} models loaded", self.engine.engine_id());
                true
            }
            Err(NarratorError::Interrupted) => {
                info!("Model preload interrupted");
                false
            }
            Err(e) => {
                warn!("Model preload failed: {}", e);
                warn!("Models will load during first generation");
                false
            }
        }
    }

    /// Build and dispatch in one step
    ///
    /// Request-building failures (such as blank text) come back as a failed
    /// result for the path as given.
    pub fn synthesize(
        &self,
        text: &str,
        output_path: &Path,
        style_id: &str,
        speaker_override: Option<&str>,
    ) -> SynthesisResult {
        match self.build_request(text, output_path, style_id, speaker_override) {
            Ok(request) => self.dispatch(&request),
            Err(e) => {
                error!("{}", e);
                SynthesisResult::failed(output_path.to_path_buf(), e)
            }
        }
    }
}
