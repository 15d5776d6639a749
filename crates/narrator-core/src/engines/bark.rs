//! Bark: style carried by textual prosody markers.
//!
//! Bark reads cues such as `[laughs]` or `[sighs]` straight from the text
//! and picks its voice from a history prompt. Each style wraps the text in
//! markers and selects one of the ten English speaker presets.

use crate::backend::{BackendConfig, CancelHandle, CommandBackend, CommandLine, RenderJob};
use crate::engine::{EngineFlavor, EngineOutput, SpeechEngine};
use crate::engines::ScratchFile;
use crate::error::NarratorResult;
use crate::request::SynthesisRequest;
use crate::speaker::{Gender, Speaker, SpeakerCatalog};
use crate::style::{StyleId, StyleProfile, StyleTable};
use crate::wav;
use once_cell::sync::Lazy;
use tracing::{debug, info};

/// Engine identifier
pub const ENGINE_ID: &str = "bark";

/// Bark's native output rate
pub const SAMPLE_RATE: u32 = crate::DEFAULT_SAMPLE_RATE;

/// Speaker used when neither the style nor the caller picks one
pub const DEFAULT_SPEAKER: &str = "v2/en_speaker_6";

static STYLES: Lazy<StyleTable> = Lazy::new(|| {
    StyleTable::new(
        StyleProfile::new(StyleId::Neutral, DEFAULT_SPEAKER)
            .with_description("Balanced, clear narration"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Enthusiastic, "v2/en_speaker_9")
            .with_markers("[laughs] ", "!")
            .with_description("Excited, energetic delivery with enthusiasm"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Serious, "v2/en_speaker_1")
            .with_markers("", ".")
            .with_description("Formal, authoritative tone with gravity"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Contemplative, "v2/en_speaker_3")
            .with_markers("...", "...")
            .with_description("Thoughtful, reflective with pauses"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Sad, "v2/en_speaker_3")
            .with_markers("[sighs] ", "...")
            .with_description("Melancholic, sorrowful with sighs"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Excited, "v2/en_speaker_9")
            .with_markers("[laughs] ", "!!!")
            .with_description("Very energetic, joyful with excitement"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Angry, "v2/en_speaker_1")
            .with_markers("", "!")
            .with_description("Intense, forceful with strong emphasis"),
    )
});

static SPEAKERS: Lazy<SpeakerCatalog> = Lazy::new(|| {
    let speakers = (0..10)
        .map(|index| {
            let speaker = Speaker::new(&format!("v2/en_speaker_{index}"));
            match index {
                1 => speaker.with_description("Deep, authoritative voice"),
                3 => speaker.with_description("Thoughtful voice"),
                4 => speaker
                    .with_description("Warm voice")
                    .with_gender(Gender::Female),
                6 => speaker.with_description("Clear, professional voice"),
                9 => speaker.with_description("Energetic voice"),
                _ => speaker,
            }
        })
        .collect();

    SpeakerCatalog::new(speakers, Speaker::new(DEFAULT_SPEAKER))
});

/// Bark style table
#[must_use]
pub fn styles() -> &'static StyleTable {
    &STYLES
}

/// The ten English Bark speaker presets
#[must_use]
pub fn speakers() -> &'static SpeakerCatalog {
    &SPEAKERS
}

/// Bark's own command-line entry point
#[must_use]
pub fn default_backend() -> BackendConfig {
    BackendConfig {
        render: CommandLine::new(
            "python3",
            &[
                "-m",
                "bark",
                "--text={text}",
                "--history_prompt",
                "{speaker}",
                "--output_dir",
                "{output_dir}",
                "--output_filename",
                "{output_name}",
            ],
        ),
        preload: None,
    }
}

/// Preload command loading every Bark model in a separate process
///
/// Not enabled by default: the render process loads its own copy, so this
/// only pays off for fetching the checkpoints ahead of a first run.
#[must_use]
pub fn model_fetch_command() -> CommandLine {
    CommandLine::new(
        "python3",
        &["-c", "from bark import preload_models; preload_models()"],
    )
}

/// Marker-driven engine backed by Bark
#[derive(Debug, Clone)]
pub struct BarkEngine {
    backend: CommandBackend,
    preloaded: bool,
}

impl BarkEngine {
    /// Create an engine that launches Bark with `config`
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            backend: CommandBackend::new(config),
            preloaded: false,
        }
    }

    /// Whether a preload call has succeeded
    #[must_use]
    pub const fn is_preloaded(&self) -> bool {
        self.preloaded
    }
}

impl Default for BarkEngine {
    fn default() -> Self {
        Self::new(default_backend())
    }
}

impl SpeechEngine for BarkEngine {
    fn engine_id(&self) -> &str {
        ENGINE_ID
    }

    fn flavor(&self) -> EngineFlavor {
        EngineFlavor::ProsodyMarkers
    }

    fn styles(&self) -> &StyleTable {
        styles()
    }

    fn speakers(&self) -> &SpeakerCatalog {
        speakers()
    }

    fn preload(&mut self) -> NarratorResult<()> {
        info!("Loading Bark TTS models");
        self.backend.preload()?;
        self.preloaded = true;
        Ok(())
    }

    fn synthesize(&self, request: &SynthesisRequest) -> NarratorResult<EngineOutput> {
        let scratch = ScratchFile::beside(&request.output_path);
        debug!("Rendering Bark audio to {}", scratch.path().display());

        self.backend.render(&RenderJob {
            text: &request.text,
            speaker: &request.speaker,
            speed: None,
            model: None,
            output: scratch.path(),
        })?;

        let waveform = wav::read_waveform(scratch.path())?;
        if waveform.sample_rate != SAMPLE_RATE {
            debug!("Bark rendered at {} Hz, expected {}", waveform.sample_rate, SAMPLE_RATE);
        }
        Ok(EngineOutput::Waveform(waveform))
    }

    fn cancel_handle(&self) -> Option<CancelHandle> {
        Some(self.backend.cancel_handle())
    }
}
