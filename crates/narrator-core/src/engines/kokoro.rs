//! Kokoro: style carried by voice choice and speech rate.
//!
//! Kokoro has no prosody markup, so each style maps to a voice and a speed
//! multiplier. Kokoro writes the WAV itself; it renders beside the output
//! and the file is moved into place only once the render succeeds.

use crate::backend::{BackendConfig, CancelHandle, CommandBackend, CommandLine, RenderJob};
use crate::engine::{EngineFlavor, EngineOutput, SpeechEngine};
use crate::engines::ScratchFile;
use crate::error::NarratorResult;
use crate::request::SynthesisRequest;
use crate::speaker::{Gender, Speaker, SpeakerCatalog};
use crate::style::{StyleId, StyleProfile, StyleTable};
use once_cell::sync::Lazy;
use tracing::{debug, info};

/// Engine identifier
pub const ENGINE_ID: &str = "kokoro";

/// Kokoro's native output rate
pub const SAMPLE_RATE: u32 = crate::DEFAULT_SAMPLE_RATE;

/// Voice used when neither the style nor the caller picks one
pub const DEFAULT_SPEAKER: &str = "af_bella";

/// Checkpoint passed as `{model}` unless configured otherwise
pub const DEFAULT_MODEL: &str = "kokoro-v1.0.onnx";

const VOICES: [&str; 28] = [
    "af_alloy", "af_aoede", "af_bella", "af_heart", "af_jessica", "af_kore", "af_nicole",
    "af_nova", "af_river", "af_sarah", "af_sky", "am_adam", "am_echo", "am_eric", "am_fenrir",
    "am_liam", "am_michael", "am_onyx", "am_puck", "am_santa", "bf_alice", "bf_emma",
    "bf_isabella", "bf_lily", "bm_daniel", "bm_fable", "bm_george", "bm_lewis",
];

static STYLES: Lazy<StyleTable> = Lazy::new(|| {
    StyleTable::new(
        StyleProfile::new(StyleId::Neutral, DEFAULT_SPEAKER)
            .with_speed(1.0)
            .with_description("Balanced, clear narration"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Enthusiastic, "af_nicole")
            .with_speed(1.15)
            .with_description("Bright, upbeat delivery at a lively pace"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Serious, "am_michael")
            .with_speed(0.9)
            .with_description("Measured, authoritative tone"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Contemplative, "bm_george")
            .with_speed(0.85)
            .with_description("Slow, reflective pacing"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Sad, "af_sarah")
            .with_speed(0.8)
            .with_description("Soft, subdued and unhurried"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Excited, "af_sky")
            .with_speed(1.25)
            .with_description("Fast, high-energy delivery"),
    )
    .with_profile(
        StyleProfile::new(StyleId::Angry, "am_onyx")
            .with_speed(1.1)
            .with_description("Forceful, clipped delivery"),
    )
});

static SPEAKERS: Lazy<SpeakerCatalog> = Lazy::new(|| {
    let speakers = VOICES.iter().map(|id| describe_voice(id)).collect();
    SpeakerCatalog::new(speakers, describe_voice(DEFAULT_SPEAKER))
});

/// Kokoro ids encode accent and gender: `af_` is American female, `bm_`
/// British male, and so on.
fn describe_voice(id: &str) -> Speaker {
    let mut prefix = id.chars();
    let accent = match prefix.next() {
        Some('a') => "American English",
        Some('b') => "British English",
        _ => "English",
    };
    let speaker = Speaker::new(id);

    match prefix.next() {
        Some('f') => speaker
            .with_description(&format!("{accent}, female"))
            .with_gender(Gender::Female),
        Some('m') => speaker
            .with_description(&format!("{accent}, male"))
            .with_gender(Gender::Male),
        _ => speaker.with_description(accent),
    }
}

/// Kokoro style table
#[must_use]
pub fn styles() -> &'static StyleTable {
    &STYLES
}

/// The 28 American and British English Kokoro voices
#[must_use]
pub fn speakers() -> &'static SpeakerCatalog {
    &SPEAKERS
}

/// `kokoro-tts` reading text from stdin and writing `{output}`
#[must_use]
pub fn default_backend() -> BackendConfig {
    BackendConfig {
        render: CommandLine::new(
            "kokoro-tts",
            &[
                "-",
                "{output}",
                "--voice",
                "{speaker}",
                "--speed",
                "{speed}",
                "--model",
                "{model}",
            ],
        ),
        preload: None,
    }
}

/// Rate-driven engine backed by Kokoro
#[derive(Debug, Clone)]
pub struct KokoroEngine {
    backend: CommandBackend,
    model: String,
}

impl KokoroEngine {
    /// Create an engine that launches Kokoro with `config`
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            backend: CommandBackend::new(config),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different model checkpoint
    #[must_use]
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Model checkpoint in use
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for KokoroEngine {
    fn default() -> Self {
        Self::new(default_backend())
    }
}

impl SpeechEngine for KokoroEngine {
    fn engine_id(&self) -> &str {
        ENGINE_ID
    }

    fn flavor(&self) -> EngineFlavor {
        EngineFlavor::SpeechRate
    }

    fn styles(&self) -> &StyleTable {
        styles()
    }

    fn speakers(&self) -> &SpeakerCatalog {
        speakers()
    }

    fn preload(&mut self) -> NarratorResult<()> {
        info!("Initializing Kokoro ({})", self.model);
        self.backend.preload()
    }

    fn synthesize(&self, request: &SynthesisRequest) -> NarratorResult<EngineOutput> {
        debug!(
            "Kokoro voice={} speed={:?} model={}",
            request.speaker, request.speed, self.model
        );

        let scratch = ScratchFile::beside(&request.output_path);
        self.backend.render(&RenderJob {
            text: &request.text,
            speaker: &request.speaker,
            speed: request.speed,
            model: Some(&self.model),
            output: scratch.path(),
        })?;

        std::fs::rename(scratch.path(), &request.output_path)?;
        Ok(EngineOutput::FileWritten)
    }

    fn cancel_handle(&self) -> Option<CancelHandle> {
        Some(self.backend.cancel_handle())
    }
}
