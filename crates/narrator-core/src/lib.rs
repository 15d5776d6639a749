//! # Narrator Core
//!
//! Emotional-style narration on top of external neural TTS engines.
//!
//! A [`StyleDispatcher`] turns a (text, style, speaker) triple into one
//! synthesis call for a single [`SpeechEngine`]. Two engines ship with the
//! crate:
//!
//! - [`BarkEngine`] expresses style through prosody markers such as
//!   `[laughs]` wrapped around the text
//! - [`KokoroEngine`] expresses style through voice choice and speech rate
//!
//! Both run the actual model as a subprocess, see [`backend`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use narrator_core::{BarkEngine, NarratorConfig, StyleDispatcher};
//! use std::path::Path;
//!
//! let config = NarratorConfig::load(None)?;
//! let dispatcher = StyleDispatcher::new(BarkEngine::new(config.bark_backend()));
//!
//! let result = dispatcher.synthesize("Amazing discovery!", Path::new("amazing.wav"), "enthusiastic", None);
//! assert!(result.success);
//! # Ok::<(), narrator_core::NarratorError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod engines;
pub mod error;
pub mod output;
pub mod request;
pub mod speaker;
pub mod style;
pub mod warning;
pub mod wav;

// Re-export main types for convenience
pub use backend::{BackendConfig, CancelHandle, CommandBackend, CommandLine, RenderJob};
pub use config::NarratorConfig;
pub use dispatcher::StyleDispatcher;
pub use engine::{EngineFlavor, EngineOutput, SpeechEngine};
pub use engines::{BarkEngine, KokoroEngine};
pub use error::{NarratorError, NarratorResult};
pub use output::{normalize_output_path, OutputPathPolicy};
pub use request::{SynthesisRequest, SynthesisResult};
pub use speaker::{Gender, Speaker, SpeakerCatalog};
pub use style::{StyleId, StyleProfile, StyleTable};
pub use warning::DispatchWarning;
pub use wav::Waveform;

/// Version information for the narrator-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sample rate shared by the bundled engines (24 kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Characters of input text shown in status output
pub const TEXT_PREVIEW_CHARS: usize = 50;
