//! Per-invocation request and result types.

use crate::error::NarratorError;
use crate::style::StyleId;
use crate::warning::DispatchWarning;
use std::path::PathBuf;

/// One synthesis call, fully resolved against an engine's style table
///
/// Built by [`crate::StyleDispatcher::build_request`], consumed once by the
/// engine and dropped afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Text exactly as supplied by the caller
    pub raw_text: String,
    /// Text handed to the engine (decorated with prosody markers for
    /// marker-driven engines)
    pub text: String,
    /// WAV file to produce
    pub output_path: PathBuf,
    /// Style actually applied
    pub style: StyleId,
    /// Speaker override as supplied by the caller
    pub speaker_override: Option<String>,
    /// Speaker actually used
    pub speaker: String,
    /// Speech-rate multiplier for rate-driven engines
    pub speed: Option<f32>,
    /// Non-fatal conditions hit while building the request
    pub warnings: Vec<DispatchWarning>,
}

/// Outcome of one dispatch
///
/// Callers must check `success` before trusting `output_path`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Whether a WAV file was produced
    pub success: bool,
    /// Path that was (or would have been) written
    pub output_path: PathBuf,
    /// Size of the written file in bytes
    pub byte_size: u64,
    /// Audio length, when derivable from sample count and rate
    pub duration_seconds: Option<f64>,
    /// Sample rate of the written file, when known
    pub sample_rate: Option<u32>,
    /// Failure cause when `success` is false
    pub error: Option<NarratorError>,
}

impl SynthesisResult {
    /// Successful result
    #[must_use]
    pub fn succeeded(
        output_path: PathBuf,
        byte_size: u64,
        duration_seconds: Option<f64>,
        sample_rate: Option<u32>,
    ) -> Self {
        Self {
            success: true,
            output_path,
            byte_size,
            duration_seconds,
            sample_rate,
            error: None,
        }
    }

    /// Failed result carrying its cause
    #[must_use]
    pub fn failed(output_path: PathBuf, error: NarratorError) -> Self {
        Self {
            success: false,
            output_path,
            byte_size: 0,
            duration_seconds: None,
            sample_rate: None,
            error: Some(error),
        }
    }
}
