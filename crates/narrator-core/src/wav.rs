//! WAV reading and writing on top of `hound`.

use crate::error::{NarratorError, NarratorResult};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::{debug, info, warn};

/// Mono audio returned by waveform-producing engines
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// 32-bit floating point samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    /// Create a new waveform
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length in seconds, derived from sample count and rate
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the waveform holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Validate waveform contents
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, the sample rate is zero, or
    /// a sample is not finite
    pub fn validate(&self) -> NarratorResult<()> {
        if self.samples.is_empty() {
            return Err(NarratorError::invalid_input("Audio data cannot be empty"));
        }

        if self.sample_rate == 0 {
            return Err(NarratorError::invalid_input("Sample rate must be greater than 0"));
        }

        let mut clipped = 0usize;
        for (i, &sample) in self.samples.iter().enumerate() {
            if !sample.is_finite() {
                return Err(NarratorError::invalid_input(format!(
                    "Invalid audio sample at index {i}: {sample}"
                )));
            }
            if sample.abs() > 1.0 {
                clipped += 1;
            }
        }

        if clipped > 0 {
            warn!("{} audio samples exceed range [-1.0, 1.0]", clipped);
        }

        Ok(())
    }
}

/// Header facts about a WAV file on disk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Samples per channel
    pub frames: u32,
    /// Length in seconds
    pub duration_seconds: f64,
}

/// Write `waveform` to `path` as a mono 32-bit float WAV
///
/// # Errors
///
/// Returns an error if the waveform is invalid or the file cannot be written
pub fn write_waveform(path: &Path, waveform: &Waveform) -> NarratorResult<()> {
    waveform.validate()?;

    info!(
        "Writing {} samples to {}",
        waveform.len(),
        path.display()
    );

    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| NarratorError::file(format!("Failed to create WAV file: {e}")))?;
    for &sample in &waveform.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Read a WAV file into a mono waveform
///
/// Integer formats are scaled to [-1.0, 1.0]; multi-channel audio is
/// averaged down to one channel.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn read_waveform(path: &Path) -> NarratorResult<Waveform> {
    let mut reader = WavReader::open(path)
        .map_err(|e| NarratorError::audio_processing(format!(
            "Failed to open WAV {}: {e}",
            path.display()
        )))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 2f32.powi(i32::from(spec.bits_per_sample) - 1);
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    debug!(
        "Read {} samples at {} Hz from {}",
        samples.len(),
        spec.sample_rate,
        path.display()
    );

    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Inspect the header of an existing WAV file
///
/// # Errors
///
/// Returns an error if the file is not a readable WAV
pub fn probe(path: &Path) -> NarratorResult<WavInfo> {
    let reader = WavReader::open(path)
        .map_err(|e| NarratorError::audio_processing(format!(
            "Failed to open WAV {}: {e}",
            path.display()
        )))?;
    let spec = reader.spec();
    let frames = reader.duration();

    let duration_seconds = if spec.sample_rate == 0 {
        0.0
    } else {
        f64::from(frames) / f64::from(spec.sample_rate)
    };

    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        frames,
        duration_seconds,
    })
}
