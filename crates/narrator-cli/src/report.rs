//! Human-readable status output on stdout.

use narrator_core::{SpeakerCatalog, StyleProfile, SynthesisRequest, SynthesisResult, TEXT_PREVIEW_CHARS};
use std::io::{self, Write};

/// First [`TEXT_PREVIEW_CHARS`] characters of `text`, with `...` when cut
#[must_use]
pub fn text_preview(text: &str) -> String {
    let mut chars = text.chars();
    let preview: String = chars.by_ref().take(TEXT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Format `value` with `,` between groups of three digits
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Print the speaker catalog, one id per line
///
/// # Errors
///
/// Returns an error if writing fails
pub fn print_speakers<W: Write>(
    out: &mut W,
    engine_name: &str,
    catalog: &SpeakerCatalog,
    hints: &[&str],
) -> io::Result<()> {
    writeln!(out, "\nAvailable {engine_name} Speakers:\n")?;
    for speaker in catalog.iter() {
        let default = if catalog.is_default(&speaker.id) { " (default)" } else { "" };
        if speaker.description.is_empty() {
            writeln!(out, "  {}{default}", speaker.id)?;
        } else {
            writeln!(out, "  {:<18} {}{default}", speaker.id, speaker.description)?;
        }
    }

    writeln!(out)?;
    for hint in hints {
        writeln!(out, "{hint}")?;
    }
    Ok(())
}

/// Print what is about to be synthesized
///
/// # Errors
///
/// Returns an error if writing fails
pub fn print_request<W: Write>(
    out: &mut W,
    engine_name: &str,
    request: &SynthesisRequest,
    profile: &StyleProfile,
) -> io::Result<()> {
    writeln!(out, "\nGenerating expressive speech with {engine_name}...")?;
    writeln!(out, "  Text: '{}'", text_preview(&request.raw_text))?;
    writeln!(out, "  Style: {} ({})", request.style, profile.description)?;
    writeln!(out, "  Speaker: {}", request.speaker)?;
    if let Some(speed) = request.speed {
        writeln!(out, "  Speed: {speed:.2}x")?;
    }
    writeln!(out, "  Output: {}", request.output_path.display())?;
    writeln!(out, "  Processing... (this may take a while)")?;
    Ok(())
}

/// Print the outcome of a successful synthesis
///
/// # Errors
///
/// Returns an error if writing fails
pub fn print_success<W: Write>(out: &mut W, result: &SynthesisResult) -> io::Result<()> {
    writeln!(out, "\nSuccess! Generated expressive audio")?;
    writeln!(out, "  Saved to: {}", result.output_path.display())?;
    writeln!(out, "  Size: {} bytes", group_thousands(result.byte_size))?;
    if let Some(duration) = result.duration_seconds {
        writeln!(out, "  Duration: {duration:.1} seconds")?;
    }
    if let Some(sample_rate) = result.sample_rate {
        writeln!(out, "  Sample Rate: {sample_rate} Hz")?;
    }
    Ok(())
}
