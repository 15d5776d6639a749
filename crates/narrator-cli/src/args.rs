//! Command line definitions for both front ends.

use clap::{Args, Parser};
use narrator_core::StyleId;
use std::path::PathBuf;

const STYLE_HELP: &str = "\
Emotional Styles:
  neutral        - Balanced, professional narration
  enthusiastic   - Excited, energetic delivery
  serious        - Authoritative, grave tone
  contemplative  - Thoughtful, reflective with pauses
  sad            - Melancholic, sorrowful
  excited        - Very energetic, joyful
  angry          - Intense, forceful with emphasis";

/// Arguments shared by every front end
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CommonArgs {
    /// Text to synthesize
    pub text: Option<String>,

    /// Output WAV file path
    pub output: Option<PathBuf>,

    /// Emotional style for narration
    #[arg(long, value_enum, default_value_t = StyleId::Neutral)]
    pub style: StyleId,

    /// List all available speakers and exit
    #[arg(long)]
    pub list_speakers: bool,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Configuration file (defaults to $NARRATOR_CONFIG, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Generate expressive documentary-style narration with Bark
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "bark-narrate", version)]
#[command(after_help = format!("{STYLE_HELP}\n\n\
Examples:
  bark-narrate \"Hello world\" hello.wav
  bark-narrate --style enthusiastic \"Amazing discovery!\" amazing.wav
  bark-narrate --style sad --speaker v2/en_speaker_3 \"I'm sorry\" sad.wav

Speakers v2/en_speaker_0 through v2/en_speaker_9 are available; see --list-speakers.
The first run downloads the Bark models (about 2 GB)."))]
pub struct BarkCli {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub common: CommonArgs,

    /// Custom speaker voice (e.g. v2/en_speaker_4)
    #[arg(long, value_name = "SPEAKER")]
    pub speaker: Option<String>,
}

/// Generate expressive narration with Kokoro
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "kokoro-narrate", version)]
#[command(after_help = format!("{STYLE_HELP}\n\n\
Examples:
  kokoro-narrate \"Hello world\" hello.wav
  kokoro-narrate --style contemplative \"What lies beyond?\" beyond.wav
  kokoro-narrate --model kokoro-v1.0.fp16.onnx \"Faster model\" fast.wav

Each style selects a voice and a speaking rate; see --list-speakers."))]
pub struct KokoroCli {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub common: CommonArgs,

    /// Model checkpoint to load (defaults to the configured model)
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definitions_are_valid() {
        BarkCli::command().debug_assert();
        KokoroCli::command().debug_assert();
    }

    #[test]
    fn test_bark_defaults() {
        let cli = BarkCli::try_parse_from(["bark-narrate", "Hello world", "hello.wav"]).unwrap();
        assert_eq!(cli.common.text.as_deref(), Some("Hello world"));
        assert_eq!(cli.common.output, Some(PathBuf::from("hello.wav")));
        assert_eq!(cli.common.style, StyleId::Neutral);
        assert_eq!(cli.speaker, None);
        assert!(!cli.common.force);
        assert!(!cli.common.list_speakers);
    }

    #[rstest]
    #[case("neutral", StyleId::Neutral)]
    #[case("enthusiastic", StyleId::Enthusiastic)]
    #[case("serious", StyleId::Serious)]
    #[case("contemplative", StyleId::Contemplative)]
    #[case("sad", StyleId::Sad)]
    #[case("excited", StyleId::Excited)]
    #[case("angry", StyleId::Angry)]
    fn test_style_values(#[case] name: &str, #[case] expected: StyleId) {
        let cli = KokoroCli::try_parse_from(["kokoro-narrate", "--style", name, "t", "o.wav"]).unwrap();
        assert_eq!(cli.common.style, expected);
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(BarkCli::try_parse_from(["bark-narrate", "--style", "whisper", "t", "o.wav"]).is_err());
    }

    #[test]
    fn test_flavor_specific_flags() {
        let cli = BarkCli::try_parse_from(["bark-narrate", "--speaker", "v2/en_speaker_4", "t", "o.wav"])
            .unwrap();
        assert_eq!(cli.speaker.as_deref(), Some("v2/en_speaker_4"));

        let cli = KokoroCli::try_parse_from(["kokoro-narrate", "--model", "m.onnx", "t", "o.wav"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("m.onnx"));

        assert!(BarkCli::try_parse_from(["bark-narrate", "--model", "m.onnx", "t", "o.wav"]).is_err());
        assert!(KokoroCli::try_parse_from(["kokoro-narrate", "--speaker", "af_sky", "t", "o.wav"]).is_err());
    }

    #[test]
    fn test_list_speakers_needs_no_positionals() {
        let cli = BarkCli::try_parse_from(["bark-narrate", "--list-speakers"]).unwrap();
        assert!(cli.common.list_speakers);
        assert_eq!(cli.common.text, None);
        assert_eq!(cli.common.output, None);
    }
}
