//! Shared run loop for the front ends.
//!
//! Each binary supplies a [`Frontend`]: its parsed arguments, its engine and
//! a few strings. Everything else, from config loading to the exit code,
//! happens here.

use crate::args::{BarkCli, CommonArgs, KokoroCli};
use crate::{logging, prompt, report};
use anyhow::{Context, Result};
use clap::Parser;
use narrator_core::engines::{bark, kokoro};
use narrator_core::{
    BarkEngine, KokoroEngine, NarratorConfig, NarratorError, SpeakerCatalog, SpeechEngine,
    StyleDispatcher,
};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long an interrupted engine call gets to stop and clean up
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// One command-line front end bound to one engine
pub trait Frontend: Parser + Send + 'static {
    /// Engine this front end drives
    type Engine: SpeechEngine + 'static;

    /// Engine name shown to the user
    const ENGINE_NAME: &'static str;

    /// Usage lines printed when positionals are missing
    const USAGE: &'static [&'static str];

    /// Lines printed after the speaker list
    const SPEAKER_HINTS: &'static [&'static str];

    /// Arguments shared by every front end
    fn common(&self) -> &CommonArgs;

    /// Speaker override from the command line
    fn speaker_override(&self) -> Option<&str>;

    /// Speakers accepted by the engine
    fn speakers() -> &'static SpeakerCatalog;

    /// Build the engine from configuration and arguments
    fn build_engine(&self, config: &NarratorConfig) -> Self::Engine;
}

impl Frontend for BarkCli {
    type Engine = BarkEngine;

    const ENGINE_NAME: &'static str = "Bark";

    const USAGE: &'static [&'static str] = &[
        "Usage: bark-narrate [--style STYLE] [--speaker SPEAKER] TEXT OUTPUT",
        "       bark-narrate --list-speakers",
    ];

    const SPEAKER_HINTS: &'static [&'static str] = &[
        "Note: Each speaker has unique voice characteristics.",
        "Test them with your content to find your preferred voice.",
        "",
        "Usage: bark-narrate --speaker <speaker_id> \"text\" output.wav",
    ];

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn speaker_override(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    fn speakers() -> &'static SpeakerCatalog {
        bark::speakers()
    }

    fn build_engine(&self, config: &NarratorConfig) -> BarkEngine {
        BarkEngine::new(config.bark_backend())
    }
}

impl Frontend for KokoroCli {
    type Engine = KokoroEngine;

    const ENGINE_NAME: &'static str = "Kokoro";

    const USAGE: &'static [&'static str] = &[
        "Usage: kokoro-narrate [--style STYLE] [--model NAME] TEXT OUTPUT",
        "       kokoro-narrate --list-speakers",
    ];

    const SPEAKER_HINTS: &'static [&'static str] = &[
        "Note: The voice follows the chosen --style; each style pairs a voice",
        "with a speaking rate. See --help for the list of styles.",
    ];

    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn speaker_override(&self) -> Option<&str> {
        None
    }

    fn speakers() -> &'static SpeakerCatalog {
        kokoro::speakers()
    }

    fn build_engine(&self, config: &NarratorConfig) -> KokoroEngine {
        let model = self.model.clone().unwrap_or_else(|| config.kokoro_model());
        KokoroEngine::new(config.kokoro_backend()).with_model(&model)
    }
}

/// Parse arguments, set up logging and run to an exit code
///
/// Argument errors exit with 1; `--help` and `--version` exit with 0.
#[must_use]
pub fn main_with<F: Frontend>() -> ExitCode {
    let cli = match F::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let failed = e.use_stderr();
            // Nothing sensible to do if the terminal is gone
            let _ = e.print();
            return if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    logging::setup_logging(cli.common().verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Fatal error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(cli));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    code
}

/// Run one invocation to completion
pub async fn run<F: Frontend>(cli: F) -> ExitCode {
    match execute(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\nFatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run one invocation; `Ok(false)` is a reported, non-fatal failure
///
/// # Errors
///
/// Returns an error for unexpected failures such as a broken config file
pub async fn execute<F: Frontend>(cli: F) -> Result<bool> {
    let common = cli.common().clone();
    let mut stdout = io::stdout();

    if common.list_speakers {
        report::print_speakers(&mut stdout, F::ENGINE_NAME, F::speakers(), F::SPEAKER_HINTS)?;
        return Ok(true);
    }

    let (Some(text), Some(output)) = (common.text.as_deref(), common.output.as_deref()) else {
        let err = NarratorError::missing_arguments("text and output arguments are required");
        eprintln!("Error: {err}");
        for line in F::USAGE {
            eprintln!("{line}");
        }
        return Ok(false);
    };

    let config = NarratorConfig::load(common.config.as_deref())
        .context("Failed to load configuration")?;
    let mut dispatcher = StyleDispatcher::new(cli.build_engine(&config));

    let request = match dispatcher.build_request(
        text,
        output,
        common.style.as_str(),
        cli.speaker_override(),
    ) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(false);
        }
    };

    if request.output_path.exists() && !common.force {
        let confirmed = prompt::confirm_overwrite(
            &mut io::stdin().lock(),
            &mut stdout,
            &request.output_path,
        )
        .context("Failed to read overwrite confirmation")?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(false);
        }
        debug!("Overwriting {}", request.output_path.display());
    }

    let profile = dispatcher.resolve(request.style.as_str()).clone();
    report::print_request(&mut stdout, F::ENGINE_NAME, &request, &profile)?;
    stdout.flush()?;

    let cancel = dispatcher.cancel_handle();
    let mut task = tokio::task::spawn_blocking(move || {
        dispatcher.preload();
        dispatcher.dispatch(&request)
    });

    tokio::select! {
        joined = &mut task => {
            let result = joined.context("Synthesis task failed")?;
            if result.success {
                report::print_success(&mut stdout, &result)?;
                Ok(true)
            } else {
                let reason = result
                    .error
                    .map_or_else(|| "unknown error".to_string(), |e| e.to_string());
                eprintln!("Error during synthesis: {reason}");
                Ok(false)
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupt received, stopping synthesis");
            if let Some(cancel) = cancel {
                cancel.cancel();
                // Let the worker kill the engine and remove its scratch file
                if tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err() {
                    warn!("Engine did not stop within {:?}", SHUTDOWN_GRACE);
                }
            }
            println!("\n\nInterrupted by user");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_catalogs() {
        assert_eq!(BarkCli::speakers().len(), 10);
        assert_eq!(KokoroCli::speakers().len(), 28);
    }

    #[test]
    fn test_hints_never_name_a_speaker() {
        for (hints, catalog) in [
            (BarkCli::SPEAKER_HINTS, BarkCli::speakers()),
            (KokoroCli::SPEAKER_HINTS, KokoroCli::speakers()),
        ] {
            for id in catalog.ids() {
                assert!(hints.iter().all(|hint| !hint.contains(id)), "{id}");
            }
        }
    }

    #[test]
    fn test_kokoro_model_precedence() {
        let config = NarratorConfig::from_toml_str("[kokoro]\nmodel = \"configured.onnx\"\n").unwrap();

        let cli = KokoroCli::try_parse_from(["kokoro-narrate", "t", "o.wav"]).unwrap();
        assert_eq!(cli.build_engine(&config).model(), "configured.onnx");

        let cli = KokoroCli::try_parse_from(["kokoro-narrate", "--model", "cli.onnx", "t", "o.wav"]).unwrap();
        assert_eq!(cli.build_engine(&config).model(), "cli.onnx");
    }

    #[tokio::test]
    async fn test_missing_arguments_fail() {
        let cli = BarkCli::try_parse_from(["bark-narrate", "only text"]).unwrap();
        assert!(!execute(cli).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_speakers_succeeds() {
        let cli = KokoroCli::try_parse_from(["kokoro-narrate", "--list-speakers"]).unwrap();
        assert!(execute(cli).await.unwrap());
    }
}
