//! Subprocess bridge to the external TTS engine.
//!
//! The neural model runs in its own process. A backend is a program plus an
//! argument template; placeholders in the template are filled per call:
//!
//! | placeholder     | value                                   |
//! |-----------------|-----------------------------------------|
//! | `{text}`        | text to speak                           |
//! | `{speaker}`     | speaker reference                       |
//! | `{speed}`       | speech-rate multiplier (`1.00` default) |
//! | `{model}`       | model checkpoint name                   |
//! | `{output}`      | WAV path the engine must write          |
//! | `{output_dir}`  | directory part of `{output}`            |
//! | `{output_name}` | file name part of `{output}`            |
//!
//! When no argument mentions `{text}` the text is piped on stdin instead.

use crate::error::{NarratorError, NarratorResult};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

const STDERR_TAIL_LINES: usize = 3;

/// How often a running engine is checked for exit or cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A program and its argument template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// Executable name or path
    pub program: String,
    /// Arguments, possibly containing placeholders
    pub args: Vec<String>,
}

impl CommandLine {
    /// Create a command line from a program and literal arguments
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    /// Arguments with every placeholder filled from `job`
    #[must_use]
    pub fn expand(&self, job: &RenderJob<'_>) -> Vec<String> {
        self.args.iter().map(|arg| job.substitute(arg)).collect()
    }

    fn mentions(&self, placeholder: &str) -> bool {
        self.args.iter().any(|arg| arg.contains(placeholder))
    }
}

/// Launch configuration for one external engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Command that renders one utterance to a WAV file
    pub render: CommandLine,
    /// Optional command that downloads or warms up the model
    pub preload: Option<CommandLine>,
}

/// Values substituted into a render command
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    /// Text to speak
    pub text: &'a str,
    /// Speaker reference
    pub speaker: &'a str,
    /// Speech-rate multiplier
    pub speed: Option<f32>,
    /// Model checkpoint name
    pub model: Option<&'a str>,
    /// WAV file the engine must produce
    pub output: &'a Path,
}

impl RenderJob<'_> {
    fn value(&self, placeholder: &str) -> Option<String> {
        let value = match placeholder {
            "text" => self.text.to_string(),
            "speaker" => self.speaker.to_string(),
            "speed" => format!("{:.2}", self.speed.unwrap_or(1.0)),
            "model" => self.model.unwrap_or_default().to_string(),
            "output" => self.output.display().to_string(),
            "output_dir" => match self.output.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
                _ => ".".to_string(),
            },
            "output_name" => self
                .output
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    /// Single pass, so braces inside substituted values stay literal
    fn substitute(&self, arg: &str) -> String {
        let mut rendered = String::with_capacity(arg.len());
        let mut rest = arg;

        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let tail = &rest[start..];
            let expansion = tail
                .find('}')
                .and_then(|end| self.value(&tail[1..end]).map(|value| (end, value)));

            match expansion {
                Some((end, value)) => {
                    rendered.push_str(&value);
                    rest = &tail[end + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = &tail[1..];
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }
}

/// Stops the engine process of a running or future backend call
///
/// Clones share one flag. Once cancelled, the running child is killed and
/// every later call fails with [`NarratorError::Interrupted`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request that the engine process stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [`CancelHandle::cancel`] has been called
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs an external engine as a child process
#[derive(Debug, Clone)]
pub struct CommandBackend {
    config: BackendConfig,
    cancel: CancelHandle,
}

impl CommandBackend {
    /// Create a backend from its launch configuration
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            cancel: CancelHandle::default(),
        }
    }

    /// Launch configuration in use
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Handle that stops this backend's engine process
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run the preload command, if one is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started, exits non-zero or
    /// is cancelled
    pub fn preload(&self) -> NarratorResult<()> {
        let Some(preload) = &self.config.preload else {
            debug!("No preload command configured for '{}'", self.config.render.program);
            return Ok(());
        };

        info!("Preloading models with '{}'", preload.program);
        let mut command = Command::new(&preload.program);
        command.args(&preload.args);
        let output = self.run(&preload.program, &mut command, None)?;

        check_status(&preload.program, &output)
    }

    /// Render one utterance; on success `job.output` exists
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started, exits non-zero,
    /// exits without writing the output file or is cancelled
    pub fn render(&self, job: &RenderJob<'_>) -> NarratorResult<()> {
        let render = &self.config.render;
        let args = render.expand(job);
        let stdin_text = (!render.mentions("{text}")).then_some(job.text);

        debug!("Running {} {:?}", render.program, args);

        let mut command = Command::new(&render.program);
        command.args(&args);
        let output = self.run(&render.program, &mut command, stdin_text)?;

        if !output.stdout.is_empty() {
            debug!(
                "{} stdout: {}",
                render.program,
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }

        check_status(&render.program, &output)?;

        if !job.output.exists() {
            return Err(NarratorError::backend(
                &render.program,
                format!("exited successfully but did not write {}", job.output.display()),
            ));
        }

        Ok(())
    }

    /// Spawn `command` and wait for it, killing it if cancelled
    fn run(
        &self,
        program: &str,
        command: &mut Command,
        stdin_text: Option<&str>,
    ) -> NarratorResult<Output> {
        if self.cancel.is_cancelled() {
            return Err(NarratorError::Interrupted);
        }

        let mut child = command
            .stdin(if stdin_text.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(program, &e))?;

        // Pipes are serviced on their own threads so a chatty child cannot
        // block against a full buffer while we poll it.
        let feeder = child.stdin.take().zip(stdin_text).map(|(mut stdin, text)| {
            let text = text.to_string();
            thread::spawn(move || stdin.write_all(text.as_bytes()))
        });
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = self.wait(program, &mut child)?;

        if let Some(feeder) = feeder {
            match feeder.join() {
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("'{}' exited without reading stdin", program);
                }
                Ok(Err(e)) => {
                    return Err(NarratorError::backend(
                        program,
                        format!("failed to write text to stdin: {e}"),
                    ));
                }
                Ok(Ok(())) | Err(_) => {}
            }
        }

        Ok(Output {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }

    fn wait(&self, program: &str, child: &mut Child) -> NarratorResult<ExitStatus> {
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| NarratorError::backend(program, format!("wait failed: {e}")))?
            {
                return Ok(status);
            }

            if self.cancel.is_cancelled() {
                info!("Stopping '{}'", program);
                if let Err(e) = child.kill() {
                    warn!("Failed to stop '{}': {}", program, e);
                }
                if let Err(e) = child.wait() {
                    debug!("Failed to reap '{}': {}", program, e);
                }
                return Err(NarratorError::Interrupted);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buffer) {
            debug!("Engine pipe closed early: {}", e);
        }
        buffer
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn spawn_error(program: &str, err: &std::io::Error) -> NarratorError {
    if err.kind() == std::io::ErrorKind::NotFound {
        NarratorError::backend(program, "program not found; is the engine installed and on PATH?")
    } else {
        NarratorError::backend(program, format!("failed to start: {err}"))
    }
}

fn check_status(program: &str, output: &Output) -> NarratorResult<()> {
    if output.status.success() {
        return Ok(());
    }

    let tail = stderr_tail(&output.stderr);
    let message = if tail.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {tail}", output.status)
    };
    Err(NarratorError::backend(program, message))
}

/// Last few meaningful stderr lines; progress bars redraw with `\r`
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job<'a>(output: &'a Path) -> RenderJob<'a> {
        RenderJob {
            text: "Hello world",
            speaker: "v2/en_speaker_6",
            speed: Some(1.15),
            model: Some("kokoro-v1.0.onnx"),
            output,
        }
    }

    #[test]
    fn test_substitute_placeholders() {
        let output = PathBuf::from("out/story.wav");
        let job = job(&output);

        assert_eq!(job.substitute("{text}"), "Hello world");
        assert_eq!(job.substitute("--history_prompt={speaker}"), "--history_prompt=v2/en_speaker_6");
        assert_eq!(job.substitute("{speed}"), "1.15");
        assert_eq!(job.substitute("{model}"), "kokoro-v1.0.onnx");
        assert_eq!(job.substitute("{output}"), "out/story.wav");
        assert_eq!(job.substitute("{output_dir}"), "out");
        assert_eq!(job.substitute("{output_name}"), "story.wav");
        assert_eq!(job.substitute("plain"), "plain");
    }

    #[test]
    fn test_substitute_defaults() {
        let output = PathBuf::from("story.wav");
        let job = RenderJob {
            speed: None,
            model: None,
            ..job(&output)
        };
        assert_eq!(job.substitute("{speed}"), "1.00");
        assert_eq!(job.substitute("{model}"), "");
        assert_eq!(job.substitute("{output_dir}"), ".");
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let output = PathBuf::from("out/story.wav");
        let job = RenderJob {
            text: "say {speaker} and {unknown}",
            ..job(&output)
        };
        assert_eq!(job.substitute("{text}"), "say {speaker} and {unknown}");
        assert_eq!(job.substitute("{output_dir}/{output_name}"), "out/story.wav");
        assert_eq!(job.substitute("{json: {speed}}"), "{json: 1.15}");
        assert_eq!(job.substitute("dangling {"), "dangling {");
    }

    #[test]
    fn test_stderr_tail() {
        let stderr = b"loading\n  10%|#   \r 50%|#####  \r100%|##########\nTraceback\nRuntimeError: boom\n";
        assert_eq!(stderr_tail(stderr), "100%|########## | Traceback | RuntimeError: boom");
        assert_eq!(stderr_tail(b""), "");
    }

    #[test]
    fn test_command_line_mentions() {
        let cmd = CommandLine::new("python3", &["-m", "bark", "--text", "{text}"]);
        assert!(cmd.mentions("{text}"));
        assert!(!cmd.mentions("{speed}"));
    }

    #[test]
    fn test_preload_without_command_is_ok() {
        let backend = CommandBackend::new(BackendConfig {
            render: CommandLine::new("true", &[]),
            preload: None,
        });
        assert!(backend.preload().is_ok());
    }

    #[test]
    fn test_missing_program_reports_not_found() {
        let backend = CommandBackend::new(BackendConfig {
            render: CommandLine::new("narrator-no-such-engine-binary", &[]),
            preload: None,
        });
        let output = PathBuf::from("never.wav");
        let err = backend.render(&job(&output)).unwrap_err();
        assert_eq!(
            err,
            NarratorError::backend(
                "narrator-no-such-engine-binary",
                "program not found; is the engine installed and on PATH?"
            )
        );
    }
    #[test]
    fn test_expand_keeps_leading_dash_text_in_one_argument() {
        let output = PathBuf::from("out/story.wav");
        let job = RenderJob {
            text: "-5 degrees tonight",
            ..job(&output)
        };
        let cmd = CommandLine::new("python3", &["-m", "bark", "--text={text}"]);
        assert_eq!(cmd.expand(&job), ["-m", "bark", "--text=-5 degrees tonight"]);
    }

    #[test]
    fn test_cancelled_backend_does_not_spawn() {
        let backend = CommandBackend::new(BackendConfig {
            render: CommandLine::new("narrator-no-such-engine-binary", &[]),
            preload: Some(CommandLine::new("narrator-no-such-engine-binary", &[])),
        });
        let handle = backend.cancel_handle();
        assert!(!handle.is_cancelled());

        handle.cancel();
        assert!(backend.cancel_handle().is_cancelled());

        let output = PathBuf::from("never.wav");
        assert_eq!(backend.render(&job(&output)), Err(NarratorError::Interrupted));
        assert_eq!(backend.preload(), Err(NarratorError::Interrupted));
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_stops_running_engine() {
        use std::time::Instant;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let output = temp_dir.path().join("story.wav");
        let backend = CommandBackend::new(BackendConfig {
            render: CommandLine::new("sh", &["-c", "exec sleep 30", "sh", "{output}"]),
            preload: None,
        });

        let handle = backend.cancel_handle();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            handle.cancel();
        });

        let started = Instant::now();
        let result = backend.render(&job(&output));
        canceller.join().unwrap();

        assert_eq!(result, Err(NarratorError::Interrupted));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!output.exists());
    }
}
