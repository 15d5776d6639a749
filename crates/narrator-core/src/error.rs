//! Error types for the Narrator synthesis pipeline.

use std::path::PathBuf;

/// Result type alias for Narrator operations
pub type NarratorResult<T> = Result<T, NarratorError>;

/// Main error type for Narrator operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NarratorError {
    /// Input text was empty or whitespace only
    #[error("Input text is empty")]
    EmptyInput,

    /// The parent directory of the output file could not be created
    #[error("Failed to create output directory {}: {message}", path.display())]
    OutputDirectoryCreation {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying filesystem error
        message: String,
    },

    /// TTS synthesis failed
    #[error("TTS synthesis failed: {message}")]
    Synthesis {
        /// Error message describing the failure
        message: String,
    },

    /// Required command line arguments were not supplied
    #[error("Missing arguments: {message}")]
    MissingArguments {
        /// Which arguments were missing
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// External engine process failed
    #[error("Engine process '{program}' failed: {message}")]
    Backend {
        /// Program that was run
        program: String,
        /// Error message describing the failure
        message: String,
    },

    /// Audio format or processing error
    #[error("Audio processing error: {message}")]
    AudioProcessing {
        /// Error message describing the processing issue
        message: String,
    },

    /// File I/O error
    #[error("File I/O error: {message}")]
    File {
        /// Error message describing the file operation failure
        message: String,
    },

    /// Invalid input error
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message describing the invalid input
        message: String,
    },

    /// The engine process was stopped before it finished
    #[error("Interrupted before the engine finished")]
    Interrupted,
}

impl NarratorError {
    /// Create a new synthesis error
    #[must_use]
    pub fn synthesis<S: Into<String>>(message: S) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    /// Create a new output directory creation error
    #[must_use]
    pub fn output_directory<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::OutputDirectoryCreation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new missing arguments error
    #[must_use]
    pub fn missing_arguments<S: Into<String>>(message: S) -> Self {
        Self::MissingArguments {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new backend process error
    #[must_use]
    pub fn backend<P: Into<String>, S: Into<String>>(program: P, message: S) -> Self {
        Self::Backend {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create a new audio processing error
    #[must_use]
    pub fn audio_processing<S: Into<String>>(message: S) -> Self {
        Self::AudioProcessing {
            message: message.into(),
        }
    }

    /// Create a new file error
    #[must_use]
    pub fn file<S: Into<String>>(message: S) -> Self {
        Self::File {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    #[must_use]
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Collapse an engine-level failure into a [`NarratorError::Synthesis`],
    /// keeping the original message. Synthesis errors pass through unchanged.
    #[must_use]
    pub fn into_synthesis(self) -> Self {
        match self {
            Self::Synthesis { .. } => self,
            other => Self::synthesis(other.to_string()),
        }
    }

    /// Check if this error is due to invalid user input
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::MissingArguments { .. }
                | Self::InvalidInput { .. }
                | Self::Configuration { .. }
        )
    }

    /// Get the error category for logging
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::EmptyInput => "input",
            Self::OutputDirectoryCreation { .. } => "output_directory",
            Self::Synthesis { .. } => "synthesis",
            Self::MissingArguments { .. } => "arguments",
            Self::Configuration { .. } => "configuration",
            Self::Backend { .. } => "backend",
            Self::AudioProcessing { .. } => "audio_processing",
            Self::File { .. } => "file",
            Self::InvalidInput { .. } => "input",
            Self::Interrupted => "interrupted",
        }
    }
}

impl From<std::io::Error> for NarratorError {
    fn from(err: std::io::Error) -> Self {
        Self::file(err.to_string())
    }
}

impl From<hound::Error> for NarratorError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Self::file(io.to_string()),
            other => Self::audio_processing(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for NarratorError {
    fn from(err: toml::de::Error) -> Self {
        Self::configuration(format!("Invalid TOML: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(NarratorError::EmptyInput.to_string(), "Input text is empty");
        assert_eq!(
            NarratorError::synthesis("CUDA out of memory").to_string(),
            "TTS synthesis failed: CUDA out of memory"
        );
        let err = NarratorError::output_directory("/readonly/out", "Permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to create output directory /readonly/out: Permission denied"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(NarratorError::EmptyInput.category(), "input");
        assert_eq!(NarratorError::synthesis("test").category(), "synthesis");
        assert_eq!(NarratorError::output_directory("x", "y").category(), "output_directory");
        assert_eq!(NarratorError::missing_arguments("test").category(), "arguments");
        assert_eq!(NarratorError::configuration("test").category(), "configuration");
        assert_eq!(NarratorError::backend("python3", "test").category(), "backend");
        assert_eq!(NarratorError::audio_processing("test").category(), "audio_processing");
        assert_eq!(NarratorError::file("test").category(), "file");
        assert_eq!(NarratorError::invalid_input("test").category(), "input");
        assert_eq!(NarratorError::Interrupted.category(), "interrupted");
    }

    #[test]
    fn test_user_errors() {
        assert!(NarratorError::EmptyInput.is_user_error());
        assert!(NarratorError::missing_arguments("text").is_user_error());
        assert!(NarratorError::configuration("bad").is_user_error());
        assert!(!NarratorError::synthesis("test").is_user_error());
        assert!(!NarratorError::backend("kokoro-tts", "exit 1").is_user_error());
    }

    #[test]
    fn test_into_synthesis_preserves_message() {
        let err = NarratorError::backend("python3", "No module named 'bark'").into_synthesis();
        assert_eq!(
            err,
            NarratorError::synthesis("Engine process 'python3' failed: No module named 'bark'")
        );

        let already = NarratorError::synthesis("model crashed");
        assert_eq!(already.clone().into_synthesis(), already);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = NarratorError::from(io_err);
        assert!(matches!(err, NarratorError::File { .. }));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("not = [valid").unwrap_err();
        let err = NarratorError::from(toml_err);
        assert!(matches!(err, NarratorError::Configuration { .. }));
    }

    #[test]
    fn test_error_clone_and_equality() {
        let err1 = NarratorError::synthesis("test message");
        let err2 = err1.clone();
        let err3 = NarratorError::synthesis("different message");

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
