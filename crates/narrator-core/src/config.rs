//! TOML configuration for the external engines.
//!
//! Lookup order: an explicit path, then `$NARRATOR_CONFIG`, then
//! `narrator.toml` in the platform config directory. When none of these
//! exist the built-in defaults are used. Every field is optional:
//!
//! ```toml
//! [bark]
//! program = "python3.11"
//! preload = ["python3", "-c", "from bark import preload_models; preload_models()"]
//!
//! [kokoro]
//! args = ["-", "{output}", "--voice", "{speaker}", "--speed", "{speed}"]
//! model = "kokoro-v1.0.fp16.onnx"
//! preload = []            # empty disables preloading
//! ```

use crate::backend::{BackendConfig, CommandLine};
use crate::engines::{bark, kokoro};
use crate::error::{NarratorError, NarratorResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "NARRATOR_CONFIG";

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "narrator.toml";

/// Overrides for one backend command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// Executable that renders speech
    pub program: Option<String>,
    /// Argument template for `program`
    pub args: Option<Vec<String>>,
    /// Preload command as `[program, args...]`; empty disables preloading
    pub preload: Option<Vec<String>>,
}

impl BackendSection {
    /// Layer these overrides on top of `defaults`
    #[must_use]
    pub fn apply(&self, defaults: BackendConfig) -> BackendConfig {
        let BackendConfig {
            mut render,
            mut preload,
        } = defaults;

        if let Some(program) = &self.program {
            render.program.clone_from(program);
        }
        if let Some(args) = &self.args {
            render.args.clone_from(args);
        }
        if let Some(command) = &self.preload {
            preload = command.split_first().map(|(program, args)| CommandLine {
                program: program.clone(),
                args: args.to_vec(),
            });
        }

        BackendConfig { render, preload }
    }
}

/// Overrides for the Kokoro engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KokoroSection {
    /// Backend command overrides
    #[serde(flatten)]
    pub backend: BackendSection,
    /// Model checkpoint used when `--model` is not given
    pub model: Option<String>,
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Bark engine settings
    pub bark: BackendSection,
    /// Kokoro engine settings
    pub kokoro: KokoroSection,
}

impl NarratorConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TOML is malformed
    pub fn from_toml_str(content: &str) -> NarratorResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read configuration from a file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing, unreadable or
    /// malformed
    pub fn from_file(path: &Path) -> NarratorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NarratorError::configuration(format!(
                "Cannot read config file {}: {e}",
                path.display()
            ))
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Locate and load configuration
    ///
    /// `explicit` and `$NARRATOR_CONFIG` must name an existing file. The
    /// platform default location is optional.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required file is missing or any
    /// file found is malformed
    pub fn load(explicit: Option<&Path>) -> NarratorResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
            debug!("Using config from ${}", CONFIG_ENV_VAR);
            return Self::from_file(Path::new(&path));
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Resolved Bark backend command
    #[must_use]
    pub fn bark_backend(&self) -> BackendConfig {
        self.bark.apply(bark::default_backend())
    }

    /// Resolved Kokoro backend command
    #[must_use]
    pub fn kokoro_backend(&self) -> BackendConfig {
        self.kokoro.backend.apply(kokoro::default_backend())
    }

    /// Kokoro checkpoint used when none is given on the command line
    #[must_use]
    pub fn kokoro_model(&self) -> String {
        self.kokoro
            .model
            .clone()
            .unwrap_or_else(|| kokoro::DEFAULT_MODEL.to_string())
    }
}

/// `narrator.toml` inside the platform config directory
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("io", "Narrator", "narrator")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NarratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, NarratorConfig::default());
        assert_eq!(config.bark_backend(), bark::default_backend());
        assert_eq!(config.kokoro_backend(), kokoro::default_backend());
        assert_eq!(config.kokoro_model(), kokoro::DEFAULT_MODEL);
    }

    #[test]
    fn test_partial_override_keeps_other_fields() {
        let config = NarratorConfig::from_toml_str(
            r#"
            [bark]
            program = "python3.11"

            [kokoro]
            model = "kokoro-v1.0.fp16.onnx"
            "#,
        )
        .unwrap();

        let bark = config.bark_backend();
        assert_eq!(bark.render.program, "python3.11");
        assert_eq!(bark.render.args, bark::default_backend().render.args);
        assert_eq!(bark.preload, None);

        assert_eq!(config.kokoro_model(), "kokoro-v1.0.fp16.onnx");
        assert_eq!(config.kokoro_backend(), kokoro::default_backend());
    }

    #[test]
    fn test_preload_override_and_disable() {
        let config = NarratorConfig::from_toml_str(
            r#"
            [bark]
            preload = ["bark-warmup", "--all"]

            [kokoro]
            preload = []
            "#,
        )
        .unwrap();

        assert_eq!(
            config.bark_backend().preload,
            Some(CommandLine::new("bark-warmup", &["--all"]))
        );
        assert_eq!(config.kokoro_backend().preload, None);
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let err = NarratorConfig::from_toml_str("[bark\nprogram = 1").unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.toml");
        let err = NarratorConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, NarratorError::Configuration { .. }));
    }

    #[test]
    fn test_explicit_file_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("narrator.toml");
        std::fs::write(&path, "[kokoro]\nmodel = \"custom.onnx\"\n").unwrap();

        let config = NarratorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.kokoro_model(), "custom.onnx");
    }

    #[test]
    #[serial]
    fn test_env_var_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("env.toml");
        std::fs::write(&path, "[bark]\nprogram = \"from-env\"\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, &path);
        let config = NarratorConfig::load(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(config.unwrap().bark_backend().render.program, "from-env");
    }

    #[test]
    #[serial]
    fn test_env_var_missing_file_is_error() {
        std::env::set_var(CONFIG_ENV_VAR, "/nonexistent/narrator/config.toml");
        let result = NarratorConfig::load(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_explicit_path_wins_over_env() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("explicit.toml");
        std::fs::write(&path, "[bark]\nprogram = \"explicit\"\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, "/nonexistent/narrator/config.toml");
        let config = NarratorConfig::load(Some(&path));
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(config.unwrap().bark_backend().render.program, "explicit");
    }
}
