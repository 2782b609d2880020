//! Configuration loading.
//!
//! Loads `config.toml` from `$MOMENTUM_CONFIG_PATH`, an explicit path, or
//! `~/.momentum/config.toml`. A missing file yields defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::coaching::mode::SubstanceThreshold;
use crate::coaching::validator::ResponseValidator;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Coaching engine tuning.
    pub coaching: CoachingConfig,
    /// Extra reply policy terms.
    pub validator: ValidatorConfig,
    /// Daily plan defaults.
    pub daily: DailyConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rotating JSON logs; console-only when unset.
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_dir: None,
        }
    }
}

/// Coaching engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct CoachingConfig {
    /// Minimum words for a CLARIFY answer to advance to REFLECT.
    #[serde(default = "default_min_words")]
    pub substantive_min_words: usize,

    /// Minimum characters for a CLARIFY answer to advance to REFLECT.
    #[serde(default = "default_min_chars")]
    pub substantive_min_chars: usize,
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            substantive_min_words: default_min_words(),
            substantive_min_chars: default_min_chars(),
        }
    }
}

impl CoachingConfig {
    /// The CLARIFY -> REFLECT threshold described by this config.
    pub fn threshold(&self) -> SubstanceThreshold {
        SubstanceThreshold {
            min_words: self.substantive_min_words,
            min_chars: self.substantive_min_chars,
        }
    }
}

/// Terms appended to the built-in reply policy lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidatorConfig {
    /// Extra banned words.
    #[serde(default)]
    pub extra_banned_words: Vec<String>,

    /// Extra urgency phrases, matched literally.
    #[serde(default)]
    pub extra_urgency_phrases: Vec<String>,
}

impl ValidatorConfig {
    /// Build a validator carrying the configured extras.
    pub fn build(&self) -> ResponseValidator {
        ResponseValidator::new(&self.extra_banned_words, &self.extra_urgency_phrases)
    }
}

/// Daily plan defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyConfig {
    /// Build plans with a single supporting action by default.
    #[serde(default)]
    pub reduced_load: bool,
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_owned()
}
fn default_min_words() -> usize {
    4
}
fn default_min_chars() -> usize {
    20
}

impl Config {
    /// Load configuration with env overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or if
    /// the home directory cannot be resolved when no path is given.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Load configuration using a custom env resolver (for testing).
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = match (explicit, env("MOMENTUM_CONFIG_PATH")) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => config_dir()?.join("config.toml"),
        };
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("failed to parse config at {}", path.display()))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "failed to read config at {}: {e}",
                    path.display()
                ))
            }
        };
        config.apply_overrides(env);
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("MOMENTUM_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env("MOMENTUM_LOGS_DIR") {
            self.logging.logs_dir = Some(PathBuf::from(v));
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }
}

/// Resolve the default config directory (`~/.momentum/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".momentum"))
}
