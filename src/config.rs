//! Configuration loader for the game.
//!
//! * Looks for `invaders.toml` in the cwd unless overridden by `--config`.
//! * Provides defaults so the default file is optional; an explicitly named
//!   file must exist.
//!
//! Extend this struct whenever you add new tunables.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::entities::Rules;

pub const DEFAULT_CONFIG_PATH: &str = "invaders.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Desired frame-rate cap.
    pub fps: u32,
    /// Seed for the spawn/fire generator; random when absent.
    pub seed: Option<u64>,
    /// Sprite sheet replacing the built-in glyphs.
    pub sprites: Option<PathBuf>,
    /// Where log output goes while the game owns the terminal.
    pub log_file: Option<PathBuf>,
    pub rules: Rules,
    /// File the settings came from; `None` when running on defaults.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            seed: None,
            sprites: None,
            log_file: None,
            rules: Rules::default(),
            loaded_from: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.  Without an explicit path a missing default
    /// file falls back to defaults; parse and validation errors always fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (p, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        match fs::read_to_string(&p) {
            Ok(text) => {
                let mut config = Self::from_toml_str(&text)?;
                config.loaded_from = Some(p);
                Ok(config)
            }
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path: p, source }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=240).contains(&self.fps) {
            return Err(ConfigError::Invalid(format!(
                "fps must be within 1..=240, got {}",
                self.fps
            )));
        }
        if self.rules.initial_lives == 0 {
            return Err(ConfigError::Invalid("initial_lives must be at least 1".into()));
        }
        let chances = [
            ("ufo_spawn_chance", self.rules.ufo_spawn_chance),
            ("enemy_fire_base", self.rules.enemy_fire_base),
            ("enemy_fire_per_level", self.rules.enemy_fire_per_level),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a probability in [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
