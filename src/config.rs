//! Show configuration.
//!
//! Everything is optional; a missing file or a missing key falls back to the
//! defaults below, which reproduce the stock show.
//!
//! ```toml
//! [window]
//! title = "Fireworks"
//! width = 1280
//! height = 720
//!
//! [particles]
//! spawn_probability = 0.04
//! fade_alpha = 0.2
//! burst_sound_delay_ms = 150
//! # max_particles = 20000
//! # seed = 42
//!
//! [audio]
//! enabled = true
//! sample_rate = 48000
//! volume = 1.0
//! start_suspended = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Simulation settings.
    pub particles: ParticleConfig,
    /// Sound settings.
    pub audio: AudioConfig,
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Fireworks".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Chance per tick of a spontaneous burst while not paused.
    pub spawn_probability: f64,
    /// Opacity of the destination-out fill that fades trails each tick.
    pub fade_alpha: f32,
    /// Delay between the launch cue and the burst cue.
    pub burst_sound_delay_ms: u64,
    /// Soft cap on live sparks. `None` means unbounded.
    pub max_particles: Option<usize>,
    /// Fixed RNG seed for a reproducible show.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.04,
            fade_alpha: 0.2,
            burst_sound_delay_ms: 150,
            max_particles: None,
            seed: None,
        }
    }
}

impl ParticleConfig {
    /// [`burst_sound_delay_ms`](Self::burst_sound_delay_ms) as a `Duration`.
    #[inline]
    pub fn burst_sound_delay(&self) -> Duration {
        Duration::from_millis(self.burst_sound_delay_ms)
    }
}

/// Sound settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Open an output device at all.
    pub enabled: bool,
    /// Preferred sample rate; the device may pick another.
    pub sample_rate: u32,
    /// Master volume when unmuted.
    pub volume: f32,
    /// Hold the stream until the first user gesture calls `resume()`.
    pub start_suspended: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_rate: 48_000,
            volume: 1.0,
            start_suspended: true,
        }
    }
}

impl ShowConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a configuration file, or the defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ShowConfig::from_toml("").unwrap();
        assert_eq!(config, ShowConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = ShowConfig::from_toml(
            r#"
            [particles]
            max_particles = 5000
            seed = 9

            [audio]
            volume = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.particles.max_particles, Some(5000));
        assert_eq!(config.particles.seed, Some(9));
        assert_eq!(config.particles.spawn_probability, 0.04);
        assert_eq!(config.particles.burst_sound_delay(), Duration::from_millis(150));
        assert_eq!(config.audio.volume, 0.5);
        assert!(config.audio.enabled);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(ShowConfig::from_toml("[particles]\nfade_alpha = \"lots\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = ShowConfig::load_or_default("definitely/not/here/fireworks.toml").unwrap();
        assert_eq!(config, ShowConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error_on_strict_load() {
        let err = ShowConfig::load("definitely/not/here/fireworks.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
