use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a fling does while a rotation animation is already playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlingPolicy {
    /// Keep the running clock; the fling is absorbed
    #[default]
    Ignore,
    /// Start a fresh clock on the next frame
    Restart,
}

/// Widget and host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Animation frames per second
    pub frame_rate: u32,
    /// Total length of a fling animation
    pub animation_duration_ms: u64,
    /// Rotation added to the needle transform on every animated frame
    pub rotation_step_degrees: f64,
    /// Intrinsic draw surface size, in viewport units
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Gap between the rose circle and the viewport edge
    pub circle_inset: f64,
    /// Gap between the cardinal glyphs and the viewport edge
    pub direction_spacing: f64,
    /// Measured width of a cardinal glyph
    pub glyph_width: f64,
    pub fling_policy: FlingPolicy,
    /// Movement below this distance is not a scroll
    pub touch_slop: f64,
    pub long_press_ms: u64,
    /// Release velocity, in viewport units per second, that counts as a fling
    pub min_fling_velocity: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            frame_rate: 100,
            animation_duration_ms: 10_000,
            rotation_step_degrees: 60.0,
            viewport_width: 200.0,
            viewport_height: 200.0,
            circle_inset: 10.0,
            direction_spacing: 6.0,
            glyph_width: 24.0,
            fling_policy: FlingPolicy::Ignore,
            touch_slop: 8.0,
            long_press_ms: 500,
            min_fling_velocity: 50.0,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from the default location
    ///
    /// A missing default file yields defaults; a missing explicit file is an error
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// The default config file path: `<config dir>/compass/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("compass").join("config.toml"))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            return Err(Self::reject("frame-rate must be between 1 and 1000"));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(Self::reject("viewport-width and viewport-height must be positive"));
        }
        Ok(())
    }

    fn reject(reason: &str) -> ConfigError {
        warn!("rejected config: {reason}");
        ConfigError::Invalid(reason.to_string())
    }

    /// Delay between animated frames: `1000 / frame_rate` milliseconds
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frame_rate.max(1)))
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_give_ten_millisecond_frames() {
        let config = Config::default();
        assert_eq!(config.frame_interval(), Duration::from_millis(10));
        assert_eq!(config.animation_duration(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "frame-rate = 50\nfling-policy = \"restart\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.frame_rate, 50);
        assert_eq!(config.fling_policy, FlingPolicy::Restart);
        assert_eq!(config.rotation_step_degrees, 60.0);
        assert_eq!(config.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "frame-rate = \"fast\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[rstest]
    #[case("frame-rate = 0")]
    #[case("frame-rate = 1001")]
    #[case("viewport-width = 0.0")]
    fn out_of_range_values_are_rejected(#[case] contents: &str) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{contents}").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn fastest_frame_rate_keeps_a_nonzero_interval() {
        let config = Config {
            frame_rate: 1000,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }
}
