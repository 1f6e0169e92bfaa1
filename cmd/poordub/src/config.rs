//! Configuration for the CLI.
//!
//! Stored in ~/.poordub/config.yaml. Every field is optional:
//!
//! ```yaml
//! params:
//!   channels: 1
//!   sample_width: 2
//!   frame_rate: 44100
//! tone_frequency: 440.0
//! frames_per_buffer: 1024
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use poordub_audio::Params;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".poordub";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout of generated and recorded audio.
    pub params: Params,

    /// Frequency of generated tones in Hz.
    pub tone_frequency: f64,

    /// Frames buffered between the audio device and blocking calls.
    pub frames_per_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            params: Params::default(),
            tone_frequency: 440.0,
            frames_per_buffer: 1024,
        }
    }
}

impl Config {
    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(DEFAULT_CONFIG_FILE))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(self.tone_frequency.is_finite() && self.tone_frequency > 0.0) {
            anyhow::bail!("tone_frequency must be positive, got {}", self.tone_frequency);
        }
        if self.frames_per_buffer == 0 {
            anyhow::bail!("frames_per_buffer must be at least 1");
        }
        Ok(())
    }
}

/// Loads the configuration.
///
/// An explicit `custom_path` must exist. A missing default config file
/// yields the defaults.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => match Config::default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("no config file, using defaults");
                return Ok(Config::default());
            }
        },
    };
    read_config(&config_path)
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), params = %cfg.params, "config loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn load(file: &NamedTempFile) -> anyhow::Result<Config> {
        load_config(Some(file.path().to_str().unwrap()))
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            "params:\n  channels: 2\n  sample_width: 2\n  frame_rate: 48000\ntone_frequency: 880.0\nframes_per_buffer: 256\n",
        );
        let cfg = load(&file).unwrap();
        assert_eq!(cfg.params, Params::STEREO_48K);
        assert_eq!(cfg.tone_frequency, 880.0);
        assert_eq!(cfg.frames_per_buffer, 256);
    }

    #[test]
    fn test_load_partial_config() {
        let file = write_config("tone_frequency: 1000\n");
        let cfg = load(&file).unwrap();
        assert_eq!(cfg.params, Params::default());
        assert_eq!(cfg.tone_frequency, 1000.0);
        assert_eq!(cfg.frames_per_buffer, 1024);
    }

    #[test]
    fn test_load_empty_config() {
        let file = write_config("{}\n");
        assert_eq!(load(&file).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let file = write_config("params:\n  channels: 1\n  sample_width: 3\n  frame_rate: 16000\n");
        assert!(load(&file).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("tone_frequency: -1\n");
        assert!(load(&file).is_err());

        let file = write_config("frames_per_buffer: 0\n");
        assert!(load(&file).is_err());
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(load_config(Some(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn test_round_trip() {
        let cfg = Config {
            params: Params::MONO_16K,
            tone_frequency: 523.25,
            frames_per_buffer: 512,
        };
        let file = write_config(&serde_yaml::to_string(&cfg).unwrap());
        assert_eq!(load(&file).unwrap(), cfg);
    }
}
