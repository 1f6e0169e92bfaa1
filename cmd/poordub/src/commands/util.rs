//! Utility functions for CLI commands.

use std::io::Write;

use anyhow::Context as _;
use clap::Args;
use poordub_audio::{Params, PcmAudio};
use tracing::debug;

use crate::Cli;
use crate::config::{Config, load_config};

/// Layout overrides shared by commands that produce audio.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamsArgs {
    /// Channel count
    #[arg(long)]
    pub channels: Option<u16>,
    /// Sample width in bytes (1, 2 or 4)
    #[arg(long)]
    pub sample_width: Option<u16>,
    /// Frame rate in Hz
    #[arg(long)]
    pub rate: Option<u32>,
}

impl ParamsArgs {
    /// Applies the overrides on top of `base`.
    pub fn resolve(&self, base: Params) -> anyhow::Result<Params> {
        let params = Params::new(
            self.channels.unwrap_or(base.channels()),
            self.sample_width.unwrap_or(base.sample_width()),
            self.rate.unwrap_or(base.frame_rate()),
        )?;
        Ok(params)
    }
}

/// Gets the configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Reads a WAV file.
pub fn read_audio(path: &str) -> anyhow::Result<PcmAudio> {
    let audio = PcmAudio::read_wav(path).with_context(|| format!("read {path}"))?;
    debug!(path, %audio, "read");
    Ok(audio)
}

/// Reads several WAV files, in order.
pub fn read_all(paths: &[String]) -> anyhow::Result<Vec<PcmAudio>> {
    paths.iter().map(|p| read_audio(p)).collect()
}

/// Writes a clip as WAV to the output file, or to stdout.
pub fn write_audio(cli: &Cli, audio: &PcmAudio) -> anyhow::Result<()> {
    match cli.output.as_deref() {
        Some(path) => {
            audio
                .write_wav(path)
                .with_context(|| format!("write {path}"))?;
            debug!(path, %audio, "written");
        }
        None => {
            let bytes = audio.to_wav_bytes()?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)? + "\n"
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Maps the silence floor to `None` so reports stay valid JSON.
pub fn finite_db(db: f64) -> Option<f64> {
    db.is_finite().then_some(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_args_resolve() {
        let args = ParamsArgs::default();
        assert_eq!(args.resolve(Params::MONO_16K).unwrap(), Params::MONO_16K);

        let args = ParamsArgs {
            channels: Some(2),
            rate: Some(48000),
            ..Default::default()
        };
        assert_eq!(args.resolve(Params::MONO_16K).unwrap(), Params::STEREO_48K);

        let args = ParamsArgs {
            sample_width: Some(3),
            ..Default::default()
        };
        assert!(args.resolve(Params::MONO_16K).is_err());
    }

    #[test]
    fn test_finite_db() {
        assert_eq!(finite_db(-3.0), Some(-3.0));
        assert_eq!(finite_db(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_audio("/nonexistent/poordub.wav").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/poordub.wav"));
    }
}
