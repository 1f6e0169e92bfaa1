//! Clip description.

use clap::Args;
use poordub_audio::PcmAudio;
use serde::Serialize;

use super::{finite_db, output_result, read_audio};
use crate::Cli;

/// Describe WAV files.
#[derive(Args)]
pub struct InfoCommand {
    /// WAV files to describe
    #[arg(required = true)]
    pub files: Vec<String>,
}

/// What `info` reports for one file. Levels are omitted for silence.
#[derive(Debug, Serialize)]
pub struct ClipInfo {
    pub path: String,
    pub channels: u16,
    pub sample_width: u16,
    pub frame_rate: u32,
    pub frames: usize,
    pub duration_ms: u64,
    pub max_amplitude: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_dbfs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_dbfs: Option<f64>,
}

impl ClipInfo {
    pub fn new(path: &str, audio: &PcmAudio) -> Self {
        let params = audio.params();
        Self {
            path: path.to_string(),
            channels: params.channels(),
            sample_width: params.sample_width(),
            frame_rate: params.frame_rate(),
            frames: audio.frames(),
            duration_ms: audio.len_ms(),
            max_amplitude: audio.max_amplitude(),
            peak_dbfs: finite_db(audio.peak_level()),
            average_dbfs: finite_db(audio.average_level()),
        }
    }
}

impl InfoCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let infos = self
            .files
            .iter()
            .map(|path| Ok(ClipInfo::new(path, &read_audio(path)?)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        output_result(&infos, cli.output.as_deref(), cli.json)
    }
}

#[cfg(test)]
mod tests {
    use poordub_audio::Params;

    use super::*;

    #[test]
    fn test_clip_info() {
        let tone = PcmAudio::sine(440.0, 250, Params::MONO_16K);
        let info = ClipInfo::new("tone.wav", &tone);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frame_rate, 16000);
        assert_eq!(info.frames, 4000);
        assert_eq!(info.duration_ms, 250);
        assert!(info.peak_dbfs.is_some());
    }

    #[test]
    fn test_silence_levels_omitted() {
        let info = ClipInfo::new("quiet.wav", &PcmAudio::silence(100, Params::MONO_8K));
        assert_eq!(info.max_amplitude, 0);
        assert!(info.peak_dbfs.is_none());

        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("peak_dbfs").is_none());
        assert_eq!(json["duration_ms"], 100);
    }
}
