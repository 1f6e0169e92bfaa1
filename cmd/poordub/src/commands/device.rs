//! Playback and capture.

use clap::Args;
use poordub_audio::PcmAudio;
use poordub_audio::stream::{Direction, MemoryDevice, Stream, with_stream};
use serde::Serialize;
use tracing::info;

use super::{ParamsArgs, finite_db, get_config, output_result, read_audio, write_audio};
use crate::Cli;
use crate::config::Config;

#[cfg(feature = "portaudio")]
type HostDevice = poordub_audio::portaudio::PortAudio;

#[cfg(not(feature = "portaudio"))]
type HostDevice = MemoryDevice;

#[cfg(feature = "portaudio")]
fn host_device(cfg: &Config) -> anyhow::Result<HostDevice> {
    Ok(poordub_audio::portaudio::PortAudio {
        frames_per_buffer: cfg.frames_per_buffer,
    })
}

#[cfg(not(feature = "portaudio"))]
fn host_device(_cfg: &Config) -> anyhow::Result<HostDevice> {
    anyhow::bail!(
        "built without audio device support; rebuild with `--features portaudio` or use `play --loopback`"
    )
}

/// Play a clip on the default output device.
#[derive(Args)]
pub struct PlayCommand {
    /// WAV file (default: a one second tone at the configured frequency)
    pub input: Option<String>,

    /// Play into an in-process loopback, record it back and report whether
    /// the clip survived unchanged
    #[arg(long)]
    pub loopback: bool,
}

/// Result of a loopback check.
#[derive(Debug, Serialize)]
pub struct LoopbackReport {
    pub params: String,
    pub frames: usize,
    pub identical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_dbfs: Option<f64>,
}

/// Plays `audio` into a loopback device and captures it back from the
/// same duplex stream.
fn loopback(audio: &PcmAudio) -> anyhow::Result<LoopbackReport> {
    let device = MemoryDevice::new();
    let params = audio.params();
    let recorded = with_stream(&device, params, Direction::Duplex, |stream| {
        audio.play(stream)?;
        let data = stream.read(audio.frames())?;
        PcmAudio::new(params, data)
    })?;

    Ok(LoopbackReport {
        params: params.to_string(),
        frames: recorded.frames(),
        identical: &recorded == audio,
        peak_dbfs: finite_db(recorded.peak_level()),
    })
}

impl PlayCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let audio = match &self.input {
            Some(path) => read_audio(path)?,
            None => PcmAudio::sine(cfg.tone_frequency, 1000, cfg.params),
        };

        if self.loopback {
            let report = loopback(&audio)?;
            return output_result(&report, cli.output.as_deref(), cli.json);
        }

        let device = host_device(&cfg)?;
        info!(%audio, "playing");
        with_stream(&device, audio.params(), Direction::Output, |out| audio.play(out))?;
        Ok(())
    }
}

/// Record from the default input device.
#[derive(Args)]
pub struct RecordCommand {
    /// Duration in milliseconds
    #[arg(short = 'd', long, default_value_t = 3000)]
    pub duration: u64,

    /// Play the recording back on the same stream when done
    #[arg(long)]
    pub playback: bool,

    #[command(flatten)]
    pub params: ParamsArgs,
}

impl RecordCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let params = self.params.resolve(cfg.params)?;
        let device = host_device(&cfg)?;
        let direction = if self.playback {
            Direction::Duplex
        } else {
            Direction::Input
        };

        let recording = with_stream(&device, params, direction, |stream| {
            info!(duration_ms = self.duration, %params, "recording");
            let recording = PcmAudio::record(stream, self.duration)?;
            if self.playback {
                info!(%recording, "playing");
                recording.play(stream)?;
            }
            Ok(recording)
        })?;

        write_audio(cli, &recording)
    }
}

#[cfg(test)]
mod tests {
    use poordub_audio::Params;

    use super::*;

    #[test]
    fn test_loopback_preserves_clip() {
        let tone = PcmAudio::sine(440.0, 250, Params::MONO_16K) - 6.0;
        let report = loopback(&tone).unwrap();
        assert!(report.identical);
        assert_eq!(report.frames, 4000);
        assert_eq!(report.params, "1ch/16bit/16000Hz");
        assert!(report.peak_dbfs.unwrap() < -5.0);
    }

    #[test]
    fn test_loopback_silence() {
        let report = loopback(&PcmAudio::silence(100, Params::STEREO_48K)).unwrap();
        assert!(report.identical);
        assert!(report.peak_dbfs.is_none());
    }

    #[test]
    fn test_loopback_empty() {
        let report = loopback(&PcmAudio::empty(Params::MONO_8K)).unwrap();
        assert!(report.identical);
        assert_eq!(report.frames, 0);
    }
}
