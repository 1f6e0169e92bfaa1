//! Commands that reshape the samples of clips.

use clap::Args;
use poordub_audio::PcmAudio;
use tracing::debug;

use super::{ParamsArgs, read_all, read_audio, write_audio};
use crate::Cli;

/// Change the level of a clip.
#[derive(Args)]
pub struct GainCommand {
    /// WAV file
    pub input: String,

    /// Gain in dB; negative values attenuate
    #[arg(allow_negative_numbers = true)]
    pub db: f64,
}

impl GainCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let audio = read_audio(&self.input)?;
        write_audio(cli, &audio.gain(self.db))
    }
}

/// Bring the peak of a clip to 0 dBFS.
#[derive(Args)]
pub struct NormalizeCommand {
    /// WAV file
    pub input: String,
}

impl NormalizeCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let audio = read_audio(&self.input)?;
        debug!(peak_dbfs = audio.peak_level(), "normalizing");
        write_audio(cli, &audio.normalize())
    }
}

/// Mix clips on top of each other. The result is as long as the shortest
/// input.
#[derive(Args)]
pub struct MixCommand {
    /// WAV files to mix
    #[arg(required = true, num_args = 2..)]
    pub inputs: Vec<String>,
}

impl MixCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mixed = read_all(&self.inputs)?
            .into_iter()
            .reduce(|acc, clip| acc & clip)
            .unwrap_or_default();
        write_audio(cli, &mixed)
    }
}

/// Invert the phase of a clip.
#[derive(Args)]
pub struct InvertCommand {
    /// WAV file
    pub input: String,
}

impl InvertCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let audio = read_audio(&self.input)?;
        write_audio(cli, &audio.invert())
    }
}

/// Fade a clip in and/or out.
#[derive(Args)]
pub struct FadeCommand {
    /// WAV file
    pub input: String,

    /// Fade-in length in milliseconds
    #[arg(long, default_value_t = 0)]
    pub fade_in: u64,

    /// Fade-out length in milliseconds
    #[arg(long, default_value_t = 0)]
    pub fade_out: u64,
}

impl FadeCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut audio = read_audio(&self.input)?;
        if self.fade_in > 0 {
            audio = audio.fade_in(self.fade_in);
        }
        if self.fade_out > 0 {
            audio = audio.fade_out(self.fade_out);
        }
        write_audio(cli, &audio)
    }
}

/// Change the layout of a clip.
#[derive(Args)]
pub struct ConvertCommand {
    /// WAV file
    pub input: String,

    #[command(flatten)]
    pub params: ParamsArgs,
}

impl ConvertCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let audio: PcmAudio = read_audio(&self.input)?;
        let params = self.params.resolve(audio.params())?;
        write_audio(cli, &audio.adjust(params))
    }
}
