//! Signal generators.

use clap::Args;
use poordub_audio::PcmAudio;
use tracing::info;

use super::{ParamsArgs, get_config, write_audio};
use crate::Cli;

/// Generate a full-scale sine tone.
#[derive(Args)]
pub struct ToneCommand {
    /// Frequency in Hz (overrides config file)
    #[arg(short = 'f', long)]
    pub frequency: Option<f64>,

    /// Duration in milliseconds
    #[arg(short = 'd', long, default_value_t = 1000)]
    pub duration: u64,

    /// Gain in dB applied after generation
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub gain: f64,

    #[command(flatten)]
    pub params: ParamsArgs,
}

impl ToneCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let params = self.params.resolve(cfg.params)?;
        let frequency = self.frequency.unwrap_or(cfg.tone_frequency);
        if !(frequency.is_finite() && frequency > 0.0) {
            anyhow::bail!("frequency must be positive, got {frequency}");
        }

        let tone = PcmAudio::sine(frequency, self.duration, params).gain(self.gain);
        info!(frequency, %tone, "tone generated");
        write_audio(cli, &tone)
    }
}

/// Generate digital silence.
#[derive(Args)]
pub struct SilenceCommand {
    /// Duration in milliseconds
    #[arg(short = 'd', long, default_value_t = 1000)]
    pub duration: u64,

    #[command(flatten)]
    pub params: ParamsArgs,
}

impl SilenceCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let params = self.params.resolve(cfg.params)?;
        write_audio(cli, &PcmAudio::silence(self.duration, params))
    }
}
