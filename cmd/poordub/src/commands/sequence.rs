//! Commands that arrange clips in time.

use clap::Args;
use poordub_audio::PcmAudio;

use super::{read_all, read_audio, write_audio};
use crate::Cli;

/// Join clips end to end.
#[derive(Args)]
pub struct ConcatCommand {
    /// WAV files, in playback order
    #[arg(required = true)]
    pub inputs: Vec<String>,
}

impl ConcatCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let joined: PcmAudio = read_all(&self.inputs)?.into_iter().sum();
        write_audio(cli, &joined)
    }
}

/// Repeat a clip.
#[derive(Args)]
pub struct LoopCommand {
    /// WAV file
    pub input: String,

    /// Number of times the clip is played
    #[arg(short = 'n', long, default_value_t = 2)]
    pub times: usize,
}

impl LoopCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let audio = read_audio(&self.input)?;
        write_audio(cli, &audio.repeat(self.times))
    }
}

/// Cut a time range out of a clip.
///
/// Negative positions count back from the end of the clip.
#[derive(Args)]
pub struct SliceCommand {
    /// WAV file
    pub input: String,

    /// Start in milliseconds (default: start of clip)
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// End in milliseconds, exclusive (default: end of clip)
    #[arg(long, allow_negative_numbers = true)]
    pub end: Option<i64>,
}

impl SliceCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let audio = read_audio(&self.input)?;
        write_audio(cli, &audio.slice_ms(self.start, self.end))
    }
}

/// Blend the end of one clip into the start of another.
#[derive(Args)]
pub struct CrossfadeCommand {
    /// Clip that fades out
    pub first: String,

    /// Clip that fades in
    pub second: String,

    /// Overlap in milliseconds
    #[arg(short = 'd', long, default_value_t = 100)]
    pub duration: u64,
}

impl CrossfadeCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let first = read_audio(&self.first)?;
        let second = read_audio(&self.second)?;
        write_audio(cli, &first.cross_fade(&second, self.duration))
    }
}
