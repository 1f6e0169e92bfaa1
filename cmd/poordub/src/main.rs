//! poordub CLI - shell access to immutable PCM audio values.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{
    ConcatCommand, ConvertCommand, CrossfadeCommand, FadeCommand, GainCommand, InfoCommand,
    InvertCommand, LoopCommand, MixCommand, NormalizeCommand, PlayCommand, RecordCommand,
    SilenceCommand, SliceCommand, ToneCommand,
};

/// poordub - a poor man's audio toolbox.
///
/// Every command reads WAV files, applies one operation and writes a new WAV
/// file (to stdout unless -o is given). Inputs are never modified. Clips with
/// different layouts are promoted to their common layout before they are
/// joined or mixed.
///
/// Defaults are read from ~/.poordub/config.yaml.
#[derive(Parser)]
#[command(name = "poordub")]
#[command(about = "Concatenate, mix, fade and measure PCM audio")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.poordub/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output reports as JSON instead of YAML
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Describe WAV files: layout, length and levels
    Info(InfoCommand),
    /// Generate a sine tone
    Tone(ToneCommand),
    /// Generate digital silence
    Silence(SilenceCommand),
    /// Join clips end to end
    Concat(ConcatCommand),
    /// Repeat a clip
    Loop(LoopCommand),
    /// Change the level of a clip by some decibels
    Gain(GainCommand),
    /// Bring the peak of a clip to 0 dBFS
    Normalize(NormalizeCommand),
    /// Mix clips on top of each other
    Mix(MixCommand),
    /// Invert the phase of a clip
    Invert(InvertCommand),
    /// Cut a time range out of a clip
    Slice(SliceCommand),
    /// Fade a clip in and/or out
    Fade(FadeCommand),
    /// Blend the end of one clip into the start of another
    Crossfade(CrossfadeCommand),
    /// Change channel count, sample width or frame rate
    Convert(ConvertCommand),
    /// Play a clip on the default output device
    Play(PlayCommand),
    /// Record from the default input device
    Record(RecordCommand),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout may carry WAV data
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Info(cmd) => cmd.run(&cli),
        Commands::Tone(cmd) => cmd.run(&cli),
        Commands::Silence(cmd) => cmd.run(&cli),
        Commands::Concat(cmd) => cmd.run(&cli),
        Commands::Loop(cmd) => cmd.run(&cli),
        Commands::Gain(cmd) => cmd.run(&cli),
        Commands::Normalize(cmd) => cmd.run(&cli),
        Commands::Mix(cmd) => cmd.run(&cli),
        Commands::Invert(cmd) => cmd.run(&cli),
        Commands::Slice(cmd) => cmd.run(&cli),
        Commands::Fade(cmd) => cmd.run(&cli),
        Commands::Crossfade(cmd) => cmd.run(&cli),
        Commands::Convert(cmd) => cmd.run(&cli),
        Commands::Play(cmd) => cmd.run(&cli),
        Commands::Record(cmd) => cmd.run(&cli),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_gain_negative() {
        let cli = Cli::try_parse_from(["poordub", "gain", "in.wav", "-6", "-o", "out.wav"]).unwrap();
        assert_eq!(cli.output.as_deref(), Some("out.wav"));
        match cli.command {
            Commands::Gain(cmd) => assert_eq!(cmd.db, -6.0),
            _ => panic!("expected gain"),
        }
    }

    #[test]
    fn test_parse_slice_from_end() {
        let cli = Cli::try_parse_from(["poordub", "slice", "in.wav", "--start", "-500"]).unwrap();
        match cli.command {
            Commands::Slice(cmd) => {
                assert_eq!(cmd.start, Some(-500));
                assert_eq!(cmd.end, None);
            }
            _ => panic!("expected slice"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["poordub", "info", "a.wav", "b.wav", "--json", "-v"]).unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }
}
