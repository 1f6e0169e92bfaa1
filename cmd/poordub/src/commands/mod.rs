//! CLI commands module.

mod device;
mod generate;
mod info;
mod sequence;
mod signal;
mod util;

pub use device::{PlayCommand, RecordCommand};
pub use generate::{SilenceCommand, ToneCommand};
pub use info::InfoCommand;
pub use sequence::{ConcatCommand, CrossfadeCommand, LoopCommand, SliceCommand};
pub use signal::{ConvertCommand, FadeCommand, GainCommand, InvertCommand, MixCommand, NormalizeCommand};

pub(crate) use util::*;
