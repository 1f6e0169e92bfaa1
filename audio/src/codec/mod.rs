//! Audio container codecs.
//!
//! - `wav`: RIFF/WAVE integer PCM

pub mod wav;
