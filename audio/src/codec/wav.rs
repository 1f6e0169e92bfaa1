//! RIFF/WAVE container codec for integer PCM.
//!
//! Backed by the `hound` crate. Only integer samples of 8, 16 or 32 bits
//! are accepted; 8-bit WAV samples are unsigned on disk and signed in
//! memory, and the translation is handled here.
//!
//! # Example
//!
//! ```rust
//! use poordub_audio::codec::wav;
//! use poordub_audio::pcm::{Params, PcmAudio};
//!
//! let tone = PcmAudio::sine(440.0, 100, Params::MONO_16K);
//! let bytes = wav::to_bytes(&tone).unwrap();
//! assert_eq!(&bytes[..4], b"RIFF");
//! assert_eq!(wav::from_bytes(&bytes).unwrap(), tone);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::error::{Error, Result};
use crate::pcm::{Params, PcmAudio, sample};

fn format_error(e: hound::Error) -> Error {
    Error::UnsupportedFormat(e.to_string())
}

fn write_error(e: hound::Error) -> Error {
    match e {
        hound::Error::IoError(e) => Error::Io(e),
        other => Error::UnsupportedFormat(other.to_string()),
    }
}

/// Returns the WAV header fields for a descriptor.
pub fn spec(params: Params) -> WavSpec {
    WavSpec {
        channels: params.channels(),
        sample_rate: params.frame_rate(),
        bits_per_sample: params.sample_width() * 8,
        sample_format: SampleFormat::Int,
    }
}

/// Reads a complete WAV stream.
///
/// Fails with [`Error::UnsupportedFormat`] on a malformed or truncated
/// header, non-integer samples, widths other than 1, 2 or 4 bytes, or a
/// payload that is not a whole number of frames.
pub fn decode<R: Read>(reader: R) -> Result<PcmAudio> {
    let mut reader = WavReader::new(reader).map_err(format_error)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int {
        return Err(Error::UnsupportedFormat("floating-point samples".to_string()));
    }
    if spec.bits_per_sample % 8 != 0 {
        return Err(Error::UnsupportedFormat(format!(
            "{}-bit samples",
            spec.bits_per_sample
        )));
    }
    let params = Params::new(spec.channels, spec.bits_per_sample / 8, spec.sample_rate)
        .map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let total = reader.len() as usize;
    if total % params.channels() as usize != 0 {
        return Err(Error::UnsupportedFormat(format!(
            "{total} samples do not fill whole {}-channel frames",
            params.channels()
        )));
    }

    let samples = reader
        .samples::<i32>()
        .collect::<std::result::Result<Vec<i32>, _>>()
        .map_err(format_error)?;
    if samples.len() != total {
        return Err(Error::UnsupportedFormat(format!(
            "expected {total} samples, read {}",
            samples.len()
        )));
    }

    let data = sample::encode(&samples, params.sample_width());
    let audio = PcmAudio::new(params, data)?;
    debug!(%params, frames = audio.frames(), "decoded wav");
    Ok(audio)
}

/// Writes `audio` as a WAV stream with a header matching its descriptor.
pub fn encode<W: Write + Seek>(audio: &PcmAudio, writer: W) -> Result<()> {
    let params = audio.params();
    let mut writer = WavWriter::new(writer, spec(params)).map_err(write_error)?;
    for s in audio.samples() {
        writer.write_sample(s).map_err(write_error)?;
    }
    writer.finalize().map_err(write_error)?;
    debug!(%params, frames = audio.frames(), "encoded wav");
    Ok(())
}

/// Encodes `audio` into an in-memory WAV file.
pub fn to_bytes(audio: &PcmAudio) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    encode(audio, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Decodes an in-memory WAV file.
pub fn from_bytes(bytes: &[u8]) -> Result<PcmAudio> {
    decode(Cursor::new(bytes))
}

/// Reads a WAV file from disk.
pub fn read_file(path: impl AsRef<Path>) -> Result<PcmAudio> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Writes a WAV file to disk.
pub fn write_file(audio: &PcmAudio, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(audio, &mut writer)?;
    writer.flush()?;
    Ok(())
}

impl PcmAudio {
    /// Decodes a WAV stream. See [`decode`].
    pub fn from_wav<R: Read>(reader: R) -> Result<PcmAudio> {
        decode(reader)
    }

    /// Encodes the clip as a WAV stream. See [`encode`].
    pub fn to_wav<W: Write + Seek>(&self, writer: W) -> Result<()> {
        encode(self, writer)
    }

    /// Encodes the clip as an in-memory WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        to_bytes(self)
    }

    /// Reads a WAV file from disk.
    pub fn read_wav(path: impl AsRef<Path>) -> Result<PcmAudio> {
        read_file(path)
    }

    /// Writes the clip to a WAV file on disk.
    pub fn write_wav(&self, path: impl AsRef<Path>) -> Result<()> {
        write_file(self, path)
    }
}
