//! Blocking device streams via PortAudio.
//!
//! Enabled with the `portaudio` cargo feature; links against the system
//! portaudio library.
//!
//! - Blocking I/O model: `read()` and `write()` block until the device is done
//! - Sample format follows the stream's [`Params`]: paInt8, paInt16 or paInt32
//! - Uses the host's default input and output devices
//!
//! # Example
//!
//! ```ignore
//! use poordub_audio::pcm::{Params, PcmAudio};
//! use poordub_audio::portaudio::PortAudio;
//! use poordub_audio::stream::{Direction, with_stream};
//!
//! let tone = PcmAudio::sine(880.0, 1000, Params::MONO_44K) * 2 - 9.0;
//! with_stream(&PortAudio::default(), tone.params(), Direction::Output, |out| tone.play(out))?;
//! ```

pub(crate) mod ffi;

use std::ffi::CStr;
use std::io;
use std::os::raw::{c_int, c_ulong, c_void};
use std::ptr;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::Result;
use crate::pcm::Params;
use crate::stream::{Device, Direction, Stream};

/// Default number of frames PortAudio buffers per host callback.
pub const DEFAULT_FRAMES_PER_BUFFER: usize = 1024;

static INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Initializes PortAudio once per process.
fn initialize() -> io::Result<()> {
    INIT.get_or_init(|| {
        let err = unsafe { ffi::Pa_Initialize() };
        if err == ffi::PA_NO_ERROR {
            Ok(())
        } else {
            Err(pa_error_string(err))
        }
    })
    .clone()
    .map_err(io::Error::other)
}

fn pa_error_string(code: ffi::PaError) -> String {
    unsafe {
        let ptr = ffi::Pa_GetErrorText(code);
        if ptr.is_null() {
            return format!("portaudio error {}", code);
        }
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

fn pa_check(code: ffi::PaError) -> io::Result<()> {
    if code == ffi::PA_NO_ERROR {
        Ok(())
    } else {
        Err(io::Error::other(pa_error_string(code)))
    }
}

fn sample_format(params: Params) -> ffi::PaSampleFormat {
    match params.sample_width() {
        1 => ffi::PA_INT8,
        2 => ffi::PA_INT16,
        _ => ffi::PA_INT32,
    }
}

/// Builds stream parameters for the default device on one side.
fn device_params(params: Params, input: bool) -> io::Result<ffi::PaStreamParameters> {
    let device = unsafe {
        if input {
            ffi::Pa_GetDefaultInputDevice()
        } else {
            ffi::Pa_GetDefaultOutputDevice()
        }
    };
    let side = if input { "input" } else { "output" };
    if device == ffi::PA_NO_DEVICE {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no default {side} device"),
        ));
    }
    let info = unsafe { ffi::Pa_GetDeviceInfo(device) };
    if info.is_null() {
        return Err(io::Error::other(format!("failed to get {side} device info")));
    }
    let latency = unsafe {
        if input {
            (*info).default_low_input_latency
        } else {
            (*info).default_low_output_latency
        }
    };
    Ok(ffi::PaStreamParameters {
        device,
        channel_count: params.channels() as c_int,
        sample_format: sample_format(params),
        suggested_latency: latency,
        host_api_specific_stream_info: ptr::null_mut(),
    })
}

/// The host's default audio devices.
#[derive(Debug, Clone, Copy)]
pub struct PortAudio {
    /// Frames PortAudio buffers between the device and blocking calls.
    pub frames_per_buffer: usize,
}

impl Default for PortAudio {
    fn default() -> Self {
        Self {
            frames_per_buffer: DEFAULT_FRAMES_PER_BUFFER,
        }
    }
}

impl Device for PortAudio {
    type Stream = PortAudioStream;

    fn open(&self, params: Params, direction: Direction) -> Result<PortAudioStream> {
        initialize()?;

        let input = direction
            .is_input()
            .then(|| device_params(params, true))
            .transpose()?;
        let output = direction
            .is_output()
            .then(|| device_params(params, false))
            .transpose()?;

        let mut pa_stream: *mut c_void = ptr::null_mut();
        pa_check(unsafe {
            ffi::Pa_OpenStream(
                &mut pa_stream,
                input.as_ref().map_or(ptr::null(), |p| p as *const _),
                output.as_ref().map_or(ptr::null(), |p| p as *const _),
                params.frame_rate() as f64,
                self.frames_per_buffer as c_ulong,
                ffi::PA_CLIP_OFF,
                ptr::null(),
                ptr::null_mut(),
            )
        })?;

        // Dropping `stream` closes the handle if starting fails
        let stream = PortAudioStream {
            pa_stream,
            params,
            direction,
            closed: false,
        };
        pa_check(unsafe { ffi::Pa_StartStream(stream.pa_stream) })?;
        debug!(%params, ?direction, "portaudio stream started");
        Ok(stream)
    }
}

/// A blocking PortAudio stream on the default device(s).
pub struct PortAudioStream {
    pa_stream: *mut c_void,
    params: Params,
    direction: Direction,
    closed: bool,
}

// The raw stream handle is only touched through `&mut self`.
unsafe impl Send for PortAudioStream {}

impl PortAudioStream {
    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("stream closed"));
        }
        Ok(())
    }
}

impl Stream for PortAudioStream {
    fn params(&self) -> Params {
        self.params
    }

    fn read(&mut self, frames: usize) -> io::Result<Vec<u8>> {
        self.check_open()?;
        if !self.direction.is_input() {
            return Err(io::Error::other("no input channels"));
        }
        let mut buf = vec![0u8; frames * self.params.frame_size()];
        pa_check(unsafe {
            ffi::Pa_ReadStream(self.pa_stream, buf.as_mut_ptr() as *mut c_void, frames as c_ulong)
        })?;
        Ok(buf)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.check_open()?;
        if !self.direction.is_output() {
            return Err(io::Error::other("no output channels"));
        }
        let frames = data.len() / self.params.frame_size();
        pa_check(unsafe {
            ffi::Pa_WriteStream(self.pa_stream, data.as_ptr() as *const c_void, frames as c_ulong)
        })
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        unsafe {
            ffi::Pa_StopStream(self.pa_stream);
            pa_check(ffi::Pa_CloseStream(self.pa_stream))
        }
    }
}

impl Drop for PortAudioStream {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_format() {
        assert_eq!(sample_format(Params::new(1, 1, 8000).unwrap()), ffi::PA_INT8);
        assert_eq!(sample_format(Params::MONO_16K), ffi::PA_INT16);
        assert_eq!(sample_format(Params::new(2, 4, 48000).unwrap()), ffi::PA_INT32);
    }

    #[test]
    fn test_default_device_config() {
        assert_eq!(PortAudio::default().frames_per_buffer, DEFAULT_FRAMES_PER_BUFFER);
    }
}
