//! Safe Opus encoder and decoder sessions.
//!
//! Each [`Encoder`] or [`Decoder`] owns exactly one libopus state. Arguments
//! and buffer bounds are validated before anything reaches the native codec,
//! and negative native result codes come back as [`Error`] values carrying an
//! [`ErrorKind`]. The native state is released on [`Encoder::release`] /
//! [`Decoder::release`] or on drop; any later call fails with
//! [`Error::Released`].
//!
//! Sessions are `Send` but not `Sync`: move one to another thread freely, but
//! serialize access to it. Distinct sessions are fully independent.
//!
//! # Example
//!
//! ```no_run
//! use opuskit_codec::{Application, Decoder, Encoder};
//!
//! # fn main() -> opuskit_codec::Result<()> {
//! let mut encoder = Encoder::new(16000, 1, Application::Voip)?;
//! encoder.set_bitrate(24000)?;
//!
//! // 20ms at 16kHz
//! let frame_size = encoder.calculate_frame_size(20_000)?;
//! let pcm = vec![0i16; frame_size];
//! let mut packet = vec![0u8; 4000];
//! let len = encoder.encode(&pcm, frame_size as i32, &mut packet)?;
//!
//! let mut decoder = Decoder::new(16000, 1)?;
//! let mut out = vec![0i16; frame_size];
//! let samples = decoder.decode(Some(&packet[..len]), &mut out, frame_size as i32, false)?;
//! assert_eq!(samples, frame_size);
//! # Ok(())
//! # }
//! ```

mod bandwidth;
mod config;
mod decoder;
mod encoder;
mod error;
mod ffi;
mod format;
mod session;
mod signal;

pub use bandwidth::Bandwidth;
pub use config::{DecoderConfig, EncoderConfig};
pub use decoder::{Decoder, gain_to_scale};
pub use encoder::{Application, Encoder};
pub use error::{Error, ErrorKind, Result};
pub use format::{Channels, FrameDuration, SampleRate};
pub use session::CodecKind;
pub use signal::Signal;
