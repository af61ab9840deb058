//! Opus decoder.

use std::ptr;

use crate::bandwidth::Bandwidth;
use crate::config::DecoderConfig;
use crate::error::{Error, Result, check};
use crate::ffi;
use crate::format::{Channels, SampleRate, samples_needed, sub_slice, sub_slice_mut};
use crate::session::{DecoderCodec, Session};

/// Converts a gain in Q8 dB units into the linear factor applied to the
/// decoded signal.
pub fn gain_to_scale(gain: i32) -> f64 {
    10f64.powf(f64::from(gain) / (20.0 * 256.0))
}

/// Opus decoder.
pub struct Decoder {
    session: Session<DecoderCodec>,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("sample_rate", &self.session.sample_rate().hz())
            .field("channels", &self.session.channels().count())
            .field("released", &self.session.is_released())
            .finish()
    }
}

impl Decoder {
    /// Creates a new Opus decoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate to decode at (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    pub fn new(sample_rate: i32, channels: i32) -> Result<Self> {
        let sample_rate = SampleRate::parse(sample_rate)?;
        let channels = Channels::parse(channels)?;
        Ok(Self {
            session: Session::decoder(sample_rate, channels)?,
        })
    }

    /// Creates a decoder and applies the parameters set in `config`.
    pub fn with_config(config: &DecoderConfig) -> Result<Self> {
        let mut decoder = Self::new(config.sample_rate, config.channels)?;
        if let Some(gain) = config.gain {
            decoder.set_gain(gain)?;
        }
        Ok(decoder)
    }

    /// Returns the sampling rate reported by the native decoder.
    pub fn sample_rate(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_SAMPLE_RATE_REQUEST)
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.session.channels().count()
    }

    /// Decodes a packet into `pcm`.
    ///
    /// # Parameters
    /// - `input`: The packet. `None` or an empty slice signals a lost packet
    ///   and runs packet loss concealment.
    /// - `pcm`: Interleaved output, at least `frame_size * channels` samples.
    /// - `frame_size`: Samples per channel of space in `pcm`. Below the
    ///   120 ms maximum some packets cannot be decoded. For concealment and
    ///   FEC it must be exactly the missing duration, a multiple of 2.5 ms;
    ///   otherwise the next packet is decoded from a desynchronized state.
    /// - `decode_fec`: Recover the previous lost frame from in-band FEC data
    ///   in `input`. Without such data the frame is concealed instead.
    ///
    /// Returns the number of decoded samples per channel.
    pub fn decode(
        &mut self,
        input: Option<&[u8]>,
        pcm: &mut [i16],
        frame_size: i32,
        decode_fec: bool,
    ) -> Result<usize> {
        let input_len = input.map_or(0, <[u8]>::len);
        let pcm_len = pcm.len();
        self.decode_range(input, 0, input_len, pcm, 0, pcm_len, frame_size, decode_fec)
    }

    /// Decodes `input[input_offset..input_offset + input_size]` into
    /// `pcm[pcm_offset..pcm_offset + pcm_size]`.
    #[allow(clippy::too_many_arguments)]
    pub fn decode_range(
        &mut self,
        input: Option<&[u8]>,
        input_offset: usize,
        input_size: usize,
        pcm: &mut [i16],
        pcm_offset: usize,
        pcm_size: usize,
        frame_size: i32,
        decode_fec: bool,
    ) -> Result<usize> {
        let input = match input {
            Some(buf) => Some(
                sub_slice(buf, input_offset, input_size)
                    .ok_or_else(|| Error::invalid_argument("invalid input buffer arguments"))?,
            ),
            None => None,
        };
        let pcm = sub_slice_mut(pcm, pcm_offset, pcm_size)
            .ok_or_else(|| Error::invalid_argument("invalid pcm buffer arguments"))?;

        let needed = samples_needed(frame_size, self.session.channels())?;
        if pcm.len() < needed {
            return Err(Error::invalid_argument(format!(
                "pcm buffer holds {} samples, frame needs {}",
                pcm.len(),
                needed
            )));
        }

        let (data_ptr, data_len) = match input {
            Some(buf) if !buf.is_empty() => {
                let len = i32::try_from(buf.len())
                    .map_err(|_| Error::invalid_argument("input packet too large"))?;
                (buf.as_ptr(), len)
            }
            _ => (ptr::null(), 0),
        };

        let raw = self.session.as_ptr()?;
        let n = unsafe {
            ffi::opus_decode(
                raw,
                data_ptr,
                data_len,
                pcm.as_mut_ptr(),
                frame_size,
                i32::from(decode_fec),
            )
        };

        Ok(check("opus_decode", n)? as usize)
    }

    /// Performs packet loss concealment for `frame_size` missing samples per
    /// channel.
    pub fn decode_plc(&mut self, pcm: &mut [i16], frame_size: i32) -> Result<usize> {
        self.decode(None, pcm, frame_size, false)
    }

    /// Resets the decoder to the state of a freshly created one. The gain
    /// survives. Call this when switching to an unrelated stream.
    pub fn reset_state(&mut self) -> Result<()> {
        self.session.reset()
    }

    /// Returns the bandwidth of the last decoded packet, `None` before the
    /// first packet.
    pub fn bandwidth(&self) -> Result<Option<Bandwidth>> {
        let value = self.session.get(ffi::OPUS_GET_BANDWIDTH_REQUEST)?;
        Ok(Bandwidth::from_value(value))
    }

    /// Returns the duration in samples of the last decoded or concealed
    /// packet.
    pub fn last_packet_duration(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_LAST_PACKET_DURATION_REQUEST)
    }

    /// Returns the output gain in Q8 dB units.
    pub fn gain(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_GAIN_REQUEST)
    }

    /// Sets the output gain in Q8 dB units (see [`gain_to_scale`]).
    ///
    /// The default is zero. The gain survives [`Decoder::reset_state`].
    pub fn set_gain(&mut self, gain: i32) -> Result<()> {
        self.session.set(ffi::OPUS_SET_GAIN_REQUEST, gain)
    }

    /// Returns the pitch period of the last decoded frame at 48 kHz, or 0 if
    /// not available.
    pub fn pitch(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_PITCH_REQUEST)
    }

    /// Returns the final state of the range coder after the last packet.
    pub fn final_range(&self) -> Result<u32> {
        self.session.get_u32(ffi::OPUS_GET_FINAL_RANGE_REQUEST)
    }

    /// Releases the native decoder. Every later call fails with
    /// [`Error::Released`]; releasing twice is a no-op.
    pub fn release(&mut self) {
        self.session.release();
    }

    /// Returns true once the decoder has been released.
    pub fn is_released(&self) -> bool {
        self.session.is_released()
    }
}
