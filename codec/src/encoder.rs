//! Opus encoder.

use serde::{Deserialize, Serialize};

use crate::bandwidth::Bandwidth;
use crate::config::EncoderConfig;
use crate::error::{Error, Result, check};
use crate::ffi;
use crate::format::{Channels, FrameDuration, SampleRate, samples_needed, sub_slice, sub_slice_mut};
use crate::session::{EncoderCodec, Session};
use crate::signal::Signal;

/// Opus application type. Fixed for the lifetime of an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// Best quality for voice signals.
    Voip,
    /// Best quality for non-voice signals.
    Audio,
    /// Minimum possible coding delay.
    RestrictedLowDelay,
}

impl Application {
    /// Looks up the application for a native value, `None` if unrecognized.
    pub fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            ffi::OPUS_APPLICATION_VOIP => Self::Voip,
            ffi::OPUS_APPLICATION_AUDIO => Self::Audio,
            ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY => Self::RestrictedLowDelay,
            _ => return None,
        })
    }

    /// Returns the native value.
    pub fn value(&self) -> i32 {
        match self {
            Self::Voip => ffi::OPUS_APPLICATION_VOIP,
            Self::Audio => ffi::OPUS_APPLICATION_AUDIO,
            Self::RestrictedLowDelay => ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        }
    }
}

/// Opus encoder.
///
/// Owns one native encoder state. The state is released by
/// [`Encoder::release`] or on drop, whichever comes first.
pub struct Encoder {
    session: Session<EncoderCodec>,
    application: Application,
}

impl std::fmt::Debug for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("sample_rate", &self.session.sample_rate().hz())
            .field("channels", &self.session.channels().count())
            .field("application", &self.application)
            .field("released", &self.session.is_released())
            .finish()
    }
}

impl Encoder {
    /// Creates a new Opus encoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    /// - `application`: Intended application type
    pub fn new(sample_rate: i32, channels: i32, application: Application) -> Result<Self> {
        let sample_rate = SampleRate::parse(sample_rate)?;
        let channels = Channels::parse(channels)?;
        let session = Session::encoder(sample_rate, channels, application.value())?;
        Ok(Self {
            session,
            application,
        })
    }

    /// Creates a new VoIP encoder.
    pub fn new_voip(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(sample_rate, channels, Application::Voip)
    }

    /// Creates a new audio encoder.
    pub fn new_audio(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(sample_rate, channels, Application::Audio)
    }

    /// Creates an encoder and applies every parameter set in `config`.
    pub fn with_config(config: &EncoderConfig) -> Result<Self> {
        let mut encoder = Self::new(config.sample_rate, config.channels, config.application)?;

        if let Some(bw) = config.max_bandwidth {
            encoder.set_max_bandwidth(bw)?;
        }
        if let Some(bw) = config.bandwidth {
            encoder.set_bandwidth(bw)?;
        }
        if let Some(signal) = config.signal {
            encoder.set_signal(signal)?;
        }
        if let Some(bitrate) = config.bitrate {
            encoder.set_bitrate(bitrate)?;
        }
        if let Some(complexity) = config.complexity {
            encoder.set_complexity(complexity)?;
        }
        if let Some(vbr) = config.vbr {
            encoder.set_vbr(vbr)?;
        }
        if let Some(fec) = config.inband_fec {
            encoder.set_inband_fec(fec)?;
        }
        if let Some(percentage) = config.packet_loss_percentage {
            encoder.set_packet_loss_percentage(percentage)?;
        }
        if let Some(prediction) = config.prediction {
            encoder.set_prediction(prediction)?;
        }
        if let Some(dtx) = config.dtx {
            encoder.set_dtx(dtx)?;
        }

        Ok(encoder)
    }

    /// Returns the sampling rate reported by the native encoder.
    pub fn sample_rate(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_SAMPLE_RATE_REQUEST)
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.session.channels().count()
    }

    /// Returns the application the encoder was created with.
    pub fn application(&self) -> Application {
        self.application
    }

    /// Encodes one frame.
    ///
    /// # Parameters
    /// - `pcm`: Interleaved input, at least `frame_size * channels` samples
    /// - `frame_size`: Samples per channel; must be an Opus frame size for the
    ///   sampling rate (2.5, 5, 10, 20, 40, 60, 80, 100 or 120 ms). Durations
    ///   under 10 ms keep the encoder out of the LPC and hybrid modes.
    /// - `output`: Packet buffer. Its length caps the instantaneous bitrate
    ///   but is no substitute for [`Encoder::set_bitrate`]. 4000 bytes is
    ///   always enough.
    ///
    /// Returns the packet length in bytes.
    pub fn encode(&mut self, pcm: &[i16], frame_size: i32, output: &mut [u8]) -> Result<usize> {
        let (pcm_len, output_len) = (pcm.len(), output.len());
        self.encode_range(pcm, 0, pcm_len, frame_size, output, 0, output_len)
    }

    /// Encodes one frame from `pcm[pcm_offset..pcm_offset + pcm_size]` into
    /// `output[output_offset..output_offset + output_size]`.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_range(
        &mut self,
        pcm: &[i16],
        pcm_offset: usize,
        pcm_size: usize,
        frame_size: i32,
        output: &mut [u8],
        output_offset: usize,
        output_size: usize,
    ) -> Result<usize> {
        let pcm = sub_slice(pcm, pcm_offset, pcm_size)
            .ok_or_else(|| Error::invalid_argument("invalid PCM buffer arguments"))?;
        let output = sub_slice_mut(output, output_offset, output_size)
            .ok_or_else(|| Error::invalid_argument("invalid output buffer arguments"))?;

        let needed = samples_needed(frame_size, self.session.channels())?;
        if pcm.len() < needed {
            return Err(Error::invalid_argument(format!(
                "PCM buffer holds {} samples, frame needs {}",
                pcm.len(),
                needed
            )));
        }

        let raw = self.session.as_ptr()?;
        let max_data_bytes = i32::try_from(output.len()).unwrap_or(i32::MAX);
        let n = unsafe {
            ffi::opus_encode(
                raw,
                pcm.as_ptr(),
                frame_size,
                output.as_mut_ptr(),
                max_data_bytes,
            )
        };

        Ok(check("opus_encode", n)? as usize)
    }

    /// Encodes one frame into a newly allocated packet.
    pub fn encode_to_vec(&mut self, pcm: &[i16], frame_size: i32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; ffi::MAX_PACKET_BYTES];
        let n = self.encode(pcm, frame_size, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Returns the number of samples per channel in a frame of the given
    /// duration.
    ///
    /// Only 2500, 5000, 10000, 20000, 40000, 60000, 80000, 100000 and
    /// 120000 µs are accepted.
    pub fn calculate_frame_size(&self, frame_duration_micros: u32) -> Result<usize> {
        let fd = FrameDuration::from_micros(frame_duration_micros).ok_or_else(|| {
            Error::invalid_argument(format!(
                "unsupported frame duration {}us",
                frame_duration_micros
            ))
        })?;
        self.session.as_ptr()?;
        Ok(self.frame_size(fd))
    }

    /// Returns the frame size for a given duration.
    ///
    /// This is computed from the sampling rate the encoder was created with
    /// and never touches the native state, so like [`Encoder::channels`] it
    /// keeps working after [`Encoder::release`].
    pub fn frame_size(&self, fd: FrameDuration) -> usize {
        fd.samples(self.session.sample_rate())
    }

    /// Resets the encoder to the state of a freshly created one. Call this
    /// when switching to an unrelated stream.
    pub fn reset_state(&mut self) -> Result<()> {
        self.session.reset()
    }

    /// Sets the audio bandwidth.
    ///
    /// The encoder may keep reporting its previous operating bandwidth from
    /// [`Encoder::bandwidth`] until it actually switches.
    pub fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<()> {
        self.session.set(ffi::OPUS_SET_BANDWIDTH_REQUEST, bandwidth.value())
    }

    /// Returns the bandwidth the encoder currently operates at.
    pub fn bandwidth(&self) -> Result<Option<Bandwidth>> {
        let value = self.session.get(ffi::OPUS_GET_BANDWIDTH_REQUEST)?;
        Ok(Bandwidth::from_value(value))
    }

    /// Sets the maximum bandpass the encoder will select automatically.
    ///
    /// Prefer this over [`Encoder::set_bandwidth`]: it bounds the bandwidth
    /// while still letting the encoder reduce it when the bitrate gets low.
    pub fn set_max_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<()> {
        self.session.set(ffi::OPUS_SET_MAX_BANDWIDTH_REQUEST, bandwidth.value())
    }

    /// Returns the configured maximum bandwidth.
    pub fn max_bandwidth(&self) -> Result<Option<Bandwidth>> {
        let value = self.session.get(ffi::OPUS_GET_MAX_BANDWIDTH_REQUEST)?;
        Ok(Bandwidth::from_value(value))
    }

    /// Sets the signal type hint.
    pub fn set_signal(&mut self, signal: Signal) -> Result<()> {
        self.session.set(ffi::OPUS_SET_SIGNAL_REQUEST, signal.value())
    }

    /// Returns the signal type hint.
    pub fn signal(&self) -> Result<Option<Signal>> {
        let value = self.session.get(ffi::OPUS_GET_SIGNAL_REQUEST)?;
        Ok(Signal::from_value(value))
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<()> {
        self.session.set(ffi::OPUS_SET_BITRATE_REQUEST, bitrate)
    }

    /// Returns the bitrate in bits per second.
    pub fn bitrate(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_BITRATE_REQUEST)
    }

    /// Sets the encoder complexity (1-10, higher is slower and better).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        self.session.set(ffi::OPUS_SET_COMPLEXITY_REQUEST, complexity)
    }

    /// Returns the encoder complexity.
    pub fn complexity(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_COMPLEXITY_REQUEST)
    }

    /// Enables or disables in-band forward error correction.
    pub fn set_inband_fec(&mut self, enable: bool) -> Result<()> {
        self.session.set(ffi::OPUS_SET_INBAND_FEC_REQUEST, i32::from(enable))
    }

    /// Returns true if in-band FEC is enabled.
    pub fn inband_fec(&self) -> Result<bool> {
        Ok(self.session.get(ffi::OPUS_GET_INBAND_FEC_REQUEST)? != 0)
    }

    /// Sets the expected packet loss percentage (0-100).
    ///
    /// Higher values make the stream more loss resistant at the expense of
    /// quality on a clean channel.
    pub fn set_packet_loss_percentage(&mut self, percentage: i32) -> Result<()> {
        self.session.set(ffi::OPUS_SET_PACKET_LOSS_PERC_REQUEST, percentage)
    }

    /// Returns the expected packet loss percentage.
    pub fn packet_loss_percentage(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_PACKET_LOSS_PERC_REQUEST)
    }

    /// Enables or disables prediction.
    ///
    /// With prediction disabled frames are almost independent of each other,
    /// which lowers quality but bounds error propagation.
    pub fn set_prediction(&mut self, enable: bool) -> Result<()> {
        self.session.set(ffi::OPUS_SET_PREDICTION_DISABLED_REQUEST, i32::from(!enable))
    }

    /// Returns true if prediction is enabled (the default).
    pub fn prediction_enabled(&self) -> Result<bool> {
        Ok(self.session.get(ffi::OPUS_GET_PREDICTION_DISABLED_REQUEST)? == 0)
    }

    /// Enables or disables discontinuous transmission.
    pub fn set_dtx(&mut self, enable: bool) -> Result<()> {
        self.session.set(ffi::OPUS_SET_DTX_REQUEST, i32::from(enable))
    }

    /// Returns true if DTX is enabled.
    pub fn dtx(&self) -> Result<bool> {
        Ok(self.session.get(ffi::OPUS_GET_DTX_REQUEST)? != 0)
    }

    /// Returns true if the last encoded frame was a comfort noise update or
    /// was suppressed by DTX.
    pub fn in_dtx(&self) -> Result<bool> {
        Ok(self.session.get(ffi::OPUS_GET_IN_DTX_REQUEST)? == 1)
    }

    /// Enables or disables variable bitrate.
    pub fn set_vbr(&mut self, enable: bool) -> Result<()> {
        self.session.set(ffi::OPUS_SET_VBR_REQUEST, i32::from(enable))
    }

    /// Returns true if VBR is enabled (the default).
    pub fn vbr(&self) -> Result<bool> {
        Ok(self.session.get(ffi::OPUS_GET_VBR_REQUEST)? != 0)
    }

    /// Returns the encoder lookahead in samples.
    pub fn lookahead(&self) -> Result<i32> {
        self.session.get(ffi::OPUS_GET_LOOKAHEAD_REQUEST)
    }

    /// Returns the final state of the range coder after the last packet.
    pub fn final_range(&self) -> Result<u32> {
        self.session.get_u32(ffi::OPUS_GET_FINAL_RANGE_REQUEST)
    }

    /// Releases the native encoder. Every later call fails with
    /// [`Error::Released`]; releasing twice is a no-op.
    pub fn release(&mut self) {
        self.session.release();
    }

    /// Returns true once the encoder has been released.
    pub fn is_released(&self) -> bool {
        self.session.is_released()
    }
}
