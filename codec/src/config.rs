//! Session configuration.
//!
//! Configs can be built in code or deserialized (JSON, YAML, ...). Unset
//! optional fields leave the libopus default in place.

use serde::{Deserialize, Serialize};

use crate::bandwidth::Bandwidth;
use crate::encoder::Application;
use crate::signal::Signal;

/// Encoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Sample rate (8000, 12000, 16000, 24000, or 48000).
    pub sample_rate: i32,
    /// Number of channels (1 or 2).
    pub channels: i32,
    /// Application type, fixed for the encoder's lifetime.
    pub application: Application,
    /// Target bitrate in bits per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i32>,
    /// Complexity (1-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<i32>,
    /// Forced bandwidth. Prefer `max_bandwidth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
    /// Upper bound for automatic bandwidth selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bandwidth: Option<Bandwidth>,
    /// Signal type hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    /// In-band forward error correction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inband_fec: Option<bool>,
    /// Expected packet loss percentage (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_loss_percentage: Option<i32>,
    /// Inter-frame prediction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<bool>,
    /// Discontinuous transmission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtx: Option<bool>,
    /// Variable bitrate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vbr: Option<bool>,
}

impl EncoderConfig {
    /// Create a new encoder config with every optional parameter unset.
    pub fn new(sample_rate: i32, channels: i32, application: Application) -> Self {
        Self {
            sample_rate,
            channels,
            application,
            bitrate: None,
            complexity: None,
            bandwidth: None,
            max_bandwidth: None,
            signal: None,
            inband_fec: None,
            packet_loss_percentage: None,
            prediction: None,
            dtx: None,
            vbr: None,
        }
    }

    /// Set target bitrate.
    pub fn with_bitrate(mut self, bitrate: i32) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /// Set complexity.
    pub fn with_complexity(mut self, complexity: i32) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Set forced bandwidth.
    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    /// Set maximum bandwidth.
    pub fn with_max_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.max_bandwidth = Some(bandwidth);
        self
    }

    /// Set signal type hint.
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Enable or disable in-band FEC.
    pub fn with_inband_fec(mut self, enable: bool) -> Self {
        self.inband_fec = Some(enable);
        self
    }

    /// Set expected packet loss percentage.
    pub fn with_packet_loss_percentage(mut self, percentage: i32) -> Self {
        self.packet_loss_percentage = Some(percentage);
        self
    }

    /// Enable or disable prediction.
    pub fn with_prediction(mut self, enable: bool) -> Self {
        self.prediction = Some(enable);
        self
    }

    /// Enable or disable DTX.
    pub fn with_dtx(mut self, enable: bool) -> Self {
        self.dtx = Some(enable);
        self
    }

    /// Enable or disable VBR.
    pub fn with_vbr(mut self, enable: bool) -> Self {
        self.vbr = Some(enable);
        self
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Sample rate to decode at (8000, 12000, 16000, 24000, or 48000).
    pub sample_rate: i32,
    /// Number of channels (1 or 2).
    pub channels: i32,
    /// Output gain in Q8 dB units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain: Option<i32>,
}

impl DecoderConfig {
    /// Create a new decoder config without gain adjustment.
    pub fn new(sample_rate: i32, channels: i32) -> Self {
        Self {
            sample_rate,
            channels,
            gain: None,
        }
    }

    /// Set output gain.
    pub fn with_gain(mut self, gain: i32) -> Self {
        self.gain = Some(gain);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::encoder::Encoder;
    use crate::error::ErrorKind;

    #[test]
    fn test_encoder_config_builder() {
        let config = EncoderConfig::new(16000, 1, Application::Voip)
            .with_bitrate(24000)
            .with_complexity(5)
            .with_inband_fec(true);
        assert_eq!(config.bitrate, Some(24000));
        assert_eq!(config.complexity, Some(5));
        assert_eq!(config.inband_fec, Some(true));
        assert_eq!(config.signal, None);
    }

    #[test]
    fn test_encoder_config_deserialize() {
        let json = r#"{
            "sample_rate": 48000,
            "channels": 2,
            "application": "restricted_low_delay",
            "bitrate": 64000,
            "max_bandwidth": "wide_band",
            "signal": "music"
        }"#;
        let config: EncoderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.application, Application::RestrictedLowDelay);
        assert_eq!(config.bitrate, Some(64000));
        assert_eq!(config.max_bandwidth, Some(Bandwidth::WideBand));
        assert_eq!(config.signal, Some(Signal::Music));
        assert_eq!(config.dtx, None);
    }

    #[test]
    fn test_encoder_config_serialize_skips_unset() {
        let config = EncoderConfig::new(16000, 1, Application::Audio).with_dtx(true);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["application"], "audio");
        assert_eq!(json["dtx"], true);
        assert!(json.get("bitrate").is_none());
    }

    #[test]
    fn test_decoder_config_deserialize() {
        let config: DecoderConfig =
            serde_json::from_str(r#"{"sample_rate": 24000, "channels": 1}"#).unwrap();
        assert_eq!(config, DecoderConfig::new(24000, 1));

        let config: DecoderConfig =
            serde_json::from_str(r#"{"sample_rate": 8000, "channels": 2, "gain": -256}"#)
                .unwrap();
        assert_eq!(config.gain, Some(-256));
    }

    #[test]
    fn test_encoder_with_config() {
        let config = EncoderConfig::new(16000, 2, Application::Voip)
            .with_bitrate(28000)
            .with_complexity(4)
            .with_max_bandwidth(Bandwidth::MediumBand)
            .with_signal(Signal::Voice)
            .with_inband_fec(true)
            .with_packet_loss_percentage(20)
            .with_prediction(false)
            .with_dtx(true)
            .with_vbr(false);
        let encoder = Encoder::with_config(&config).unwrap();

        assert_eq!(encoder.application(), Application::Voip);
        assert_eq!(encoder.bitrate().unwrap(), 28000);
        assert_eq!(encoder.complexity().unwrap(), 4);
        assert_eq!(encoder.max_bandwidth().unwrap(), Some(Bandwidth::MediumBand));
        assert_eq!(encoder.signal().unwrap(), Some(Signal::Voice));
        assert!(encoder.inband_fec().unwrap());
        assert_eq!(encoder.packet_loss_percentage().unwrap(), 20);
        assert!(!encoder.prediction_enabled().unwrap());
        assert!(encoder.dtx().unwrap());
        assert!(!encoder.vbr().unwrap());
    }

    #[test]
    fn test_encoder_with_invalid_config() {
        let config = EncoderConfig::new(44100, 2, Application::Audio);
        assert_eq!(
            Encoder::with_config(&config).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );

        let config = EncoderConfig::new(48000, 2, Application::Audio).with_complexity(42);
        assert_eq!(
            Encoder::with_config(&config).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_decoder_with_config() {
        let decoder = Decoder::with_config(&DecoderConfig::new(16000, 2).with_gain(100)).unwrap();
        assert_eq!(decoder.gain().unwrap(), 100);
        assert_eq!(decoder.channels(), 2);

        let err = Decoder::with_config(&DecoderConfig::new(16000, 2).with_gain(99999)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
