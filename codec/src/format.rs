//! Sampling rates, channel layouts and frame durations accepted by libopus.

use std::time::Duration;

use crate::error::{Error, Result};

/// Sampling rate of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    Hz8000,
    Hz12000,
    Hz16000,
    Hz24000,
    Hz48000,
}

impl SampleRate {
    /// Looks up a supported rate, `None` for anything else.
    pub fn from_hz(hz: i32) -> Option<Self> {
        Some(match hz {
            8000 => Self::Hz8000,
            12000 => Self::Hz12000,
            16000 => Self::Hz16000,
            24000 => Self::Hz24000,
            48000 => Self::Hz48000,
            _ => return None,
        })
    }

    /// Returns the rate in Hz.
    pub fn hz(&self) -> i32 {
        match self {
            Self::Hz8000 => 8000,
            Self::Hz12000 => 12000,
            Self::Hz16000 => 16000,
            Self::Hz24000 => 24000,
            Self::Hz48000 => 48000,
        }
    }

    pub(crate) fn parse(hz: i32) -> Result<Self> {
        Self::from_hz(hz)
            .ok_or_else(|| Error::invalid_argument(format!("invalid sampling rate {}", hz)))
    }
}

/// Channel layout of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    Mono,
    Stereo,
}

impl Channels {
    /// Looks up a channel count, `None` unless it is 1 or 2.
    pub fn from_count(count: i32) -> Option<Self> {
        match count {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            _ => None,
        }
    }

    /// Returns the number of channels.
    pub fn count(&self) -> i32 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    pub(crate) fn parse(count: i32) -> Result<Self> {
        Self::from_count(count)
            .ok_or_else(|| Error::invalid_argument(format!("invalid number of channels {}", count)))
    }
}

/// Frame durations libopus can encode, including the multi-frame packet
/// durations above 60 ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameDuration {
    Duration2500us,
    Duration5ms,
    Duration10ms,
    Duration20ms,
    Duration40ms,
    Duration60ms,
    Duration80ms,
    Duration100ms,
    Duration120ms,
}

impl FrameDuration {
    /// Looks up a duration given in microseconds.
    pub fn from_micros(micros: u32) -> Option<Self> {
        Some(match micros {
            2500 => Self::Duration2500us,
            5000 => Self::Duration5ms,
            10000 => Self::Duration10ms,
            20000 => Self::Duration20ms,
            40000 => Self::Duration40ms,
            60000 => Self::Duration60ms,
            80000 => Self::Duration80ms,
            100000 => Self::Duration100ms,
            120000 => Self::Duration120ms,
            _ => return None,
        })
    }

    /// Returns the duration in microseconds.
    pub fn micros(&self) -> u32 {
        match self {
            Self::Duration2500us => 2500,
            Self::Duration5ms => 5000,
            Self::Duration10ms => 10000,
            Self::Duration20ms => 20000,
            Self::Duration40ms => 40000,
            Self::Duration60ms => 60000,
            Self::Duration80ms => 80000,
            Self::Duration100ms => 100000,
            Self::Duration120ms => 120000,
        }
    }

    /// Returns the duration as a Duration.
    pub fn duration(&self) -> Duration {
        Duration::from_micros(u64::from(self.micros()))
    }

    /// Returns the number of samples per channel at the given rate.
    pub fn samples(&self, rate: SampleRate) -> usize {
        (u64::from(self.micros()) * rate.hz() as u64 / 1_000_000) as usize
    }
}

impl std::fmt::Display for FrameDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duration2500us => write!(f, "2.5ms"),
            other => write!(f, "{}ms", other.micros() / 1000),
        }
    }
}

/// Returns `buf[offset..offset + size]` if the range fits.
pub(crate) fn sub_slice<T>(buf: &[T], offset: usize, size: usize) -> Option<&[T]> {
    let end = offset.checked_add(size)?;
    buf.get(offset..end)
}

/// Mutable variant of [`sub_slice`].
pub(crate) fn sub_slice_mut<T>(buf: &mut [T], offset: usize, size: usize) -> Option<&mut [T]> {
    let end = offset.checked_add(size)?;
    buf.get_mut(offset..end)
}

/// Returns the interleaved sample count of a frame.
pub(crate) fn samples_needed(frame_size: i32, channels: Channels) -> Result<usize> {
    if frame_size <= 0 {
        return Err(Error::invalid_argument(format!(
            "invalid frame size {}",
            frame_size
        )));
    }
    Ok(frame_size as usize * channels.count() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rates() {
        for hz in [8000, 12000, 16000, 24000, 48000] {
            assert_eq!(SampleRate::from_hz(hz).unwrap().hz(), hz);
        }
        for hz in [0, -1, 11025, 22050, 44100, 96000] {
            assert!(SampleRate::from_hz(hz).is_none());
        }
    }

    #[test]
    fn test_sample_rate_parse_error() {
        let err = SampleRate::parse(44100).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("44100"));
    }

    #[test]
    fn test_channels() {
        assert_eq!(Channels::from_count(1), Some(Channels::Mono));
        assert_eq!(Channels::from_count(2), Some(Channels::Stereo));
        assert_eq!(Channels::from_count(0), None);
        assert_eq!(Channels::from_count(3), None);
        assert_eq!(Channels::Stereo.count(), 2);
        assert!(Channels::parse(-1).is_err());
    }

    #[test]
    fn test_frame_duration_lookup() {
        let valid = [
            2500, 5000, 10000, 20000, 40000, 60000, 80000, 100000, 120000,
        ];
        for micros in valid {
            assert_eq!(FrameDuration::from_micros(micros).unwrap().micros(), micros);
        }
        for micros in [0, 1000, 2000, 2501, 15000, 30000, 140000] {
            assert!(FrameDuration::from_micros(micros).is_none());
        }
    }

    #[test]
    fn test_frame_duration_samples() {
        // 2.5ms at 48kHz = 120 samples
        assert_eq!(FrameDuration::Duration2500us.samples(SampleRate::Hz48000), 120);
        // 2.5ms at 8kHz = 20 samples
        assert_eq!(FrameDuration::Duration2500us.samples(SampleRate::Hz8000), 20);
        // 20ms at 16kHz = 320 samples
        assert_eq!(FrameDuration::Duration20ms.samples(SampleRate::Hz16000), 320);
        // 60ms at 48kHz = 2880 samples
        assert_eq!(FrameDuration::Duration60ms.samples(SampleRate::Hz48000), 2880);
        // 120ms at 48kHz = 5760 samples
        assert_eq!(FrameDuration::Duration120ms.samples(SampleRate::Hz48000), 5760);
        // 2.5ms at 12kHz = 30 samples
        assert_eq!(FrameDuration::Duration2500us.samples(SampleRate::Hz12000), 30);
    }

    #[test]
    fn test_frame_duration_display() {
        assert_eq!(format!("{}", FrameDuration::Duration2500us), "2.5ms");
        assert_eq!(format!("{}", FrameDuration::Duration20ms), "20ms");
        assert_eq!(format!("{}", FrameDuration::Duration120ms), "120ms");
        assert_eq!(
            FrameDuration::Duration2500us.duration(),
            Duration::from_micros(2500)
        );
    }

    #[test]
    fn test_sub_slice() {
        let buf = [1, 2, 3, 4];
        assert_eq!(sub_slice(&buf, 1, 2), Some(&buf[1..3]));
        assert_eq!(sub_slice(&buf, 0, 4), Some(&buf[..]));
        assert_eq!(sub_slice(&buf, 4, 0), Some(&buf[4..]));
        assert_eq!(sub_slice(&buf, 3, 2), None);
        assert_eq!(sub_slice(&buf, usize::MAX, 1), None);
    }
}
