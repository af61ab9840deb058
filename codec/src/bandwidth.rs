//! Audio bandwidth.

use serde::{Deserialize, Serialize};

use crate::ffi;

/// Audio bandpass selected or reported by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// Let the codec choose.
    Auto,
    /// 4 kHz bandpass.
    NarrowBand,
    /// 6 kHz bandpass.
    MediumBand,
    /// 8 kHz bandpass.
    WideBand,
    /// 12 kHz bandpass.
    SuperWideBand,
    /// 20 kHz bandpass.
    FullBand,
}

impl Bandwidth {
    /// Looks up the bandwidth for a native value.
    ///
    /// Unrecognized values (a decoder that has not seen a packet yet reports
    /// `0`) yield `None`.
    pub fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            ffi::OPUS_AUTO => Self::Auto,
            ffi::OPUS_BANDWIDTH_NARROWBAND => Self::NarrowBand,
            ffi::OPUS_BANDWIDTH_MEDIUMBAND => Self::MediumBand,
            ffi::OPUS_BANDWIDTH_WIDEBAND => Self::WideBand,
            ffi::OPUS_BANDWIDTH_SUPERWIDEBAND => Self::SuperWideBand,
            ffi::OPUS_BANDWIDTH_FULLBAND => Self::FullBand,
            _ => return None,
        })
    }

    /// Returns the native value.
    pub fn value(&self) -> i32 {
        match self {
            Self::Auto => ffi::OPUS_AUTO,
            Self::NarrowBand => ffi::OPUS_BANDWIDTH_NARROWBAND,
            Self::MediumBand => ffi::OPUS_BANDWIDTH_MEDIUMBAND,
            Self::WideBand => ffi::OPUS_BANDWIDTH_WIDEBAND,
            Self::SuperWideBand => ffi::OPUS_BANDWIDTH_SUPERWIDEBAND,
            Self::FullBand => ffi::OPUS_BANDWIDTH_FULLBAND,
        }
    }
}

impl std::fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::NarrowBand => write!(f, "Narrowband"),
            Self::MediumBand => write!(f, "Mediumband"),
            Self::WideBand => write!(f, "Wideband"),
            Self::SuperWideBand => write!(f, "Superwideband"),
            Self::FullBand => write!(f, "Fullband"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandwidth_values() {
        assert_eq!(Bandwidth::Auto.value(), -1000);
        assert_eq!(Bandwidth::NarrowBand.value(), 1101);
        assert_eq!(Bandwidth::MediumBand.value(), 1102);
        assert_eq!(Bandwidth::WideBand.value(), 1103);
        assert_eq!(Bandwidth::SuperWideBand.value(), 1104);
        assert_eq!(Bandwidth::FullBand.value(), 1105);
    }

    #[test]
    fn test_bandwidth_lookup() {
        for bw in [
            Bandwidth::Auto,
            Bandwidth::NarrowBand,
            Bandwidth::MediumBand,
            Bandwidth::WideBand,
            Bandwidth::SuperWideBand,
            Bandwidth::FullBand,
        ] {
            assert_eq!(Bandwidth::from_value(bw.value()), Some(bw));
        }
    }

    #[test]
    fn test_bandwidth_unknown_value() {
        assert_eq!(Bandwidth::from_value(0), None);
        assert_eq!(Bandwidth::from_value(1100), None);
        assert_eq!(Bandwidth::from_value(1106), None);
    }

    #[test]
    fn test_bandwidth_display() {
        assert_eq!(format!("{}", Bandwidth::WideBand), "Wideband");
        assert_eq!(format!("{}", Bandwidth::FullBand), "Fullband");
    }
}
