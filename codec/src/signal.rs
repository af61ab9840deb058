//! Signal type hint.

use serde::{Deserialize, Serialize};

use crate::ffi;

/// Hint about the kind of audio fed to an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Auto/default setting.
    Auto,
    /// Signal being encoded is voice.
    Voice,
    /// Signal being encoded is music.
    Music,
}

impl Signal {
    /// Looks up the signal type for a native value, `None` if unrecognized.
    pub fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            ffi::OPUS_AUTO => Self::Auto,
            ffi::OPUS_SIGNAL_VOICE => Self::Voice,
            ffi::OPUS_SIGNAL_MUSIC => Self::Music,
            _ => return None,
        })
    }

    /// Returns the native value.
    pub fn value(&self) -> i32 {
        match self {
            Self::Auto => ffi::OPUS_AUTO,
            Self::Voice => ffi::OPUS_SIGNAL_VOICE,
            Self::Music => ffi::OPUS_SIGNAL_MUSIC,
        }
    }
}
