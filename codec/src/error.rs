//! Error normalization for native result codes.

use std::os::raw::c_int;

use thiserror::Error;
use tracing::warn;

use crate::ffi;
use crate::session::CodecKind;

/// Failure categories derived from libopus' negative result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// One or more arguments were out of range (`-1`).
    InvalidArgument,
    /// The operation is not valid in the current state (`-2`).
    ///
    /// libopus reports this when the output buffer is too small.
    InvalidState,
    /// An unexpected internal failure (`-3`).
    InternalError,
    /// The compressed input is malformed (`-4`).
    CorruptPacket,
    /// Unknown or unsupported configuration request (`-5`).
    UnsupportedRequest,
    /// The encoder or decoder structure is invalid or already freed (`-6`).
    InvalidHandle,
    /// Native allocation failed (`-7`).
    OutOfMemory,
}

impl ErrorKind {
    /// Looks up the kind for a native result code.
    ///
    /// Returns `None` for codes outside the known taxonomy, including every
    /// non-negative value.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -1 => Self::InvalidArgument,
            -2 => Self::InvalidState,
            -3 => Self::InternalError,
            -4 => Self::CorruptPacket,
            -5 => Self::UnsupportedRequest,
            -6 => Self::InvalidHandle,
            -7 => Self::OutOfMemory,
            _ => return None,
        })
    }

    /// Returns the native result code for this kind.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument => -1,
            Self::InvalidState => -2,
            Self::InternalError => -3,
            Self::CorruptPacket => -4,
            Self::UnsupportedRequest => -5,
            Self::InvalidHandle => -6,
            Self::OutOfMemory => -7,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "one or more invalid/out of range arguments"),
            Self::InvalidState => write!(f, "invalid state"),
            Self::InternalError => write!(f, "an internal error was detected"),
            Self::CorruptPacket => write!(f, "the compressed data passed is corrupted"),
            Self::UnsupportedRequest => write!(f, "invalid/unsupported request number"),
            Self::InvalidHandle => write!(f, "an encoder or decoder structure is invalid"),
            Self::OutOfMemory => write!(f, "memory allocation has failed"),
        }
    }
}

/// Errors returned by encoder and decoder sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Rejected before reaching the native codec.
    #[error("opus: invalid argument: {0}")]
    InvalidArgument(String),

    /// A native call returned a negative result code.
    #[error("opus: {op} failed: {kind}")]
    Native {
        op: &'static str,
        kind: ErrorKind,
        code: i32,
    },

    /// The session was used after `release()`.
    #[error("opus: {0} has been released")]
    Released(CodecKind),
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Returns the failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Native { kind, .. } => *kind,
            Self::Released(_) => ErrorKind::InvalidHandle,
        }
    }
}

/// Result type for opus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Passes non-negative results through and turns negative ones into errors.
///
/// Negative codes outside the known taxonomy are reported as
/// [`ErrorKind::InternalError`] with the raw code kept.
pub(crate) fn check(op: &'static str, code: c_int) -> Result<i32> {
    if code >= 0 {
        return Ok(code);
    }
    let kind = ErrorKind::from_code(code).unwrap_or(ErrorKind::InternalError);
    warn!(op, code, "opus: {}", ffi::error_string(code));
    Err(Error::Native { op, kind, code })
}
