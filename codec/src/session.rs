//! Owned native codec sessions.
//!
//! A [`Session`] holds exactly one libopus encoder or decoder state. It is
//! released once, either explicitly through [`Session::release`] or when it
//! is dropped, and every access after release fails with
//! [`Error::Released`].

use std::marker::PhantomData;
use std::os::raw::c_int;
use std::ptr::NonNull;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result, check};
use crate::ffi;
use crate::format::{Channels, SampleRate};

/// Which side of the codec a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Encoder,
    Decoder,
}

impl std::fmt::Display for CodecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encoder => write!(f, "encoder"),
            Self::Decoder => write!(f, "decoder"),
        }
    }
}

/// Binds a native state type to its destroy and ctl entry points.
pub(crate) trait NativeCodec {
    type Raw;

    const KIND: CodecKind;
    const CTL_OP: &'static str;

    unsafe fn destroy(raw: *mut Self::Raw);
    unsafe fn ctl(raw: *mut Self::Raw, request: c_int) -> c_int;
    unsafe fn ctl_set(raw: *mut Self::Raw, request: c_int, value: i32) -> c_int;
    unsafe fn ctl_get(raw: *mut Self::Raw, request: c_int, out: *mut i32) -> c_int;
    unsafe fn ctl_get_u32(raw: *mut Self::Raw, request: c_int, out: *mut u32) -> c_int;
}

pub(crate) struct EncoderCodec;

impl NativeCodec for EncoderCodec {
    type Raw = ffi::OpusEncoder;

    const KIND: CodecKind = CodecKind::Encoder;
    const CTL_OP: &'static str = "opus_encoder_ctl";

    unsafe fn destroy(raw: *mut Self::Raw) {
        unsafe { ffi::opus_encoder_destroy(raw) }
    }

    unsafe fn ctl(raw: *mut Self::Raw, request: c_int) -> c_int {
        unsafe { ffi::opus_encoder_ctl(raw, request) }
    }

    unsafe fn ctl_set(raw: *mut Self::Raw, request: c_int, value: i32) -> c_int {
        unsafe { ffi::opus_encoder_ctl(raw, request, value) }
    }

    unsafe fn ctl_get(raw: *mut Self::Raw, request: c_int, out: *mut i32) -> c_int {
        unsafe { ffi::opus_encoder_ctl(raw, request, out) }
    }

    unsafe fn ctl_get_u32(raw: *mut Self::Raw, request: c_int, out: *mut u32) -> c_int {
        unsafe { ffi::opus_encoder_ctl(raw, request, out) }
    }
}

pub(crate) struct DecoderCodec;

impl NativeCodec for DecoderCodec {
    type Raw = ffi::OpusDecoder;

    const KIND: CodecKind = CodecKind::Decoder;
    const CTL_OP: &'static str = "opus_decoder_ctl";

    unsafe fn destroy(raw: *mut Self::Raw) {
        unsafe { ffi::opus_decoder_destroy(raw) }
    }

    unsafe fn ctl(raw: *mut Self::Raw, request: c_int) -> c_int {
        unsafe { ffi::opus_decoder_ctl(raw, request) }
    }

    unsafe fn ctl_set(raw: *mut Self::Raw, request: c_int, value: i32) -> c_int {
        unsafe { ffi::opus_decoder_ctl(raw, request, value) }
    }

    unsafe fn ctl_get(raw: *mut Self::Raw, request: c_int, out: *mut i32) -> c_int {
        unsafe { ffi::opus_decoder_ctl(raw, request, out) }
    }

    unsafe fn ctl_get_u32(raw: *mut Self::Raw, request: c_int, out: *mut u32) -> c_int {
        unsafe { ffi::opus_decoder_ctl(raw, request, out) }
    }
}

/// One native encoder or decoder state, exclusively owned.
pub(crate) struct Session<C: NativeCodec> {
    raw: Option<NonNull<C::Raw>>,
    sample_rate: SampleRate,
    channels: Channels,
    _codec: PhantomData<C>,
}

// Safety: the native state has no thread affinity. The session is not Sync,
// so it is never touched from two threads at once.
unsafe impl<C: NativeCodec> Send for Session<C> {}

impl<C: NativeCodec> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("kind", &C::KIND)
            .field("sample_rate", &self.sample_rate.hz())
            .field("channels", &self.channels.count())
            .field("released", &self.is_released())
            .finish()
    }
}

impl<C: NativeCodec> Drop for Session<C> {
    fn drop(&mut self) {
        self.release();
    }
}

impl Session<EncoderCodec> {
    /// Creates a native encoder.
    pub(crate) fn encoder(
        sample_rate: SampleRate,
        channels: Channels,
        application: c_int,
    ) -> Result<Self> {
        let mut error: c_int = 0;
        let raw = unsafe {
            ffi::opus_encoder_create(sample_rate.hz(), channels.count(), application, &mut error)
        };
        Self::from_raw("opus_encoder_create", raw, error, sample_rate, channels)
    }
}

impl Session<DecoderCodec> {
    /// Creates a native decoder.
    pub(crate) fn decoder(sample_rate: SampleRate, channels: Channels) -> Result<Self> {
        let mut error: c_int = 0;
        let raw =
            unsafe { ffi::opus_decoder_create(sample_rate.hz(), channels.count(), &mut error) };
        Self::from_raw("opus_decoder_create", raw, error, sample_rate, channels)
    }
}

impl<C: NativeCodec> Session<C> {
    fn from_raw(
        op: &'static str,
        raw: *mut C::Raw,
        error: c_int,
        sample_rate: SampleRate,
        channels: Channels,
    ) -> Result<Self> {
        if let Err(err) = check(op, error) {
            if let Some(raw) = NonNull::new(raw) {
                unsafe { C::destroy(raw.as_ptr()) };
            }
            return Err(err);
        }

        let raw = NonNull::new(raw).ok_or(Error::Native {
            op,
            kind: ErrorKind::OutOfMemory,
            code: ErrorKind::OutOfMemory.code(),
        })?;

        debug!(
            "opus: created {} ({} Hz, {} ch)",
            C::KIND,
            sample_rate.hz(),
            channels.count()
        );

        Ok(Self {
            raw: Some(raw),
            sample_rate,
            channels,
            _codec: PhantomData,
        })
    }

    /// Returns the native pointer, or an error once released.
    pub(crate) fn as_ptr(&self) -> Result<*mut C::Raw> {
        self.raw
            .map(NonNull::as_ptr)
            .ok_or(Error::Released(C::KIND))
    }

    pub(crate) fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub(crate) fn channels(&self) -> Channels {
        self.channels
    }

    /// Reads an integer parameter.
    pub(crate) fn get(&self, request: c_int) -> Result<i32> {
        let raw = self.as_ptr()?;
        let mut value: i32 = 0;
        check(C::CTL_OP, unsafe { C::ctl_get(raw, request, &mut value) })?;
        Ok(value)
    }

    /// Reads an unsigned parameter.
    pub(crate) fn get_u32(&self, request: c_int) -> Result<u32> {
        let raw = self.as_ptr()?;
        let mut value: u32 = 0;
        check(C::CTL_OP, unsafe { C::ctl_get_u32(raw, request, &mut value) })?;
        Ok(value)
    }

    /// Writes an integer parameter.
    pub(crate) fn set(&mut self, request: c_int, value: i32) -> Result<()> {
        let raw = self.as_ptr()?;
        check(C::CTL_OP, unsafe { C::ctl_set(raw, request, value) })?;
        Ok(())
    }

    /// Resets the native state as if freshly created. Parameters that libopus
    /// keeps across a reset (bitrate, gain, ...) are left untouched.
    pub(crate) fn reset(&mut self) -> Result<()> {
        let raw = self.as_ptr()?;
        check(C::CTL_OP, unsafe { C::ctl(raw, ffi::OPUS_RESET_STATE) })?;
        debug!("opus: reset {} state", C::KIND);
        Ok(())
    }

    /// Destroys the native state. Calling this again is a no-op.
    pub(crate) fn release(&mut self) {
        if let Some(raw) = self.raw.take() {
            unsafe { C::destroy(raw.as_ptr()) };
            debug!("opus: released {}", C::KIND);
        }
    }

    pub(crate) fn is_released(&self) -> bool {
        self.raw.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn test_session_is_send() {
        assert_send::<Session<EncoderCodec>>();
        assert_send::<Session<DecoderCodec>>();
    }

    #[test]
    fn test_decoder_session_create() {
        let session = Session::decoder(SampleRate::Hz16000, Channels::Stereo).unwrap();
        assert!(!session.is_released());
        assert_eq!(session.sample_rate(), SampleRate::Hz16000);
        assert_eq!(session.channels(), Channels::Stereo);
        assert_eq!(session.get(ffi::OPUS_GET_SAMPLE_RATE_REQUEST).unwrap(), 16000);
    }

    #[test]
    fn test_encoder_session_create() {
        let session = Session::encoder(
            SampleRate::Hz48000,
            Channels::Mono,
            ffi::OPUS_APPLICATION_AUDIO,
        )
        .unwrap();
        assert_eq!(session.get(ffi::OPUS_GET_SAMPLE_RATE_REQUEST).unwrap(), 48000);
    }

    #[test]
    fn test_encoder_session_bad_application() {
        let err = Session::encoder(SampleRate::Hz48000, Channels::Mono, 1234).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_session_debug() {
        let mut session = Session::decoder(SampleRate::Hz24000, Channels::Mono).unwrap();
        assert_eq!(
            format!("{:?}", session),
            "Session { kind: Decoder, sample_rate: 24000, channels: 1, released: false }"
        );
        session.release();
        assert!(format!("{:?}", session).ends_with("released: true }"));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut session = Session::decoder(SampleRate::Hz8000, Channels::Mono).unwrap();
        session.release();
        assert!(session.is_released());
        session.release();
        assert!(session.is_released());
    }

    #[test]
    fn test_use_after_release() {
        let mut session = Session::decoder(SampleRate::Hz8000, Channels::Mono).unwrap();
        session.release();

        assert_eq!(
            session.get(ffi::OPUS_GET_SAMPLE_RATE_REQUEST).unwrap_err(),
            Error::Released(CodecKind::Decoder)
        );
        assert_eq!(
            session.set(ffi::OPUS_SET_GAIN_REQUEST, 10).unwrap_err(),
            Error::Released(CodecKind::Decoder)
        );
        assert_eq!(
            session.reset().unwrap_err(),
            Error::Released(CodecKind::Decoder)
        );
        assert!(session.as_ptr().is_err());
    }

    #[test]
    fn test_unsupported_request() {
        let session = Session::decoder(SampleRate::Hz16000, Channels::Mono).unwrap();
        // OPUS_GET_BITRATE is an encoder-only request
        let err = session.get(ffi::OPUS_GET_BITRATE_REQUEST).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedRequest);
    }
}
