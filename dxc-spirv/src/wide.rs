//! Multibyte (UTF-8) to wide string conversion.
//!
//! The compiler interface takes arguments as `wchar_t` strings. Windows
//! converts with the system; other platforms use [`PortableConverter`], which
//! follows the contract of `MultiByteToWideChar` closely enough for callers
//! to stay platform agnostic:
//!
//! - The return value counts the units written including the terminator;
//! - An empty destination queries the required number of units;
//! - Failures carry the platform error code in [`ConversionError::code`].
use std::str;

use thiserror::Error;

/// Width of `wchar_t` on the target.
#[cfg(windows)]
pub type WideChar = u16;
#[cfg(not(windows))]
pub type WideChar = u32;

pub const ERROR_INVALID_PARAMETER: u32 = 87;
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;
pub const ERROR_NO_UNICODE_TRANSLATION: u32 = 1113;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("insufficient buffer: {required} units required, {capacity} available")]
    InsufficientBuffer { required: usize, capacity: usize },
    #[error("no mapping for the multibyte sequence")]
    NoUnicodeTranslation,
}
impl ConversionError {
    /// The error code the native routine would leave in its last-error slot.
    pub fn code(&self) -> u32 {
        match self {
            ConversionError::InvalidParameter => ERROR_INVALID_PARAMETER,
            ConversionError::InsufficientBuffer { .. } => ERROR_INSUFFICIENT_BUFFER,
            ConversionError::NoUnicodeTranslation => ERROR_NO_UNICODE_TRANSLATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLength {
    /// Convert up to the first NUL, or the end of the slice.
    NulTerminated,
    /// Convert the first `n` bytes. Zero is rejected.
    Bytes(usize),
}

pub trait WideConverter {
    /// Convert `src` into `dst` and return the number of units written,
    /// terminator included. With an empty `dst` nothing is written and the
    /// required number of units is returned.
    fn multi_byte_to_wide(
        &self,
        src: &[u8],
        len: SourceLength,
        dst: &mut [WideChar],
    ) -> Result<usize, ConversionError>;

    /// Query the size, then convert into a fresh NUL-terminated buffer.
    fn to_wide(&self, s: &str) -> Result<Vec<WideChar>, ConversionError> {
        let src = s.as_bytes();
        let required = self.multi_byte_to_wide(src, SourceLength::NulTerminated, &mut [])?;
        let mut buf = vec![0; required];
        let written = self.multi_byte_to_wide(src, SourceLength::NulTerminated, &mut buf)?;
        buf.truncate(written);
        Ok(buf)
    }
}

/// Pick the source text out of `src`. An explicit length that doesn't end
/// in NUL is treated as if a terminator followed it; nothing past the
/// length is ever read.
fn source_text(src: &[u8], len: SourceLength) -> Result<&str, ConversionError> {
    let window = match len {
        SourceLength::NulTerminated => src,
        SourceLength::Bytes(0) => return Err(ConversionError::InvalidParameter),
        SourceLength::Bytes(n) => src.get(..n)
            .ok_or(ConversionError::InvalidParameter)?,
    };
    let text = match window.iter().position(|&x| x == 0) {
        Some(nul) => &window[..nul],
        None => window,
    };
    str::from_utf8(text).map_err(|_| ConversionError::NoUnicodeTranslation)
}

fn write_terminated<I>(units: I, dst: &mut [WideChar]) -> Result<usize, ConversionError>
where
    I: Iterator<Item = WideChar> + Clone,
{
    let required = units.clone().count() + 1;
    if dst.is_empty() {
        return Ok(required);
    }
    if dst.len() < required {
        return Err(ConversionError::InsufficientBuffer { required, capacity: dst.len() });
    }
    let mut n = 0;
    for unit in units {
        dst[n] = unit;
        n += 1;
    }
    dst[n] = 0;
    Ok(n + 1)
}

/// Converter that only relies on the standard library's UTF-8 decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableConverter;

#[cfg(windows)]
fn encode_units(text: &str) -> impl Iterator<Item = WideChar> + Clone + '_ {
    text.encode_utf16()
}
#[cfg(not(windows))]
fn encode_units(text: &str) -> impl Iterator<Item = WideChar> + Clone + '_ {
    text.chars().map(|c| c as WideChar)
}

impl WideConverter for PortableConverter {
    fn multi_byte_to_wide(
        &self,
        src: &[u8],
        len: SourceLength,
        dst: &mut [WideChar],
    ) -> Result<usize, ConversionError> {
        let text = source_text(src, len)?;
        write_terminated(encode_units(text), dst)
    }
}

/// Converter backed by the operating system's wide string encoding.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeConverter;

#[cfg(windows)]
impl WideConverter for NativeConverter {
    fn multi_byte_to_wide(
        &self,
        src: &[u8],
        len: SourceLength,
        dst: &mut [WideChar],
    ) -> Result<usize, ConversionError> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;

        let text = source_text(src, len)?;
        write_terminated(OsStr::new(text).encode_wide(), dst)
    }
}

/// The converter for the platform this crate was built for.
#[cfg(windows)]
pub fn platform_converter() -> &'static dyn WideConverter {
    &NativeConverter
}
#[cfg(not(windows))]
pub fn platform_converter() -> &'static dyn WideConverter {
    &PortableConverter
}
