//! Error taxonomy and result-code translation
//!
//! Every native call returns an integer result code. `check` turns a non-OK
//! code into an [`Error`] carrying the code and its description; OK never
//! reaches the translator.
//!
//! Descriptions come from the static table in [`codes`] first, then from the
//! native `FT_Error_String` when the bound library exports it.

pub mod codes;

pub use codes::{ErrorCategory, ErrorDescriptor};

use crate::config::ConfigError;
use crate::interop::{Binder, Signature};
use crate::lifecycle::HandleKind;
use crate::logging;
use std::borrow::Cow;
use thiserror::Error;

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Text used when neither the table nor the native library knows a code
pub const NO_DESCRIPTION: &str = "no description available";

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// `FT_Init_FreeType` returned non-OK
    #[error("FreeType initialization failed ({code:#04x}): {}", text(.description))]
    Init {
        code: i32,
        description: Option<Cow<'static, str>>,
    },

    /// A handle-scoped native call returned non-OK
    #[error("{operation} failed ({code:#04x}): {}", text(.description))]
    Operation {
        operation: &'static str,
        code: i32,
        description: Option<Cow<'static, str>>,
    },

    /// Misuse detected before any native call was made
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The native library or one of its required symbols is unavailable
    #[error(transparent)]
    Binding(#[from] BindError),

    /// Reading font bytes failed
    #[error("failed to read font data: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Native result code carried by this error, if any
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Init { code, .. } | Self::Operation { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Category of the carried result code
    pub fn category(&self) -> Option<ErrorCategory> {
        self.code().and_then(ErrorCategory::of_code)
    }

    /// Human-readable description of the carried result code
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Init { description, .. } | Self::Operation { description, .. } => {
                Some(text(description))
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    pub(crate) fn init(code: i32, native: &Binder) -> Self {
        Self::Init { code, description: translate(code, Some(native)) }
    }

    pub(crate) fn operation(operation: &'static str, code: i32, native: &Binder) -> Self {
        Self::Operation { operation, code, description: translate(code, Some(native)) }
    }
}

/// Misuse of a handle, rejected locally
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("{0} handle is closed")]
    Closed(HandleKind),

    #[error("{0} handle is already closed")]
    AlreadyClosed(HandleKind),

    #[error("{0} handle is a borrowed view and cannot be released")]
    NotOwner(HandleKind),

    #[error("{0} address is null")]
    NullHandle(HandleKind),

    #[error("charmap belongs to face {found:#x}, not to face {expected:#x}")]
    ParentMismatch { expected: usize, found: usize },

    #[error("path cannot be passed to FreeType: {0}")]
    InvalidPath(String),

    #[error("font buffer of {0} bytes exceeds the native size limit")]
    BufferTooLarge(usize),

    #[error("named instance index {0} does not fit in 15 bits")]
    InvalidFaceIndex(u32),

    #[error("26.6 value {0} does not fit the native long")]
    SizeOutOfRange(i64),
}

/// Failure to load the native library or bind its entry points
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("could not load FreeType (tried {}): {reason}", .tried.join(", "))]
    LibraryNotFound { tried: Vec<String>, reason: String },

    #[error("required symbol `{0}` is missing")]
    MissingSymbol(&'static str),

    #[error("symbol `{symbol}` declared as `{expected}` but bound as `{found}`")]
    SignatureMismatch {
        symbol: &'static str,
        expected: Signature,
        found: Signature,
    },

    #[error("invalid symbol or library name `{0}`")]
    InvalidName(String),
}

/// Describe a result code: static table first, then `FT_Error_String`
pub fn translate(code: i32, native: Option<&Binder>) -> Option<Cow<'static, str>> {
    if let Some(descriptor) = codes::describe(code) {
        return Some(Cow::Borrowed(descriptor.message));
    }
    native.and_then(|n| n.error_string(code)).map(Cow::Owned)
}

/// Two-step failure protocol for a native result code
#[inline]
pub(crate) fn check(operation: &'static str, code: i32, native: &Binder) -> Result<()> {
    if code == codes::OK {
        return Ok(());
    }
    let error = Error::operation(operation, code, native);
    logging::log_ffi_error(operation, code, error.description().unwrap_or(NO_DESCRIPTION));
    Err(error)
}

fn text<'a>(description: &'a Option<Cow<'static, str>>) -> &'a str {
    description.as_deref().unwrap_or(NO_DESCRIPTION)
}
