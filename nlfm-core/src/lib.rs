//! numpy-style 1D primitives shared by the `nlfm` crate.
//!
//! The routines here mirror the numpy behaviour they are named after so the
//! chirp-design pipeline keeps numerical parity with array-language
//! prototypes: `cumsum`-based first-order integration, `trapz` and
//! `gradient`.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

use core::fmt;

pub mod num_rs;

/// Errors raised by `nlfm-core` primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a function was invalid.
    #[cfg(feature = "alloc")]
    InvalidArg {
        /// The invalid arg
        arg: alloc::string::String,
        /// Explaining why arg is invalid.
        reason: alloc::string::String,
    },
    /// Argument passed into a function was invalid.
    #[cfg(not(feature = "alloc"))]
    InvalidArg {
        /// The invalid arg
        arg: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "alloc")]
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            #[cfg(not(feature = "alloc"))]
            Error::InvalidArg { arg } => write!(f, "Invalid argument `{arg}`."),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result alias for `nlfm-core` primitives.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "alloc")]
pub(crate) fn invalid_arg(arg: &str, reason: &str) -> Error {
    use alloc::string::ToString;
    Error::InvalidArg {
        arg: arg.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(not(feature = "alloc"))]
pub(crate) fn invalid_arg(arg: &'static str, _reason: &str) -> Error {
    Error::InvalidArg { arg }
}
