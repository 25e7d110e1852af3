//! Crate-level error type.

use crate::kernel::{ConfigError, ExecInvariantViolation};
use core::{error, fmt};

/// Errors raised whilst designing a chirp.
///
/// Only hard failures are represented here. Diagnostics that still leave a
/// usable waveform (undersampling, solver non-convergence) are attached to
/// the design result instead, see `radar::DesignWarning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request was rejected before any work was done.
    Config(ConfigError),
    /// A kernel was driven with inconsistent buffers.
    Exec(ExecInvariantViolation),
    /// A numeric primitive rejected its input.
    Numeric(nlfm_core::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "Configuration error: {err}"),
            Error::Exec(err) => write!(f, "{err}"),
            Error::Numeric(err) => write!(f, "Numeric error: {err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            #[cfg(feature = "std")]
            Error::Config(err) => Some(err),
            #[cfg(feature = "std")]
            Error::Exec(err) => Some(err),
            #[cfg(feature = "std")]
            Error::Numeric(err) => Some(err),
            #[cfg(not(feature = "std"))]
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Error::Config(value)
    }
}

impl From<ExecInvariantViolation> for Error {
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::Config(err) => Error::Config(err),
            other => Error::Exec(other),
        }
    }
}

impl From<nlfm_core::Error> for Error {
    fn from(value: nlfm_core::Error) -> Self {
        Error::Numeric(value)
    }
}
