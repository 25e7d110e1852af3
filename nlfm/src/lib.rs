//! Non-linear FM (NLFM) radar chirp design.
//!
//! A linear chirp has a flat power spectrum. Shaping the spectrum to a
//! window envelope is done here by bending the instantaneous chirp rate:
//! time spent at a frequency is made inversely proportional to the desired
//! spectral magnitude there. The [`radar`] module holds the pipeline
//! (window lookup, chirp-rate optimization, phase integration, waveform
//! synthesis) along with the usual collaborators (upconversion, detection
//! SNR formulas, spectral checks). [`signal::windows`] builds the target
//! envelopes.
//!
//! ```
//! use nlfm::radar::design_chirp;
//! use nlfm::signal::windows::{get_window, GetWindow, GetWindowBuilder};
//!
//! let window: Vec<f64> = get_window(GetWindowBuilder::Hamming, 64, Some(false)).get_window();
//! let design = design_chirp(&window, true, 1e-3, 10e3, 20e3, 200e3).unwrap();
//! assert_eq!(design.samples().len(), 200);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// Re-export nalgebra for downstream scalar bounds.
pub use nalgebra as na;

pub mod error;
pub use error::Error;

pub mod kernel;

#[cfg(feature = "alloc")]
pub mod radar;

pub mod signal;
