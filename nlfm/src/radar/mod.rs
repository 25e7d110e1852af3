//! NLFM pulse design.
//!
//! A linear chirp sweeps every frequency at the same rate and therefore has
//! a flat spectrum. Here the chirp rate `γ(t)` is bent so that time spent
//! near a frequency, and with it spectral power, follows a target window:
//!
//! 1. [`lookup`] maps frequency offsets from `f0` onto window samples.
//! 2. [`solver`] scales the nominal rate `Ω/T`, reshapes it through the
//!    lookup, and searches for the scale whose bent curve still sweeps `Ω`.
//! 3. [`integrate`] turns `γ(t)` into frequency `ω(t)` and phase `φ(t)`.
//! 4. [`synth`] produces `exp(i·2π·φ(t))` and handles upconversion.
//!
//! [`design_chirp`] runs the whole pipeline with default controls;
//! [`ChirpDesigner`] exposes the knobs. Undersampling and solver
//! non-convergence are reported as [`DesignWarning`]s on the result rather
//! than as errors.
//!
//! [`polynomial`] describes chirps by phase coefficients and fits them to a
//! design, [`detection`] holds required-SNR formulas, and `analysis`
//! (with `std`) checks spectra and autocorrelations of designed pulses.

pub mod config;
pub mod detection;
pub mod diagnostics;
pub mod integrate;
pub mod lookup;
pub mod polynomial;
pub mod solver;
pub mod synth;
pub mod traits;

#[cfg(feature = "std")]
pub mod analysis;

mod designer;

pub use config::{ChirpConfig, ChirpSpec, TimeGrid};
pub use designer::{design_chirp, ChirpDesign, ChirpDesigner, ChirpDesignerConfig, SolverSummary};
pub use diagnostics::DesignWarning;
pub use lookup::{SpectralWindow, WindowDomain, WindowLookupKernel};
pub use solver::{ChirpRateSolver, OptimizationState, SolverControls};
pub use synth::{upconvert, Upconverter, WaveformSynthesizer};
