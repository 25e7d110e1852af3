//! Capability traits for the chirp-design pipeline stages.

use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};
use alloc::vec::Vec;
use nalgebra::Complex;

use super::lookup::WindowDomain;

/// Map frequency offsets onto target spectral magnitudes.
pub trait WindowLookup1D<F> {
    /// Look up one magnitude per offset, writing into `out`.
    ///
    /// `domain` is the frequency span the window is stretched over for this
    /// query batch.
    fn run_into<I, O>(
        &self,
        offsets: &I,
        domain: WindowDomain<F>,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
        O: Write1D<F> + ?Sized;

    /// Look up one magnitude per offset and allocate the output.
    fn run_alloc<I>(
        &self,
        offsets: &I,
        domain: WindowDomain<F>,
    ) -> Result<Vec<F>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized;
}

/// First-order running integration on a uniform grid.
pub trait CumulativeIntegrate1D<F> {
    /// Integrate `input` into a caller-provided buffer of the same length.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
        O: Write1D<F> + ?Sized;

    /// Integrate `input` and allocate the output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<F>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized;
}

/// Unit-magnitude phase modulation, phase in cycles to complex samples.
pub trait PhaseModulate1D<F> {
    /// Modulate `phase` into a caller-provided complex buffer.
    fn run_into<I, O>(&self, phase: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
        O: Write1D<Complex<F>> + ?Sized;

    /// Modulate `phase` and allocate the output.
    fn run_alloc<I>(&self, phase: &I) -> Result<Vec<Complex<F>>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized;
}

/// Frequency translation of complex baseband samples.
pub trait Upconvert1D<F> {
    /// Translate `samples` into a caller-provided buffer.
    fn run_into<I, O>(&self, samples: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<Complex<F>> + ?Sized,
        O: Write1D<Complex<F>> + ?Sized;

    /// Translate `samples` and allocate the output.
    fn run_alloc<I>(&self, samples: &I) -> Result<Vec<Complex<F>>, ExecInvariantViolation>
    where
        I: Read1D<Complex<F>> + ?Sized;
}
