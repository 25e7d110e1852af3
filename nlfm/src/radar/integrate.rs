//! First-order running integration of chirp rate and frequency.

use crate::kernel::{
    bind_output, require_positive, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D,
    Write1D,
};
use alloc::vec::Vec;
use nalgebra::RealField;
use ndarray::ArrayView1;
use nlfm_core::num_rs::{cumsum, trapz};

use super::traits::CumulativeIntegrate1D;

/// Constructor config for [`PhaseIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseIntegratorConfig<F> {
    /// Grid spacing `dt` in seconds.
    pub step: F,
}

/// First-order running integral `y[i] = dt * sum(x[..=i])`.
///
/// Used for both hops of the pipeline: chirp rate to frequency on the
/// `T/(N-1)` solver grid, and frequency to phase at `1/Fs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseIntegrator<F> {
    step: F,
}

impl<F> KernelLifecycle for PhaseIntegrator<F>
where
    F: RealField + Copy,
{
    type Config = PhaseIntegratorConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            step: require_positive("step", config.step)?,
        })
    }
}

impl<F> PhaseIntegrator<F>
where
    F: RealField + Copy,
{
    /// Grid spacing.
    pub fn step(&self) -> F {
        self.step
    }

    /// Trapezoidal area under `input`, the swept bandwidth of a chirp-rate
    /// curve.
    pub fn area<I>(&self, input: &I) -> Result<F, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        Ok(trapz(ArrayView1::from(input), self.step))
    }

    /// Integrate, then shift the result so `out[index] == reference`.
    pub fn run_centered<I>(
        &self,
        input: &I,
        index: usize,
        reference: F,
    ) -> Result<Vec<F>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
    {
        let mut out = self.run_alloc(input)?;
        recenter(&mut out, index, reference)?;
        Ok(out)
    }
}

/// Shift `values` so that `values[index] == reference`.
pub fn recenter<F>(values: &mut [F], index: usize, reference: F) -> Result<(), ExecInvariantViolation>
where
    F: RealField + Copy,
{
    let anchor = *values.get(index).ok_or(ExecInvariantViolation::InvalidState {
        reason: "recenter index lies outside the trajectory",
    })?;
    let shift = reference - anchor;
    values.iter_mut().for_each(|v| *v += shift);
    Ok(())
}

impl<F> CumulativeIntegrate1D<F> for PhaseIntegrator<F>
where
    F: RealField + Copy,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
        O: Write1D<F> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = bind_output(out, input.len())?;
        let integrated = cumsum(ArrayView1::from(input), self.step);
        out.iter_mut()
            .zip(integrated.iter())
            .for_each(|(o, &v)| *o = v);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<F>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        Ok(cumsum(ArrayView1::from(input), self.step).to_vec())
    }
}
