//! Target spectral envelope lookup by frequency offset.

use crate::kernel::{
    bind_output, scalar, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D,
};
use alloc::vec::Vec;
use itertools::{Itertools, MinMaxResult};
use nalgebra::RealField;
use num_traits::ToPrimitive;

use super::traits::WindowLookup1D;

/// Floor applied to every window sample so the chirp rate stays bounded.
pub const WINDOW_FLOOR: f64 = 1e-8;

/// Target spectral envelope sampled on a uniform frequency-offset axis.
///
/// Samples are floored at [`WINDOW_FLOOR`]; negative inputs are floored too.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralWindow<F> {
    samples: Vec<F>,
    min: F,
    max: F,
}

impl<F> SpectralWindow<F>
where
    F: RealField + Copy,
{
    /// Validate and floor window samples.
    pub fn try_new(samples: &[F]) -> Result<Self, ConfigError> {
        if samples.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "window" });
        }
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite { arg: "window" });
        }
        let floor: F = scalar("window_floor", WINDOW_FLOOR)?;
        let samples: Vec<F> = samples.iter().map(|&v| v.max(floor)).collect();
        let (min, max) = match samples.iter().minmax() {
            MinMaxResult::MinMax(lo, hi) => (*lo, *hi),
            MinMaxResult::OneElement(v) => (*v, *v),
            MinMaxResult::NoElements => return Err(ConfigError::EmptyInput { arg: "window" }),
        };
        Ok(Self { samples, min, max })
    }

    /// Number of samples `L`.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; empty windows are rejected.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Floored samples.
    pub fn as_slice(&self) -> &[F] {
        &self.samples
    }

    /// Bin mapped to zero offset, `L/2`.
    pub fn center_index(&self) -> usize {
        self.samples.len() / 2
    }

    /// Smallest floored sample.
    pub fn min(&self) -> F {
        self.min
    }

    /// Largest floored sample.
    pub fn max(&self) -> F {
        self.max
    }
}

/// Frequency-offset span `[lower, upper]` the window is stretched over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowDomain<F> {
    /// Offset mapped onto the first bin edge.
    pub lower: F,
    /// Offset mapped onto the last bin edge.
    pub upper: F,
}

impl<F> WindowDomain<F>
where
    F: RealField + Copy,
{
    /// Explicit span.
    pub fn new(lower: F, upper: F) -> Self {
        Self { lower, upper }
    }

    /// Span of `values - reference`, i.e. the excursion of a frequency
    /// trajectory around the center frequency.
    pub fn from_excursion(values: &[F], reference: F) -> Self {
        match values.iter().minmax() {
            MinMaxResult::MinMax(lo, hi) => Self::new(*lo - reference, *hi - reference),
            MinMaxResult::OneElement(v) => Self::new(*v - reference, *v - reference),
            MinMaxResult::NoElements => Self::new(F::zero(), F::zero()),
        }
    }

    /// `upper - lower`.
    pub fn width(&self) -> F {
        self.upper - self.lower
    }
}

/// Constructor config for [`WindowLookupKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowLookupConfig<F> {
    /// Raw target envelope samples.
    pub window: Vec<F>,
}

/// Nearest-bin, clamped lookup of a [`SpectralWindow`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowLookupKernel<F> {
    window: SpectralWindow<F>,
}

impl<F> KernelLifecycle for WindowLookupKernel<F>
where
    F: RealField + Copy,
{
    type Config = WindowLookupConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            window: SpectralWindow::try_new(&config.window)?,
        })
    }
}

impl<F> WindowLookupKernel<F>
where
    F: RealField + Copy + ToPrimitive,
{
    /// Wrap an already validated window.
    pub fn from_window(window: SpectralWindow<F>) -> Self {
        Self { window }
    }

    /// Underlying floored window.
    pub fn window(&self) -> &SpectralWindow<F> {
        &self.window
    }

    /// Magnitude at a single frequency offset.
    ///
    /// `index = round(offset / binWidth) + L/2`, clamped into `[0, L-1]`,
    /// with `binWidth = (upper - lower) / (L - 1)`. Offsets beyond the
    /// domain saturate at the edge bins. One-sample windows and zero-width
    /// domains always return the center sample.
    ///
    /// Ratios within rounding noise of a half bin are treated as exact
    /// halves and round away from zero.
    pub fn value_at(&self, offset: F, domain: WindowDomain<F>) -> F {
        let samples = self.window.as_slice();
        let center = self.window.center_index();
        let last = samples.len() - 1;
        if last == 0 {
            return samples[center];
        }

        let bin_width = match F::from_usize(last) {
            Some(bins) => domain.width() / bins,
            None => return samples[center],
        };
        if !bin_width.is_finite() || bin_width <= F::zero() {
            return samples[center];
        }

        let ratio = snap_half_bin(offset / bin_width).round();
        let index = match ratio.to_isize() {
            Some(k) => k
                .saturating_add(center as isize)
                .clamp(0, last as isize) as usize,
            None if ratio > F::zero() => last,
            None if ratio < F::zero() => 0,
            None => center,
        };
        samples[index]
    }
}

/// Snap `ratio` onto the nearest multiple of one half when it lies within
/// `sqrt(eps)` (relative) of it.
///
/// Grid offsets land on exact half bins for some pulse lengths; integration
/// noise on top of them would otherwise pick a side that changes with scale.
fn snap_half_bin<F>(ratio: F) -> F
where
    F: RealField + Copy,
{
    let two = F::one() + F::one();
    let doubled = ratio * two;
    let nearest = doubled.round();
    let tolerance = F::default_epsilon().sqrt() * doubled.abs().max(F::one());
    if (doubled - nearest).abs() <= tolerance {
        nearest / two
    } else {
        ratio
    }
}

impl<F> WindowLookup1D<F> for WindowLookupKernel<F>
where
    F: RealField + Copy + ToPrimitive,
{
    fn run_into<I, O>(
        &self,
        offsets: &I,
        domain: WindowDomain<F>,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
        O: Write1D<F> + ?Sized,
    {
        let offsets = offsets.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = bind_output(out, offsets.len())?;
        out.iter_mut()
            .zip(offsets.iter())
            .for_each(|(o, &offset)| *o = self.value_at(offset, domain));
        Ok(())
    }

    fn run_alloc<I>(
        &self,
        offsets: &I,
        domain: WindowDomain<F>,
    ) -> Result<Vec<F>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
    {
        let offsets = offsets.read_slice().map_err(ExecInvariantViolation::from)?;
        Ok(offsets
            .iter()
            .map(|&offset| self.value_at(offset, domain))
            .collect())
    }
}
