//! Pulse parameters and the sampled time grid.

use crate::kernel::{require_finite, require_positive, scalar, ConfigError, KernelLifecycle};
use alloc::vec::Vec;
use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Default order of the phase polynomial in coefficient mode.
pub const DEFAULT_POLYNOMIAL_ORDER: usize = 8;

/// Smallest phase polynomial order: reference phase, frequency and chirp rate.
pub const MIN_POLYNOMIAL_ORDER: usize = 3;

/// Constructor config for [`ChirpSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChirpConfig<F> {
    /// Pulse duration `T` in seconds.
    pub duration_s: F,
    /// Sample rate `Fs` in Hz.
    pub sample_rate_hz: F,
    /// Target swept bandwidth `Ω` in Hz.
    pub bandwidth_hz: F,
    /// Center frequency `f0` in Hz.
    pub center_hz: F,
    /// Whether the target spectrum is symmetric about `f0`.
    pub symmetric: bool,
    /// Phase polynomial order used when fitting coefficients.
    pub polynomial_order: usize,
}

impl<F> ChirpConfig<F> {
    /// Symmetric config with the default polynomial order.
    pub fn new(duration_s: F, bandwidth_hz: F, center_hz: F, sample_rate_hz: F) -> Self {
        Self {
            duration_s,
            sample_rate_hz,
            bandwidth_hz,
            center_hz,
            symmetric: true,
            polynomial_order: DEFAULT_POLYNOMIAL_ORDER,
        }
    }
}

/// Uniform time axis spanning `[-T/2, T/2]` inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid<F> {
    len: usize,
    start: F,
    step: F,
}

impl<F> TimeGrid<F>
where
    F: RealField + Copy + ToPrimitive,
{
    /// Build the grid of `floor(Fs·T)` samples for a pulse.
    pub fn try_new(duration_s: F, sample_rate_hz: F) -> Result<Self, ConfigError> {
        let duration_s = require_positive("duration_s", duration_s)?;
        let sample_rate_hz = require_positive("sample_rate_hz", sample_rate_hz)?;
        let len = (sample_rate_hz * duration_s)
            .floor()
            .to_usize()
            .ok_or(ConfigError::InvalidArgument {
                arg: "sample_rate_hz",
                reason: "sample count floor(Fs*T) does not fit in usize",
            })?;
        if len < 2 {
            return Err(ConfigError::TooFewSamples {
                arg: "time_grid",
                min: 2,
                got: len,
            });
        }

        let two: F = scalar("two", 2.0)?;
        let intervals = F::from_usize(len - 1).ok_or(ConfigError::InvalidArgument {
            arg: "time_grid",
            reason: "sample count is not representable",
        })?;
        Ok(Self {
            len,
            start: -duration_s / two,
            step: duration_s / intervals,
        })
    }

    /// Number of samples `N`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; grids hold at least two samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Spacing `T/(N-1)`.
    pub fn step(&self) -> F {
        self.step
    }

    /// First time instant, `-T/2`.
    pub fn start(&self) -> F {
        self.start
    }

    /// Index of the sample treated as `t = 0`, `N/2`.
    pub fn center_index(&self) -> usize {
        self.len / 2
    }

    /// Materialize the time instants.
    pub fn times(&self) -> Vec<F> {
        let mut k = F::zero();
        (0..self.len)
            .map(|_| {
                let t = self.start + k * self.step;
                k += F::one();
                t
            })
            .collect()
    }
}

/// Validated chirp request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChirpSpec<F> {
    duration_s: F,
    sample_rate_hz: F,
    bandwidth_hz: F,
    center_hz: F,
    symmetric: bool,
    polynomial_order: usize,
    grid: TimeGrid<F>,
}

impl<F> KernelLifecycle for ChirpSpec<F>
where
    F: RealField + Copy + ToPrimitive,
{
    type Config = ChirpConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let bandwidth_hz = require_positive("bandwidth_hz", config.bandwidth_hz)?;
        let center_hz = require_finite("center_hz", config.center_hz)?;
        if config.polynomial_order < MIN_POLYNOMIAL_ORDER {
            return Err(ConfigError::InvalidArgument {
                arg: "polynomial_order",
                reason: "polynomial order must be >= 3",
            });
        }
        let grid = TimeGrid::try_new(config.duration_s, config.sample_rate_hz)?;

        Ok(Self {
            duration_s: config.duration_s,
            sample_rate_hz: config.sample_rate_hz,
            bandwidth_hz,
            center_hz,
            symmetric: config.symmetric,
            polynomial_order: config.polynomial_order,
            grid,
        })
    }
}

impl<F> ChirpSpec<F>
where
    F: Copy,
{
    /// Pulse duration `T` in seconds.
    pub fn duration_s(&self) -> F {
        self.duration_s
    }

    /// Sample rate `Fs` in Hz.
    pub fn sample_rate_hz(&self) -> F {
        self.sample_rate_hz
    }

    /// Target swept bandwidth `Ω` in Hz.
    pub fn bandwidth_hz(&self) -> F {
        self.bandwidth_hz
    }

    /// Center frequency `f0` in Hz.
    pub fn center_hz(&self) -> F {
        self.center_hz
    }

    /// Symmetric target spectrum flag.
    pub fn symmetric(&self) -> bool {
        self.symmetric
    }

    /// Phase polynomial order.
    pub fn polynomial_order(&self) -> usize {
        self.polynomial_order
    }

    /// Time axis of the pulse.
    pub fn grid(&self) -> &TimeGrid<F> {
        &self.grid
    }
}
