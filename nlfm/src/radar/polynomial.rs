//! Phase-polynomial chirp description.
//!
//! `φ(t) = Σ cₙ·tⁿ/n!` with `c₀` the reference phase, `c₁` the reference
//! frequency and `c₂` the nominal chirp rate. Symmetric spectra only need
//! the even-phase terms beyond `c₂`, so odd `n ≥ 3` are pinned to zero.

use crate::kernel::{
    require_positive, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D,
};
use alloc::vec::Vec;
use nalgebra::{DMatrix, DVector, RealField};

use super::config::MIN_POLYNOMIAL_ORDER;

/// Singular values below this fraction of the largest are treated as zero.
const SVD_RCOND: f64 = 1e-12;

/// `Σ coefficients[n]·tⁿ/n!`.
fn taylor<F>(coefficients: &[F], t: F) -> F
where
    F: RealField + Copy,
{
    let mut term = F::one();
    let mut k = F::one();
    let mut sum = F::zero();
    for &c in coefficients {
        sum += c * term;
        term = term * t / k;
        k += F::one();
    }
    sum
}

/// Chirp described by phase polynomial coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialChirp<F> {
    coefficients: Vec<F>,
}

impl<F> PolynomialChirp<F>
where
    F: RealField + Copy,
{
    /// Wrap coefficients `c₀..`; with `symmetric`, odd `n ≥ 3` are zeroed.
    pub fn try_new(mut coefficients: Vec<F>, symmetric: bool) -> Result<Self, ConfigError> {
        if coefficients.is_empty() {
            return Err(ConfigError::EmptyInput {
                arg: "coefficients",
            });
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::NonFinite {
                arg: "coefficients",
            });
        }
        if symmetric {
            coefficients
                .iter_mut()
                .enumerate()
                .skip(3)
                .filter(|(n, _)| n % 2 == 1)
                .for_each(|(_, c)| *c = F::zero());
        }
        Ok(Self { coefficients })
    }

    /// Coefficients `c₀, c₁, ...`.
    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    /// Phase in cycles.
    pub fn phase(&self, time: &[F]) -> Vec<F> {
        self.derivative(time, 0)
    }

    /// Analytical instantaneous frequency in Hz.
    pub fn instantaneous_frequency(&self, time: &[F]) -> Vec<F> {
        self.derivative(time, 1)
    }

    /// Analytical chirp rate in Hz/s.
    pub fn chirp_rate(&self, time: &[F]) -> Vec<F> {
        self.derivative(time, 2)
    }

    fn derivative(&self, time: &[F], order: usize) -> Vec<F> {
        let tail = self.coefficients.get(order..).unwrap_or(&[]);
        time.iter().map(|&t| taylor(tail, t)).collect()
    }
}

/// Constructor config for [`PolynomialFitKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialFitConfig<F> {
    /// Number of coefficients `c₀..c_{order-1}`.
    pub order: usize,
    /// Pin odd `n ≥ 3` to zero.
    pub symmetric: bool,
    /// Pulse duration; the fit runs on `τ = t/(T/2)`.
    pub duration_s: F,
}

/// Least-squares fit of phase coefficients to a frequency trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialFitKernel<F> {
    order: usize,
    symmetric: bool,
    half_duration: F,
}

impl<F> KernelLifecycle for PolynomialFitKernel<F>
where
    F: RealField + Copy,
{
    type Config = PolynomialFitConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.order < MIN_POLYNOMIAL_ORDER {
            return Err(ConfigError::InvalidArgument {
                arg: "order",
                reason: "polynomial order must be >= 3",
            });
        }
        let duration_s = require_positive("duration_s", config.duration_s)?;
        Ok(Self {
            order: config.order,
            symmetric: config.symmetric,
            half_duration: duration_s / (F::one() + F::one()),
        })
    }
}

impl<F> PolynomialFitKernel<F>
where
    F: RealField + Copy,
{
    /// Frequency powers `k` (so `c_{k+1}`) that are free in the fit.
    fn free_powers(&self) -> Vec<usize> {
        (0..self.order - 1)
            .filter(|&k| !(self.symmetric && k >= 2 && k % 2 == 0))
            .collect()
    }

    /// Fit `c₁..c_{order-1}` to `frequency` sampled at `time`; `c₀ = 0`.
    pub fn run<I1, I2>(
        &self,
        time: &I1,
        frequency: &I2,
    ) -> Result<PolynomialChirp<F>, ExecInvariantViolation>
    where
        I1: Read1D<F> + ?Sized,
        I2: Read1D<F> + ?Sized,
    {
        let time = time.read_slice().map_err(ExecInvariantViolation::from)?;
        let frequency = frequency.read_slice().map_err(ExecInvariantViolation::from)?;
        if time.len() != frequency.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "frequency",
                expected: time.len(),
                got: frequency.len(),
            });
        }
        let powers = self.free_powers();
        if time.len() < powers.len() {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "fewer samples than free polynomial terms",
            });
        }

        // ω(t) = Σ a_k τ^k with τ = t/h and a_k = c_{k+1}·h^k/k!.
        let design = DMatrix::from_fn(time.len(), powers.len(), |row, col| {
            (time[row] / self.half_duration).powi(powers[col] as i32)
        });
        let target = DVector::from_column_slice(frequency);
        let rcond = F::from_f64(SVD_RCOND).ok_or(ExecInvariantViolation::InvalidState {
            reason: "scalar conversion failed",
        })?;
        let svd = design.svd(true, true);
        let cutoff = svd.singular_values.max() * rcond;
        let normalized = svd
            .solve(&target, cutoff)
            .map_err(|reason| ExecInvariantViolation::InvalidState { reason })?;

        let mut coefficients = alloc::vec![F::zero(); self.order];
        let mut factorial = F::one();
        let mut scale = F::one();
        let mut free = powers.iter().zip(normalized.iter()).peekable();
        for k in 0..self.order - 1 {
            if k > 0 {
                factorial *= F::from_usize(k).ok_or(ExecInvariantViolation::InvalidState {
                    reason: "scalar conversion failed",
                })?;
                scale *= self.half_duration;
            }
            if let Some((_, &a_k)) = free.next_if(|&(&power, _)| power == k) {
                coefficients[k + 1] = a_k * factorial / scale;
            }
        }

        PolynomialChirp::try_new(coefficients, self.symmetric)
            .map_err(ExecInvariantViolation::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn time_axis(n: usize, duration: f64) -> Vec<f64> {
        (0..n)
            .map(|i| -duration / 2.0 + duration * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn analytical_derivatives_follow_coefficients() {
        let chirp = PolynomialChirp::try_new(vec![0.0, 20e3, 10e6, 3e9], false).expect("chirp");
        let t = [0.0, 1e-4];
        let freq = chirp.instantaneous_frequency(&t);
        let rate = chirp.chirp_rate(&t);
        let phase = chirp.phase(&t);

        assert_relative_eq!(freq[0], 20e3, max_relative = 1e-12);
        assert_relative_eq!(freq[1], 20e3 + 10e6 * 1e-4 + 3e9 * 1e-8 / 2.0, max_relative = 1e-12);
        assert_relative_eq!(rate[1], 10e6 + 3e9 * 1e-4, max_relative = 1e-12);
        assert_relative_eq!(
            phase[1],
            20e3 * 1e-4 + 10e6 * 1e-8 / 2.0 + 3e9 * 1e-12 / 6.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn symmetric_mode_zeroes_odd_terms() {
        let chirp =
            PolynomialChirp::try_new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], true).expect("chirp");
        assert_eq!(chirp.coefficients(), &[1.0, 2.0, 3.0, 0.0, 5.0, 0.0, 7.0]);
    }

    #[test]
    fn fit_recovers_exact_polynomial() {
        let duration = 1e-3;
        let truth = PolynomialChirp::try_new(vec![0.0, 20e3, 10e6, 0.0, 4e12], true).expect("truth");
        let t = time_axis(200, duration);
        let freq = truth.instantaneous_frequency(&t);

        let kernel = PolynomialFitKernel::try_new(PolynomialFitConfig {
            order: 5,
            symmetric: true,
            duration_s: duration,
        })
        .expect("fit kernel");
        let fitted = kernel.run(&t, &freq).expect("fit");

        assert_eq!(fitted.coefficients().len(), 5);
        assert_eq!(fitted.coefficients()[0], 0.0);
        assert_eq!(fitted.coefficients()[3], 0.0);
        assert_relative_eq!(fitted.coefficients()[1], 20e3, max_relative = 1e-8);
        assert_relative_eq!(fitted.coefficients()[2], 10e6, max_relative = 1e-8);
        assert_relative_eq!(fitted.coefficients()[4], 4e12, max_relative = 1e-6);
    }

    #[test]
    fn fit_rejects_mismatched_lengths_and_low_order() {
        let kernel = PolynomialFitKernel::try_new(PolynomialFitConfig {
            order: 4,
            symmetric: false,
            duration_s: 1e-3,
        })
        .expect("fit kernel");
        let err = kernel
            .run(&[0.0, 1.0, 2.0][..], &[0.0, 1.0][..])
            .expect_err("length mismatch");
        assert_eq!(
            err,
            ExecInvariantViolation::LengthMismatch {
                arg: "frequency",
                expected: 3,
                got: 2,
            }
        );

        assert_eq!(
            PolynomialFitKernel::try_new(PolynomialFitConfig {
                order: 2,
                symmetric: false,
                duration_s: 1e-3f64,
            }),
            Err(ConfigError::InvalidArgument {
                arg: "order",
                reason: "polynomial order must be >= 3",
            })
        );
    }
}
