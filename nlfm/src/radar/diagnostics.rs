//! Non-fatal design warnings.
//!
//! Undersampling and solver non-convergence do not stop a design; they are
//! collected here and returned alongside the result.

use core::fmt;
use nalgebra::RealField;

/// Non-fatal findings attached to a chirp design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesignWarning<F> {
    /// The sample rate is too low for the designed frequency trajectory:
    /// the phase advances by more than π between consecutive samples.
    Nyquist {
        /// Largest per-sample phase step in radians.
        max_phase_step: F,
    },
    /// The chirp-rate solver stopped before meeting its tolerances. The best
    /// evaluated iterate is still returned.
    NonConvergence {
        /// Number of objective evaluations performed.
        evaluations: usize,
        /// Best bandwidth error `|Ω - B|` in Hz.
        cost: F,
    },
}

impl<F> fmt::Display for DesignWarning<F>
where
    F: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignWarning::Nyquist { max_phase_step } => write!(
                f,
                "Sample rate too low: maximum phase step is {max_phase_step} rad, at most pi is allowed."
            ),
            DesignWarning::NonConvergence { evaluations, cost } => write!(
                f,
                "Chirp-rate optimization did not converge after {evaluations} evaluations (bandwidth error {cost} Hz)."
            ),
        }
    }
}

/// Largest per-sample phase step `|2π·ω[n]/Fs|` of a frequency trajectory.
pub fn max_phase_step<F>(frequency: &[F], sample_rate_hz: F) -> F
where
    F: RealField + Copy,
{
    let scale = F::two_pi() / sample_rate_hz;
    frequency
        .iter()
        .map(|&w| (w * scale).abs())
        .fold(F::zero(), |acc, v| acc.max(v))
}

/// Flag trajectories whose phase step exceeds π at `sample_rate_hz`.
pub fn check_sample_rate<F>(frequency: &[F], sample_rate_hz: F) -> Option<DesignWarning<F>>
where
    F: RealField + Copy,
{
    let step = max_phase_step(frequency, sample_rate_hz);
    (step > F::pi()).then_some(DesignWarning::Nyquist {
        max_phase_step: step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use approx::assert_abs_diff_eq;

    #[test]
    fn nyquist_is_flagged_above_half_rate() {
        assert_eq!(check_sample_rate(&[10e3f64, 40e3, 49e3], 100e3), None);

        let warning = check_sample_rate(&[10e3f64, 60e3], 100e3).expect("undersampled");
        match warning {
            DesignWarning::Nyquist { max_phase_step } => {
                assert_abs_diff_eq!(max_phase_step, 1.2 * core::f64::consts::PI, epsilon = 1e-12)
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn negative_frequencies_count_by_magnitude() {
        assert!(check_sample_rate(&[-70e3f64, 0.0], 100e3).is_some());
    }

    #[test]
    fn warnings_render() {
        let warning = DesignWarning::NonConvergence {
            evaluations: 200,
            cost: 1.5f64,
        };
        assert_eq!(
            warning.to_string(),
            "Chirp-rate optimization did not converge after 200 evaluations (bandwidth error 1.5 Hz)."
        );
    }
}
