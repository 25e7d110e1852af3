use crate::kernel::{ConfigError, KernelLifecycle};
use crate::Error;
use alloc::vec::Vec;
use nalgebra::{Complex, RealField};
use num_traits::ToPrimitive;

use super::config::{ChirpConfig, ChirpSpec};
use super::diagnostics::{check_sample_rate, DesignWarning};
use super::integrate::{PhaseIntegrator, PhaseIntegratorConfig};
use super::lookup::{WindowDomain, WindowLookupConfig, WindowLookupKernel};
use super::polynomial::{PolynomialChirp, PolynomialFitConfig, PolynomialFitKernel};
use super::solver::{ChirpRateSolution, ChirpRateSolver, ChirpRateSolverConfig, SolverControls};
use super::synth::{upconvert, WaveformSynthesizer};
use super::traits::{CumulativeIntegrate1D, PhaseModulate1D};

/// Outcome of the chirp-rate search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSummary<F> {
    /// Scale applied to the nominal chirp rate `Ω/T`.
    pub scale: F,
    /// Trapezoidal integral of the final chirp rate, in Hz.
    pub swept_bandwidth: F,
    /// `|Ω - swept_bandwidth|` in Hz.
    pub cost: F,
    /// Objective evaluations performed.
    pub evaluations: usize,
    /// Whether the search met its tolerances.
    pub converged: bool,
    /// Frequency-offset span the window was stretched over.
    pub domain: WindowDomain<F>,
}

/// A designed NLFM pulse and the trajectories it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpDesign<F> {
    spec: ChirpSpec<F>,
    time: Vec<F>,
    chirp_rate: Vec<F>,
    frequency: Vec<F>,
    phase: Vec<F>,
    samples: Vec<Complex<F>>,
    summary: SolverSummary<F>,
    warnings: Vec<DesignWarning<F>>,
}

impl<F> ChirpDesign<F>
where
    F: RealField + Copy + ToPrimitive,
{
    /// Validated request this design was built for.
    pub fn spec(&self) -> &ChirpSpec<F> {
        &self.spec
    }

    /// Complex baseband samples `exp(i·2π·φ(t))`.
    pub fn samples(&self) -> &[Complex<F>] {
        &self.samples
    }

    /// Time instants in seconds, `[-T/2, T/2]`.
    pub fn time(&self) -> &[F] {
        &self.time
    }

    /// Chirp rate `γ(t)` in Hz/s.
    pub fn chirp_rate(&self) -> &[F] {
        &self.chirp_rate
    }

    /// Instantaneous frequency `ω(t)` in Hz.
    pub fn frequency(&self) -> &[F] {
        &self.frequency
    }

    /// Phase `φ(t)` in cycles.
    pub fn phase(&self) -> &[F] {
        &self.phase
    }

    /// Chirp-rate search outcome.
    pub fn summary(&self) -> &SolverSummary<F> {
        &self.summary
    }

    /// Non-fatal diagnostics raised while designing.
    pub fn warnings(&self) -> &[DesignWarning<F>] {
        &self.warnings
    }

    /// Fit phase-polynomial coefficients to the designed frequency
    /// trajectory, using the request's order and symmetry.
    pub fn fit_polynomial(&self) -> Result<PolynomialChirp<F>, Error> {
        let kernel = PolynomialFitKernel::try_new(PolynomialFitConfig {
            order: self.spec.polynomial_order(),
            symmetric: self.spec.symmetric(),
            duration_s: self.spec.duration_s(),
        })?;
        Ok(kernel.run(&self.time, &self.frequency)?)
    }

    /// Mix the baseband samples onto an IF carrier.
    pub fn upconvert(&self, carrier_hz: F) -> Result<Vec<Complex<F>>, Error> {
        upconvert(&self.samples, carrier_hz, self.spec.sample_rate_hz())
    }
}

/// Constructor config for [`ChirpDesigner`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpDesignerConfig<F> {
    /// Pulse parameters.
    pub chirp: ChirpConfig<F>,
    /// Target spectral envelope, one sample per frequency bin.
    pub window: Vec<F>,
    /// Stopping rules of the chirp-rate search.
    pub controls: SolverControls,
}

/// End-to-end NLFM pulse designer.
///
/// All inputs are validated in [`KernelLifecycle::try_new`]; [`run`] then
/// solves for the chirp rate, integrates it twice and synthesizes samples.
/// Designers hold no mutable state and can be shared across threads.
///
/// [`run`]: ChirpDesigner::run
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpDesigner<F> {
    spec: ChirpSpec<F>,
    solver: ChirpRateSolver<F>,
    phase_integrator: PhaseIntegrator<F>,
    synthesizer: WaveformSynthesizer<F>,
}

impl<F> KernelLifecycle for ChirpDesigner<F>
where
    F: RealField + Copy + ToPrimitive,
{
    type Config = ChirpDesignerConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let lookup = WindowLookupKernel::try_new(WindowLookupConfig {
            window: config.window,
        })?;
        let spec = ChirpSpec::try_new(config.chirp)?;
        let solver = ChirpRateSolver::try_new(ChirpRateSolverConfig {
            spec,
            lookup,
            controls: config.controls,
        })?;
        // Phase advances at the sample clock, not the solver grid spacing.
        let phase_integrator = PhaseIntegrator::try_new(PhaseIntegratorConfig {
            step: F::one() / spec.sample_rate_hz(),
        })?;

        Ok(Self {
            spec,
            solver,
            phase_integrator,
            synthesizer: WaveformSynthesizer::new(),
        })
    }
}

impl<F> ChirpDesigner<F>
where
    F: RealField + Copy + ToPrimitive,
{
    /// Validated request.
    pub fn spec(&self) -> &ChirpSpec<F> {
        &self.spec
    }

    /// Design the pulse.
    pub fn run(&self) -> Result<ChirpDesign<F>, Error> {
        let ChirpRateSolution {
            candidate,
            evaluations,
            converged,
        } = self.solver.solve()?;

        let phase = self.phase_integrator.run_alloc(&candidate.frequency)?;
        let samples = self.synthesizer.run_alloc(&phase)?;

        let mut warnings = Vec::new();
        if let Some(warning) = check_sample_rate(&candidate.frequency, self.spec.sample_rate_hz())
        {
            warnings.push(warning);
        }
        if !converged {
            warnings.push(DesignWarning::NonConvergence {
                evaluations,
                cost: candidate.cost,
            });
        }
        warnings.iter().for_each(|warning| log::warn!("{warning}"));
        log::debug!(
            "designed {} samples: scale {}, swept bandwidth {} Hz",
            samples.len(),
            candidate.scale,
            candidate.swept_bandwidth
        );

        Ok(ChirpDesign {
            spec: self.spec,
            time: self.spec.grid().times(),
            summary: SolverSummary {
                scale: candidate.scale,
                swept_bandwidth: candidate.swept_bandwidth,
                cost: candidate.cost,
                evaluations,
                converged,
                domain: candidate.domain,
            },
            chirp_rate: candidate.chirp_rate,
            frequency: candidate.frequency,
            phase,
            samples,
            warnings,
        })
    }
}

/// Design an NLFM pulse whose spectrum follows `window`.
///
/// `window` is the target magnitude envelope across the swept band,
/// `symmetric` marks a spectrum symmetric about `center_hz`. Durations are in
/// seconds, frequencies in Hz. Default solver controls and polynomial order
/// apply; use [`ChirpDesigner`] to change them.
pub fn design_chirp<F>(
    window: &[F],
    symmetric: bool,
    duration_s: F,
    bandwidth_hz: F,
    center_hz: F,
    fs_hz: F,
) -> Result<ChirpDesign<F>, Error>
where
    F: RealField + Copy + ToPrimitive,
{
    let designer = ChirpDesigner::try_new(ChirpDesignerConfig {
        chirp: ChirpConfig {
            symmetric,
            ..ChirpConfig::new(duration_s, bandwidth_hz, center_hz, fs_hz)
        },
        window: window.to_vec(),
        controls: SolverControls::default(),
    })?;
    designer.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::windows::{get_window, GetWindow, GetWindowBuilder};
    use approx::assert_abs_diff_eq;

    fn hamming(n: usize) -> Vec<f64> {
        get_window(GetWindowBuilder::Hamming, n, Some(false)).get_window()
    }

    #[test]
    fn hamming_reference_design() {
        let design = design_chirp(&hamming(64), true, 1e-3, 10e3, 20e3, 200e3).expect("design");

        assert_eq!(design.samples().len(), 200);
        assert_eq!(design.time().len(), 200);
        design
            .samples()
            .iter()
            .for_each(|s| assert_abs_diff_eq!(s.norm(), 1.0, epsilon = 1e-9));
        assert_abs_diff_eq!(design.frequency()[100], 20e3, epsilon = 50.0);
        assert_abs_diff_eq!(design.summary().swept_bandwidth, 10e3, epsilon = 1e-2);
        assert!(design.summary().converged);
        assert!(design.warnings().is_empty());

        // Sweep is monotonic and spans roughly the requested band.
        assert!(design.frequency().windows(2).all(|w| w[1] > w[0]));
        let span = design.frequency()[199] - design.frequency()[0];
        assert!((span - 10e3).abs() < 0.05 * 10e3);
    }

    #[test]
    fn flat_window_reproduces_linear_chirp() {
        let design = design_chirp(&[1.0], true, 1e-3, 10e3, 20e3, 200e3).expect("design");
        design
            .chirp_rate()
            .iter()
            .for_each(|&g| assert_abs_diff_eq!(g, 10e3 / 1e-3, epsilon = 1e-6));
        assert_eq!(design.summary().evaluations, 1);
    }

    #[test]
    fn half_bin_grid_still_converges() {
        // N = 201 and L = 3 put grid samples exactly on half bins.
        for center in [20e3, 0.0] {
            let design =
                design_chirp(&[0.2, 1.0, 0.2], true, 1.005e-3, 10e3, center, 200e3).expect("design");
            assert_eq!(design.samples().len(), 201);
            assert!(design.summary().converged);
            assert!(design.summary().cost <= 1e-6 * 10e3);
            assert!(design
                .warnings()
                .iter()
                .all(|w| !matches!(w, DesignWarning::NonConvergence { .. })));
        }
    }

    #[test]
    fn odd_length_short_window_designs_converge() {
        let cases = [
            (hamming(3), 1.005e-3, 10e3, 20e3),
            (hamming(5), 0.505e-3, 20e3, 30e3),
            (hamming(7), 0.755e-3, 10e3, 20e3),
            (hamming(64), 1.005e-3, 10e3, 20e3),
        ];
        for (window, duration, bandwidth, center) in cases {
            let design =
                design_chirp(&window, true, duration, bandwidth, center, 200e3).expect("design");
            let n = design.samples().len();
            assert_eq!(n % 2, 1);
            assert!(design.summary().converged, "L = {}, N = {n}", window.len());
            assert_abs_diff_eq!(design.frequency()[n / 2], center, epsilon = 1e-6);
        }
    }

    #[test]
    fn undersampled_design_warns_but_completes() {
        let fs = 1.5 * (20e3 + 10e3 / 2.0);
        let design = design_chirp(&hamming(64), true, 1e-3, 10e3, 20e3, fs).expect("design");

        assert_eq!(design.samples().len(), (fs * 1e-3f64).floor() as usize);
        let nyquist = design
            .warnings()
            .iter()
            .find_map(|w| match w {
                DesignWarning::Nyquist { max_phase_step } => Some(*max_phase_step),
                _ => None,
            })
            .expect("nyquist warning");
        assert!(nyquist > core::f64::consts::PI);
    }

    #[test]
    fn bandwidth_is_met_across_windows_and_scales() {
        let windows: [(&str, Vec<f64>); 3] = [
            (
                "gaussian",
                get_window(GetWindowBuilder::Gaussian { std: 8.0 }, 64, Some(false)).get_window(),
            ),
            ("hamming", hamming(64)),
            (
                "boxcar",
                get_window(GetWindowBuilder::Boxcar, 64, Some(false)).get_window(),
            ),
        ];
        let bandwidths = [1e3, 1e4, 1e5, 1e6];
        let durations = [1e-4, 1e-3, 1e-2];

        let mut total = 0usize;
        let mut met = 0usize;
        for (name, window) in windows.iter() {
            for &bandwidth in &bandwidths {
                for &duration in &durations {
                    let fs = (4.0 * bandwidth).max(256.0 / duration);
                    if fs * duration > 8192.0 {
                        continue;
                    }
                    let design = design_chirp(window, true, duration, bandwidth, bandwidth, fs)
                        .unwrap_or_else(|err| panic!("{name} {bandwidth} {duration}: {err}"));
                    total += 1;
                    let area = design.summary().swept_bandwidth;
                    if (area - bandwidth).abs() <= 1e-3 * bandwidth {
                        met += 1;
                    }
                }
            }
        }
        assert!(total >= 30);
        assert!(met as f64 >= 0.95 * total as f64, "{met}/{total}");
    }

    #[test]
    fn phase_matches_frequency_trajectory() {
        let design = design_chirp(&hamming(64), true, 1e-3, 10e3, 20e3, 200e3).expect("design");
        let fs = 200e3;
        let phase = design.phase();
        // Phase advances by ω[n]/Fs cycles per sample.
        phase
            .windows(2)
            .zip(design.frequency().iter().skip(1))
            .for_each(|(w, &f)| assert_abs_diff_eq!((w[1] - w[0]) * fs, f, epsilon = 1e-6));
    }

    #[test]
    fn polynomial_fit_tracks_design() {
        let design = design_chirp(&hamming(64), true, 1e-3, 10e3, 20e3, 200e3).expect("design");
        let chirp = design.fit_polynomial().expect("fit");
        let c = chirp.coefficients();
        assert_eq!(c.len(), 8);
        assert_eq!(c[3], 0.0);
        assert_eq!(c[5], 0.0);
        assert_eq!(c[7], 0.0);
        assert_abs_diff_eq!(c[1], 20e3, epsilon = 100.0);
        assert!(c[2] > 0.0);
    }

    #[test]
    fn upconverted_design_keeps_magnitude() {
        let design = design_chirp(&hamming(32), true, 1e-3, 10e3, 0.0, 200e3).expect("design");
        let rf = design.upconvert(40e3).expect("upconvert");
        assert_eq!(rf.len(), design.samples().len());
        rf.iter()
            .for_each(|s| assert_abs_diff_eq!(s.norm(), 1.0, epsilon = 1e-9));
    }

    #[test]
    fn invalid_requests_fail_before_solving() {
        assert_eq!(
            design_chirp::<f64>(&[], true, 1e-3, 10e3, 20e3, 200e3).expect_err("empty window"),
            Error::Config(ConfigError::EmptyInput { arg: "window" })
        );
        assert_eq!(
            design_chirp(&[1.0, f64::INFINITY], true, 1e-3, 10e3, 20e3, 200e3)
                .expect_err("non-finite window"),
            Error::Config(ConfigError::NonFinite { arg: "window" })
        );
        assert_eq!(
            design_chirp(&[1.0], true, 0.0, 10e3, 20e3, 200e3).expect_err("zero duration"),
            Error::Config(ConfigError::InvalidArgument {
                arg: "duration_s",
                reason: "value must be > 0",
            })
        );
        assert_eq!(
            design_chirp(&[1.0], true, 1e-3, 10e3, 20e3, 1e3).expect_err("one sample"),
            Error::Config(ConfigError::TooFewSamples {
                arg: "time_grid",
                min: 2,
                got: 1,
            })
        );
    }

    #[test]
    fn designer_exposes_solver_controls() {
        let designer = ChirpDesigner::try_new(ChirpDesignerConfig {
            chirp: ChirpConfig::new(1e-3, 10e3, 20e3, 200e3),
            window: hamming(64),
            controls: SolverControls {
                max_evaluations: 4,
                ..SolverControls::default()
            },
        })
        .expect("designer");
        let design = designer.run().expect("design");
        assert_eq!(design.summary().evaluations, 4);
        assert!(design
            .warnings()
            .iter()
            .any(|w| matches!(w, DesignWarning::NonConvergence { evaluations: 4, .. })));
    }
}
