//! Scalar chirp-rate optimization.
//!
//! The initial linear chirp rate `Ω/T` is scaled by a single factor, bent
//! through the window lookup and integrated; the factor is chosen so the
//! bent curve still sweeps the requested bandwidth. The search runs as a
//! bounded golden-section minimization over `ln(scale)`.

use crate::kernel::{require_positive, scalar, ConfigError, ExecInvariantViolation, KernelLifecycle};
use alloc::vec;
use alloc::vec::Vec;
use nalgebra::RealField;
use num_traits::ToPrimitive;

use super::config::ChirpSpec;
use super::integrate::{PhaseIntegrator, PhaseIntegratorConfig};
use super::lookup::{WindowDomain, WindowLookupKernel};
use super::traits::WindowLookup1D;

const INV_GOLDEN_RATIO: f64 = 0.618_033_988_749_894_9;

/// Margin added on both sides of the `ln(scale)` bracket.
const BRACKET_MARGIN: f64 = 1e-6;

/// Stopping rules for [`ChirpRateSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverControls {
    /// Width of the `ln(scale)` bracket at which the search stops.
    pub bracket_tolerance: f64,
    /// Acceptable bandwidth error relative to `Ω`.
    pub cost_tolerance: f64,
    /// Ceiling on objective evaluations.
    pub max_evaluations: usize,
}

impl Default for SolverControls {
    fn default() -> Self {
        Self {
            bracket_tolerance: 1e-12,
            cost_tolerance: 1e-6,
            max_evaluations: 200,
        }
    }
}

/// Search progress threaded through every objective evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationState<F> {
    /// Objective evaluations performed so far.
    pub evaluations: usize,
    /// Scale of the most recent evaluation.
    pub scale: F,
}

impl<F> OptimizationState<F>
where
    F: RealField + Copy,
{
    /// State before the first evaluation.
    pub fn initial() -> Self {
        Self {
            evaluations: 0,
            scale: F::one(),
        }
    }
}

/// Everything one objective evaluation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<F> {
    /// Scale applied to the nominal chirp rate.
    pub scale: F,
    /// Window-shaped chirp rate `γ(t)` in Hz/s.
    pub chirp_rate: Vec<F>,
    /// Instantaneous frequency `ω(t)` in Hz, pinned to `f0` at `N/2`.
    pub frequency: Vec<F>,
    /// Frequency-offset span the window was stretched over.
    pub domain: WindowDomain<F>,
    /// Trapezoidal integral of `γ(t)`.
    pub swept_bandwidth: F,
    /// `|Ω - swept_bandwidth|`.
    pub cost: F,
}

/// Best candidate found by [`ChirpRateSolver::solve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpRateSolution<F> {
    /// Lowest-cost evaluation.
    pub candidate: Candidate<F>,
    /// Total objective evaluations.
    pub evaluations: usize,
    /// Bracket and cost tolerances were both met.
    pub converged: bool,
}

/// Constructor config for [`ChirpRateSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpRateSolverConfig<F> {
    /// Validated chirp request.
    pub spec: ChirpSpec<F>,
    /// Target envelope lookup.
    pub lookup: WindowLookupKernel<F>,
    /// Stopping rules.
    pub controls: SolverControls,
}

/// Golden-section search for the chirp-rate scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpRateSolver<F> {
    lookup: WindowLookupKernel<F>,
    integrator: PhaseIntegrator<F>,
    bandwidth: F,
    center_hz: F,
    nominal_rate: F,
    len: usize,
    center_index: usize,
    bracket: (F, F),
    flat_scale: Option<F>,
    inv_golden: F,
    bracket_tolerance: F,
    cost_tolerance: F,
    max_evaluations: usize,
}

impl<F> KernelLifecycle for ChirpRateSolver<F>
where
    F: RealField + Copy + ToPrimitive,
{
    type Config = ChirpRateSolverConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let ChirpRateSolverConfig {
            spec,
            lookup,
            controls,
        } = config;
        if controls.max_evaluations < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "max_evaluations",
                reason: "golden-section search needs at least 2 evaluations",
            });
        }
        let bracket_tolerance = require_positive(
            "bracket_tolerance",
            scalar("bracket_tolerance", controls.bracket_tolerance)?,
        )?;
        let relative_cost: F = require_positive(
            "cost_tolerance",
            scalar("cost_tolerance", controls.cost_tolerance)?,
        )?;

        let grid = spec.grid();
        let integrator = PhaseIntegrator::try_new(PhaseIntegratorConfig { step: grid.step() })?;

        let window = lookup.window();
        let margin: F = scalar("bracket_margin", BRACKET_MARGIN)?;
        let bracket = (window.min().ln() - margin, window.max().ln() + margin);
        let flat_scale = (window.min() == window.max()).then_some(window.max());

        Ok(Self {
            bandwidth: spec.bandwidth_hz(),
            center_hz: spec.center_hz(),
            nominal_rate: spec.bandwidth_hz() / spec.duration_s(),
            len: grid.len(),
            center_index: grid.center_index(),
            lookup,
            integrator,
            bracket,
            flat_scale,
            inv_golden: scalar("inv_golden_ratio", INV_GOLDEN_RATIO)?,
            bracket_tolerance,
            cost_tolerance: relative_cost * spec.bandwidth_hz(),
            max_evaluations: controls.max_evaluations,
        })
    }
}

impl<F> ChirpRateSolver<F>
where
    F: RealField + Copy + ToPrimitive,
{
    /// `ln(scale)` search interval.
    pub fn bracket(&self) -> (F, F) {
        self.bracket
    }

    /// Evaluate the objective for one `scale`.
    ///
    /// Pure in `self`: the evaluation count travels in `state` and the
    /// updated state is handed back with the candidate.
    pub fn step(
        &self,
        state: OptimizationState<F>,
        scale: F,
    ) -> Result<(OptimizationState<F>, Candidate<F>), ExecInvariantViolation> {
        let evaluations = state.evaluations + 1;
        let rate = self.nominal_rate * scale;

        let linear = vec![rate; self.len];
        let coarse = self
            .integrator
            .run_centered(&linear, self.center_index, self.center_hz)?;
        let domain = WindowDomain::from_excursion(&coarse, self.center_hz);
        let offsets: Vec<F> = coarse.iter().map(|&w| w - self.center_hz).collect();

        let weights = self.lookup.run_alloc(&offsets, domain)?;
        let chirp_rate: Vec<F> = weights.iter().map(|&w| rate / w).collect();
        let frequency = self
            .integrator
            .run_centered(&chirp_rate, self.center_index, self.center_hz)?;
        let swept_bandwidth = self.integrator.area(&chirp_rate)?;
        let cost = (self.bandwidth - swept_bandwidth).abs();

        if evaluations % 10 == 0 {
            log::debug!("chirp-rate evaluation {evaluations}: scale {scale}, cost {cost} Hz");
        }

        Ok((
            OptimizationState { evaluations, scale },
            Candidate {
                scale,
                chirp_rate,
                frequency,
                domain,
                swept_bandwidth,
                cost,
            },
        ))
    }

    /// Run the search and return the lowest-cost candidate.
    pub fn solve(&self) -> Result<ChirpRateSolution<F>, ExecInvariantViolation> {
        let state = OptimizationState::initial();
        if let Some(scale) = self.flat_scale {
            let (state, best) = self.step(state, scale)?;
            return Ok(self.finish(state, best, F::zero()));
        }

        let (mut a, mut b) = self.bracket;
        let mut c = b - (b - a) * self.inv_golden;
        let mut d = a + (b - a) * self.inv_golden;
        let (state, at_c) = self.step(state, c.exp())?;
        let (mut state, at_d) = self.step(state, d.exp())?;
        let (mut fc, mut fd) = (at_c.cost, at_d.cost);
        let mut best = lower_cost(at_c, at_d);

        while b - a > self.bracket_tolerance && state.evaluations < self.max_evaluations {
            let lower_side = fc < fd;
            let probe = if lower_side {
                b = d;
                d = c;
                fd = fc;
                c = b - (b - a) * self.inv_golden;
                c
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + (b - a) * self.inv_golden;
                d
            };
            let (next, candidate) = self.step(state, probe.exp())?;
            state = next;
            if lower_side {
                fc = candidate.cost;
            } else {
                fd = candidate.cost;
            }
            best = lower_cost(best, candidate);
        }

        Ok(self.finish(state, best, b - a))
    }

    fn finish(
        &self,
        state: OptimizationState<F>,
        candidate: Candidate<F>,
        width: F,
    ) -> ChirpRateSolution<F> {
        let converged = width <= self.bracket_tolerance && candidate.cost <= self.cost_tolerance;
        log::debug!(
            "chirp-rate search finished after {} evaluations: scale {}, cost {} Hz, converged {}",
            state.evaluations,
            candidate.scale,
            candidate.cost,
            converged
        );
        ChirpRateSolution {
            candidate,
            evaluations: state.evaluations,
            converged,
        }
    }
}

fn lower_cost<F>(current: Candidate<F>, next: Candidate<F>) -> Candidate<F>
where
    F: RealField + Copy,
{
    if next.cost < current.cost {
        next
    } else {
        current
    }
}
