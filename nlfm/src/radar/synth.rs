//! Complex waveform synthesis and carrier upconversion.

use crate::kernel::{
    bind_output, require_finite, require_positive, ConfigError, ExecInvariantViolation,
    KernelLifecycle, Read1D, Write1D,
};
use crate::Error;
use alloc::vec::Vec;
use core::marker::PhantomData;
use nalgebra::{Complex, RealField};

use super::traits::{PhaseModulate1D, Upconvert1D};

/// Unit-magnitude complex sample for a phase in cycles.
fn unit_phasor<F>(cycles: F) -> Complex<F>
where
    F: RealField + Copy,
{
    let theta = F::two_pi() * cycles;
    Complex::new(theta.cos(), theta.sin())
}

/// Complex baseband synthesis `s[n] = exp(i·2π·φ[n])`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveformSynthesizer<F> {
    _scalar: PhantomData<F>,
}

impl<F> WaveformSynthesizer<F> {
    /// Stateless synthesizer.
    pub fn new() -> Self {
        Self {
            _scalar: PhantomData,
        }
    }
}

impl<F> PhaseModulate1D<F> for WaveformSynthesizer<F>
where
    F: RealField + Copy,
{
    fn run_into<I, O>(&self, phase: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
        O: Write1D<Complex<F>> + ?Sized,
    {
        let phase = phase.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = bind_output(out, phase.len())?;
        out.iter_mut()
            .zip(phase.iter())
            .for_each(|(o, &p)| *o = unit_phasor(p));
        Ok(())
    }

    fn run_alloc<I>(&self, phase: &I) -> Result<Vec<Complex<F>>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
    {
        let phase = phase.read_slice().map_err(ExecInvariantViolation::from)?;
        Ok(phase.iter().map(|&p| unit_phasor(p)).collect())
    }
}

/// Constructor config for [`Upconverter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpconvertConfig<F> {
    /// Carrier (IF) frequency in Hz.
    pub carrier_hz: F,
    /// Sample rate in Hz.
    pub sample_rate_hz: F,
}

/// Mixes baseband samples onto a carrier, `s[n]·exp(i·2π·(fc/Fs)·n)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Upconverter<F> {
    cycles_per_sample: F,
}

impl<F> KernelLifecycle for Upconverter<F>
where
    F: RealField + Copy,
{
    type Config = UpconvertConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let carrier_hz = require_finite("carrier_hz", config.carrier_hz)?;
        let sample_rate_hz = require_positive("sample_rate_hz", config.sample_rate_hz)?;
        Ok(Self {
            cycles_per_sample: carrier_hz / sample_rate_hz,
        })
    }
}

impl<F> Upconverter<F>
where
    F: RealField + Copy,
{
    /// Carrier phasor at sample `n`, reduced to a fractional cycle first.
    fn carrier(&self, n: usize) -> Result<Complex<F>, ExecInvariantViolation> {
        let index = F::from_usize(n).ok_or(ExecInvariantViolation::InvalidState {
            reason: "sample index is not representable",
        })?;
        let cycles = self.cycles_per_sample * index;
        Ok(unit_phasor(cycles - cycles.floor()))
    }

    fn mix(
        &self,
        samples: &[Complex<F>],
        out: &mut [Complex<F>],
    ) -> Result<(), ExecInvariantViolation> {
        out.iter_mut()
            .zip(samples.iter())
            .enumerate()
            .try_for_each(|(n, (o, &s))| {
                *o = s * self.carrier(n)?;
                Ok(())
            })
    }
}

impl<F> Upconvert1D<F> for Upconverter<F>
where
    F: RealField + Copy,
{
    fn run_into<I, O>(&self, samples: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<Complex<F>> + ?Sized,
        O: Write1D<Complex<F>> + ?Sized,
    {
        let samples = samples.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = bind_output(out, samples.len())?;
        self.mix(samples, out)
    }

    fn run_alloc<I>(&self, samples: &I) -> Result<Vec<Complex<F>>, ExecInvariantViolation>
    where
        I: Read1D<Complex<F>> + ?Sized,
    {
        let samples = samples.read_slice().map_err(ExecInvariantViolation::from)?;
        let mut out = alloc::vec![Complex::new(F::zero(), F::zero()); samples.len()];
        self.mix(samples, &mut out)?;
        Ok(out)
    }
}

/// Upconvert a baseband waveform to the IF carrier `carrier_hz`.
pub fn upconvert<F>(
    samples: &[Complex<F>],
    carrier_hz: F,
    sample_rate_hz: F,
) -> Result<Vec<Complex<F>>, Error>
where
    F: RealField + Copy,
{
    let kernel = Upconverter::try_new(UpconvertConfig {
        carrier_hz,
        sample_rate_hz,
    })?;
    Ok(kernel.run_alloc(samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn synthesized_samples_have_unit_magnitude() {
        let phase: Vec<f64> = (0..64).map(|i| 0.37 * i as f64 * i as f64).collect();
        let samples = WaveformSynthesizer::new().run_alloc(&phase).expect("synth");
        assert_eq!(samples.len(), 64);
        samples
            .iter()
            .for_each(|s| assert_abs_diff_eq!(s.norm(), 1.0, epsilon = 1e-12));
        assert_abs_diff_eq!(samples[0].re, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn quarter_cycle_is_imaginary_unit() {
        let mut out = [Complex::new(0.0, 0.0); 2];
        WaveformSynthesizer::new()
            .run_into(&[0.25f64, 0.5][..], &mut out)
            .expect("synth");
        assert_abs_diff_eq!(out[0].re, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(out[0].im, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(out[1].re, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn upconversion_rotates_by_carrier_phase() {
        let baseband = vec![Complex::new(1.0f64, 0.0); 8];
        let out = upconvert(&baseband, 25e3, 100e3).expect("upconvert");
        // fc/Fs = 1/4: successive samples rotate by 90 degrees.
        let expected = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
        out.iter()
            .zip(expected.iter().cycle())
            .for_each(|(s, &(re, im))| {
                assert_abs_diff_eq!(s.re, re, epsilon = 1e-12);
                assert_abs_diff_eq!(s.im, im, epsilon = 1e-12);
            });
    }

    #[test]
    fn carrier_phase_is_exact_past_single_precision_counting() {
        let upconverter = Upconverter::try_new(UpconvertConfig {
            carrier_hz: 25e3f32,
            sample_rate_hz: 100e3,
        })
        .expect("upconverter");
        // 2^24 + 2 is representable in f32 but unreachable by adding ones.
        let carrier = upconverter.carrier((1 << 24) + 2).expect("carrier");
        assert_abs_diff_eq!(carrier.re, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(carrier.im, 0.0, epsilon = 1e-5);

        let carrier = upconverter.carrier(1 << 24).expect("carrier");
        assert_abs_diff_eq!(carrier.re, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn upconversion_rejects_bad_rate() {
        let err = upconvert(&[Complex::new(1.0f64, 0.0)], 1e3, 0.0).expect_err("zero rate");
        assert_eq!(
            err,
            Error::Config(ConfigError::InvalidArgument {
                arg: "sample_rate_hz",
                reason: "value must be > 0",
            })
        );
    }
}
