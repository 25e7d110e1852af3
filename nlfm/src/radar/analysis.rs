//! Spectral checks for designed waveforms.

use crate::kernel::{require_positive, ConfigError, ExecInvariantViolation, KernelLifecycle};
use crate::signal::windows::{get_window, GetWindow, GetWindowBuilder};
use crate::Error;
use nalgebra::Complex;
use ndarray::ArrayView1;
use nlfm_core::num_rs::gradient;
use rustfft::FftPlanner;

/// Default FFT length for magnitude spectra.
pub const DEFAULT_FFT_LEN: usize = 2048;

/// Magnitude floor applied before converting to dB.
const MAGNITUDE_FLOOR: f64 = 1e-10;

/// Power floor applied before converting a density to dB.
const POWER_FLOOR: f64 = 1e-20;

fn mag2db(value: f64) -> f64 {
    20.0 * value.max(MAGNITUDE_FLOOR).log10()
}

fn pow2db(value: f64) -> f64 {
    10.0 * value.max(POWER_FLOOR).log10()
}

fn normalized_db(magnitudes: &[f64]) -> Vec<f64> {
    let peak = magnitudes.iter().copied().fold(0.0f64, f64::max);
    if peak <= 0.0 {
        return vec![mag2db(0.0); magnitudes.len()];
    }
    magnitudes.iter().map(|&m| mag2db(m / peak)).collect()
}

fn fft_in_place(buffer: &mut [Complex<f64>], inverse: bool) {
    let mut planner = FftPlanner::<f64>::new();
    let fft = if inverse {
        planner.plan_fft_inverse(buffer.len())
    } else {
        planner.plan_fft_forward(buffer.len())
    };
    fft.process(buffer);
}

/// Constructor config for [`SpectrumKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumConfig {
    /// FFT length; input is zero-padded or truncated to it.
    pub fft_len: usize,
    /// Sample rate in Hz.
    pub sample_rate_hz: f64,
}

impl SpectrumConfig {
    /// Default FFT length at `sample_rate_hz`.
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            fft_len: DEFAULT_FFT_LEN,
            sample_rate_hz,
        }
    }
}

/// Normalized, fftshifted magnitude spectrum in dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumKernel {
    fft_len: usize,
    sample_rate_hz: f64,
}

impl KernelLifecycle for SpectrumKernel {
    type Config = SpectrumConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.fft_len < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "fft_len",
                reason: "fft length must be >= 2",
            });
        }
        Ok(Self {
            fft_len: config.fft_len,
            sample_rate_hz: require_positive("sample_rate_hz", config.sample_rate_hz)?,
        })
    }
}

impl SpectrumKernel {
    /// Frequency axis matching [`SpectrumKernel::magnitude_db`],
    /// `linspace(-Fs/2, Fs/2, fft_len)`.
    pub fn frequencies(&self) -> Vec<f64> {
        let step = self.sample_rate_hz / (self.fft_len - 1) as f64;
        (0..self.fft_len)
            .map(|i| -self.sample_rate_hz / 2.0 + step * i as f64)
            .collect()
    }

    /// Spectrum of `samples`, peak normalized to 0 dB, floored at -200 dB.
    pub fn magnitude_db(
        &self,
        samples: &[Complex<f64>],
    ) -> Result<Vec<f64>, ExecInvariantViolation> {
        if samples.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "samples" }.into());
        }
        let mut buffer = vec![Complex::new(0.0, 0.0); self.fft_len];
        buffer
            .iter_mut()
            .zip(samples.iter())
            .for_each(|(b, &s)| *b = s);
        fft_in_place(&mut buffer, false);
        buffer.rotate_right(self.fft_len / 2);

        let scale = self.fft_len as f64;
        let magnitudes: Vec<f64> = buffer.iter().map(|c| c.norm() / scale).collect();
        Ok(normalized_db(&magnitudes))
    }
}

/// Constructor config for [`PsdKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsdConfig {
    /// Segment and FFT length.
    pub fft_len: usize,
    /// Samples shared by consecutive segments.
    pub overlap: usize,
    /// Sample rate in Hz.
    pub sample_rate_hz: f64,
}

impl PsdConfig {
    /// Default segment length with a quarter-segment overlap.
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            fft_len: DEFAULT_FFT_LEN,
            overlap: DEFAULT_FFT_LEN / 4,
            sample_rate_hz,
        }
    }
}

/// Two-sided Welch power spectral density of complex samples.
///
/// Segments are detrended by their mean, tapered with a symmetric
/// Blackman-Harris window and averaged with density scaling
/// `1 / (Fs · Σw²)`. Inputs shorter than one segment are zero-padded into
/// a single segment. Bins are in FFT order, see [`PsdKernel::frequencies`].
#[derive(Debug, Clone, PartialEq)]
pub struct PsdKernel {
    window: Vec<f64>,
    overlap: usize,
    sample_rate_hz: f64,
    scale: f64,
}

impl KernelLifecycle for PsdKernel {
    type Config = PsdConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.fft_len < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "fft_len",
                reason: "fft length must be >= 2",
            });
        }
        if config.overlap >= config.fft_len {
            return Err(ConfigError::InvalidArgument {
                arg: "overlap",
                reason: "segment overlap must be smaller than the fft length",
            });
        }
        let sample_rate_hz = require_positive("sample_rate_hz", config.sample_rate_hz)?;
        let window: Vec<f64> =
            get_window(GetWindowBuilder::BlackmanHarris, config.fft_len, Some(false)).get_window();
        let energy: f64 = window.iter().map(|w| w * w).sum();
        Ok(Self {
            window,
            overlap: config.overlap,
            sample_rate_hz,
            scale: 1.0 / (sample_rate_hz * energy),
        })
    }
}

impl PsdKernel {
    /// Segment and FFT length.
    pub fn fft_len(&self) -> usize {
        self.window.len()
    }

    /// Bin frequencies in FFT order (`fftfreq`): non-negative first, then
    /// negative.
    pub fn frequencies(&self) -> Vec<f64> {
        let n = self.fft_len();
        let resolution = self.sample_rate_hz / n as f64;
        (0..n)
            .map(|k| {
                if k <= (n - 1) / 2 {
                    k as f64 * resolution
                } else {
                    (k as f64 - n as f64) * resolution
                }
            })
            .collect()
    }

    /// Power spectral density in units²/Hz.
    pub fn run(&self, samples: &[Complex<f64>]) -> Result<Vec<f64>, ExecInvariantViolation> {
        if samples.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "samples" }.into());
        }
        let n = self.fft_len();
        let starts = segment_starts(samples.len(), n, self.overlap);
        let mut accum = vec![0.0; n];
        let mut buffer = vec![Complex::new(0.0, 0.0); n];

        for &start in &starts {
            let segment = &samples[start..(start + n).min(samples.len())];
            let mean = segment.iter().sum::<Complex<f64>>() / segment.len() as f64;
            buffer.fill(Complex::new(0.0, 0.0));
            buffer
                .iter_mut()
                .zip(segment.iter().zip(self.window.iter()))
                .for_each(|(b, (&s, &w))| *b = (s - mean) * w);
            fft_in_place(&mut buffer, false);
            accum
                .iter_mut()
                .zip(buffer.iter())
                .for_each(|(a, c)| *a += c.norm_sqr() * self.scale);
        }

        let inv = 1.0 / starts.len() as f64;
        accum.iter_mut().for_each(|v| *v *= inv);
        Ok(accum)
    }

    /// Power spectral density in dB/Hz, floored at -200 dB.
    pub fn density_db(&self, samples: &[Complex<f64>]) -> Result<Vec<f64>, ExecInvariantViolation> {
        Ok(self.run(samples)?.into_iter().map(pow2db).collect())
    }

    /// Normalized autocorrelation in dB taken as the inverse FFT of the
    /// Welch density, fftshifted so lag zero sits at `fft_len / 2`.
    pub fn autocorrelation_db(
        &self,
        samples: &[Complex<f64>],
    ) -> Result<Vec<f64>, ExecInvariantViolation> {
        let mut buffer: Vec<Complex<f64>> = self
            .run(samples)?
            .into_iter()
            .map(|p| Complex::new(p, 0.0))
            .collect();
        fft_in_place(&mut buffer, true);
        let half = buffer.len() / 2;
        buffer.rotate_right(half);
        let magnitudes: Vec<f64> = buffer.iter().map(|c| c.norm()).collect();
        Ok(normalized_db(&magnitudes))
    }
}

/// Start offsets of Welch segments; a short input yields one padded segment.
fn segment_starts(len: usize, nperseg: usize, overlap: usize) -> Vec<usize> {
    if len <= nperseg {
        return vec![0];
    }
    let hop = nperseg - overlap;
    (0..)
        .map(|k| k * hop)
        .take_while(|&start| start + nperseg <= len)
        .collect()
}

/// Normalized autocorrelation magnitude in dB over lags `-(N-1)..=(N-1)`.
pub fn autocorrelation_db(samples: &[Complex<f64>]) -> Result<Vec<f64>, Error> {
    let n = samples.len();
    if n == 0 {
        return Err(ConfigError::EmptyInput { arg: "samples" }.into());
    }
    let lags = 2 * n - 1;
    let padded = lags.next_power_of_two();

    let mut buffer = vec![Complex::new(0.0, 0.0); padded];
    buffer[..n].copy_from_slice(samples);
    fft_in_place(&mut buffer, false);
    buffer
        .iter_mut()
        .for_each(|c| *c = Complex::new(c.norm_sqr(), 0.0));
    fft_in_place(&mut buffer, true);

    // Negative lags wrap to the tail of the circular correlation.
    let magnitudes: Vec<f64> = buffer[padded - (n - 1)..]
        .iter()
        .chain(buffer[..n].iter())
        .map(|c| c.norm())
        .collect();
    Ok(normalized_db(&magnitudes))
}

/// Instantaneous frequency in Hz recovered from phase in cycles.
pub fn instantaneous_frequency(phase: &[f64], sample_rate_hz: f64) -> Result<Vec<f64>, Error> {
    let sample_rate_hz = require_positive("sample_rate_hz", sample_rate_hz)?;
    Ok(gradient(ArrayView1::from(phase), 1.0 / sample_rate_hz)?.to_vec())
}

/// Chirp rate in Hz/s recovered from an instantaneous frequency trajectory
/// sampled every `step` seconds.
pub fn chirp_rate(frequency: &[f64], step: f64) -> Result<Vec<f64>, Error> {
    let step = require_positive("step", step)?;
    Ok(gradient(ArrayView1::from(frequency), step)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tone(freq: f64, fs: f64, n: usize) -> Vec<Complex<f64>> {
        (0..n)
            .map(|i| {
                let theta = 2.0 * core::f64::consts::PI * freq * i as f64 / fs;
                Complex::new(theta.cos(), theta.sin())
            })
            .collect()
    }

    #[test]
    fn tone_peaks_at_its_frequency() {
        let kernel = SpectrumKernel::try_new(SpectrumConfig {
            fft_len: 256,
            sample_rate_hz: 256.0,
        })
        .expect("spectrum kernel");
        let spectrum = kernel.magnitude_db(&tone(32.0, 256.0, 256)).expect("spectrum");

        assert_eq!(spectrum.len(), 256);
        // fftshift puts bin 32 at 128 + 32.
        assert_abs_diff_eq!(spectrum[160], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum[128], -200.0, epsilon = 1e-6);
        assert!(spectrum.iter().all(|&v| v <= 1e-12));
    }

    #[test]
    fn frequency_axis_spans_nyquist_band() {
        let kernel = SpectrumKernel::try_new(SpectrumConfig::new(200e3)).expect("spectrum");
        let f = kernel.frequencies();
        assert_eq!(f.len(), DEFAULT_FFT_LEN);
        assert_abs_diff_eq!(f[0], -100e3, epsilon = 1e-9);
        assert_abs_diff_eq!(f[DEFAULT_FFT_LEN - 1], 100e3, epsilon = 1e-6);
    }

    #[test]
    fn autocorrelation_peaks_at_zero_lag() {
        let samples = tone(5.0, 64.0, 32);
        let acf = autocorrelation_db(&samples).expect("acf");
        assert_eq!(acf.len(), 63);
        assert_abs_diff_eq!(acf[31], 0.0, epsilon = 1e-9);
        // Lag magnitude of a tone falls off linearly with overlap.
        assert_abs_diff_eq!(acf[0], 20.0 * (1.0f64 / 32.0).log10(), epsilon = 1e-6);
        assert_abs_diff_eq!(acf[15], acf[47], epsilon = 1e-9);
    }

    fn psd_kernel(fft_len: usize, fs: f64) -> PsdKernel {
        PsdKernel::try_new(PsdConfig {
            fft_len,
            overlap: fft_len / 4,
            sample_rate_hz: fs,
        })
        .expect("psd kernel")
    }

    fn peak_bin(values: &[f64]) -> usize {
        (0..values.len())
            .max_by(|&a, &b| values[a].total_cmp(&values[b]))
            .expect("non-empty")
    }

    #[test]
    fn welch_density_integrates_to_tone_power() {
        // 64 Hz at 2048 Hz is bin 8 of a 256-point segment.
        let kernel = psd_kernel(256, 2048.0);
        let psd = kernel.run(&tone(64.0, 2048.0, 4096)).expect("psd");

        assert_eq!(psd.len(), 256);
        assert_eq!(peak_bin(&psd), 8);
        assert_abs_diff_eq!(kernel.frequencies()[8], 64.0, epsilon = 1e-12);
        let power: f64 = psd.iter().sum::<f64>() * 2048.0 / 256.0;
        assert_abs_diff_eq!(power, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn welch_removes_segment_mean() {
        let kernel = psd_kernel(64, 1e3);
        let dc = vec![Complex::new(3.0, -1.0); 300];
        let psd = kernel.run(&dc).expect("psd");
        assert!(psd.iter().all(|&p| p < 1e-20));
    }

    #[test]
    fn short_input_uses_one_padded_segment() {
        let kernel = psd_kernel(256, 2048.0);
        let psd = kernel.run(&tone(64.0, 2048.0, 100)).expect("psd");
        assert_eq!(psd.len(), 256);
        assert_eq!(peak_bin(&psd), 8);
        assert!(psd.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn negative_frequencies_follow_fft_order() {
        let kernel = psd_kernel(8, 8.0);
        assert_eq!(
            kernel.frequencies(),
            vec![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]
        );
        let psd = kernel.run(&tone(-2.0, 8.0, 64)).expect("psd");
        assert_eq!(peak_bin(&psd), 6);
    }

    #[test]
    fn density_based_autocorrelation_peaks_at_center() {
        let kernel = psd_kernel(256, 2048.0);
        let samples = tone(64.0, 2048.0, 1024);
        let acf = kernel.autocorrelation_db(&samples).expect("acf");
        assert_eq!(acf.len(), 256);
        assert_abs_diff_eq!(acf[128], 0.0, epsilon = 1e-9);
        assert!(acf.iter().all(|&v| v <= 1e-9));

        let density = kernel.density_db(&samples).expect("density");
        assert!(density.iter().all(|&v| v >= -200.0));
    }

    #[test]
    fn psd_config_is_validated() {
        assert_eq!(
            PsdKernel::try_new(PsdConfig {
                fft_len: 16,
                overlap: 16,
                sample_rate_hz: 1e3,
            }),
            Err(ConfigError::InvalidArgument {
                arg: "overlap",
                reason: "segment overlap must be smaller than the fft length",
            })
        );
        assert!(PsdKernel::try_new(PsdConfig::new(0.0)).is_err());
        assert_eq!(PsdKernel::try_new(PsdConfig::new(1e3)).expect("psd").fft_len(), 2048);
    }

    #[test]
    fn gradients_recover_linear_chirp() {
        let fs = 1e3;
        let rate = 50.0;
        let phase: Vec<f64> = (0..100)
            .map(|i| {
                let t = i as f64 / fs;
                10.0 * t + rate * t * t / 2.0
            })
            .collect();
        let freq = instantaneous_frequency(&phase, fs).expect("frequency");
        assert_abs_diff_eq!(freq[50], 10.0 + rate * 0.05, epsilon = 1e-6);

        let gamma = chirp_rate(&freq, 1.0 / fs).expect("chirp rate");
        gamma[2..98]
            .iter()
            .for_each(|&g| assert_abs_diff_eq!(g, rate, epsilon = 1e-6));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(
            autocorrelation_db(&[]),
            Err(Error::Config(ConfigError::EmptyInput { arg: "samples" }))
        );
        assert!(matches!(
            instantaneous_frequency(&[1.0], 1e3),
            Err(Error::Numeric(_))
        ));
    }
}
