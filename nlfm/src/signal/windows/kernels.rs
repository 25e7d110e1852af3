//! Trait-first window generation kernels.

use crate::kernel::{bind_output, ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D};
use crate::signal::traits::WindowGenerate;
use alloc::vec::Vec;
use num_traits::{Float, FloatConst};

use super::{get_window, GetWindow, GetWindowBuilder, Window};

/// Owned window builder for kernel configs.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowBuilderOwned<F> {
    /// Boxcar window.
    Boxcar,
    /// Triangle window.
    Triangle,
    /// Hann window.
    Hann,
    /// Hamming window.
    Hamming,
    /// Blackman window.
    Blackman,
    /// Blackman-Harris window.
    BlackmanHarris,
    /// Nuttall window.
    Nuttall,
    /// Kaiser window.
    Kaiser {
        /// Shape parameter `beta`.
        beta: F,
    },
    /// Gaussian window.
    Gaussian {
        /// Standard deviation in samples.
        std: F,
    },
    /// General cosine window.
    GeneralCosine {
        /// Coefficients for weighted cosine terms.
        weights: Vec<F>,
    },
    /// General gaussian window.
    GeneralGaussian {
        /// Shape parameter.
        p: F,
        /// Width parameter.
        width: F,
    },
    /// General hamming window.
    GeneralHamming {
        /// Alpha coefficient.
        coefficient: F,
    },
    /// Tukey window.
    Tukey {
        /// Taper fraction in `[0, 1]`.
        alpha: F,
    },
}

impl<F> WindowBuilderOwned<F>
where
    F: Float,
{
    fn as_builder(&self) -> GetWindowBuilder<'_, F> {
        match self {
            WindowBuilderOwned::Boxcar => GetWindowBuilder::Boxcar,
            WindowBuilderOwned::Triangle => GetWindowBuilder::Triangle,
            WindowBuilderOwned::Hann => GetWindowBuilder::Hann,
            WindowBuilderOwned::Hamming => GetWindowBuilder::Hamming,
            WindowBuilderOwned::Blackman => GetWindowBuilder::Blackman,
            WindowBuilderOwned::BlackmanHarris => GetWindowBuilder::BlackmanHarris,
            WindowBuilderOwned::Nuttall => GetWindowBuilder::Nuttall,
            WindowBuilderOwned::Kaiser { beta } => GetWindowBuilder::Kaiser { beta: *beta },
            WindowBuilderOwned::Gaussian { std } => GetWindowBuilder::Gaussian { std: *std },
            WindowBuilderOwned::GeneralCosine { weights } => GetWindowBuilder::GeneralCosine {
                weights: weights.as_slice(),
            },
            WindowBuilderOwned::GeneralGaussian { p, width } => GetWindowBuilder::GeneralGaussian {
                p: *p,
                width: *width,
            },
            WindowBuilderOwned::GeneralHamming { coefficient } => {
                GetWindowBuilder::GeneralHamming {
                    coefficient: *coefficient,
                }
            }
            WindowBuilderOwned::Tukey { alpha } => GetWindowBuilder::Tukey { alpha: *alpha },
        }
    }

    /// Build a concrete [`Window`] with the given length and symmetry mode.
    pub fn build_window(&self, nx: usize, fftbins: Option<bool>) -> Window<F> {
        get_window(self.as_builder(), nx, fftbins)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let finite = |arg: &'static str, v: F| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::NonFinite { arg })
            }
        };
        match self {
            WindowBuilderOwned::Kaiser { beta } => finite("beta", *beta),
            WindowBuilderOwned::Gaussian { std } => {
                finite("std", *std)?;
                if *std <= F::zero() {
                    return Err(ConfigError::InvalidArgument {
                        arg: "std",
                        reason: "gaussian standard deviation must be > 0",
                    });
                }
                Ok(())
            }
            WindowBuilderOwned::GeneralCosine { weights } => {
                if weights.is_empty() {
                    return Err(ConfigError::EmptyInput { arg: "weights" });
                }
                weights.iter().try_for_each(|w| finite("weights", *w))
            }
            WindowBuilderOwned::GeneralGaussian { p, width } => {
                finite("p", *p)?;
                finite("width", *width)?;
                if *width <= F::zero() {
                    return Err(ConfigError::InvalidArgument {
                        arg: "width",
                        reason: "general gaussian width must be > 0",
                    });
                }
                Ok(())
            }
            WindowBuilderOwned::GeneralHamming { coefficient } => {
                finite("coefficient", *coefficient)
            }
            WindowBuilderOwned::Tukey { alpha } => {
                finite("alpha", *alpha)?;
                if *alpha < F::zero() || *alpha > F::one() {
                    return Err(ConfigError::InvalidArgument {
                        arg: "alpha",
                        reason: "tukey taper fraction must lie in [0, 1]",
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Constructor config for [`WindowKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig<F> {
    /// Window family and parameters.
    pub builder: WindowBuilderOwned<F>,
    /// Output length.
    pub nx: usize,
    /// FFT-bin mode (`Some(true)` periodic, `Some(false)` symmetric).
    pub fftbins: Option<bool>,
}

/// Trait-first window generation kernel.
///
/// NLFM envelopes are usually requested as symmetric windows
/// (`fftbins: Some(false)`), so the window peak sits on the center bin that
/// the chirp-rate lookup maps to the center frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowKernel<F> {
    builder: WindowBuilderOwned<F>,
    nx: usize,
    fftbins: Option<bool>,
}

impl<F> KernelLifecycle for WindowKernel<F>
where
    F: Float,
{
    type Config = WindowConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.nx == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "nx",
                reason: "window length must be greater than 0",
            });
        }
        config.builder.validate()?;

        Ok(Self {
            builder: config.builder,
            nx: config.nx,
            fftbins: config.fftbins,
        })
    }
}

impl<F> WindowGenerate<F> for WindowKernel<F>
where
    F: Float + FloatConst,
{
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<F> + ?Sized,
    {
        let out = bind_output(out, self.nx)?;
        let generated = self.run_alloc()?;
        out.copy_from_slice(&generated);
        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<F>, ExecInvariantViolation> {
        let window = self.builder.build_window(self.nx, self.fftbins);
        Ok(window.get_window())
    }
}
