//! Window functions used as target spectral envelopes.
//!
//! The generators follow `scipy.signal.windows`: every window takes a length
//! `m` and a `sym` flag. `sym = true` yields the symmetric window used for
//! filter design and for NLFM envelopes; `sym = false` yields the periodic
//! variant (one sample longer, truncated) used for spectral analysis.

use alloc::vec::Vec;
use num_traits::{Float, FloatConst};

mod kernels;
pub use kernels::*;

/// Generate the samples of a configured window.
pub trait GetWindow<W = f64>
where
    W: Float,
{
    /// Return the window samples.
    fn get_window(&self) -> Vec<W>;
}

fn cast<F: Float>(x: f64) -> F {
    // Only fails for exotic scalar types; a NaN sample is rejected downstream.
    F::from(x).unwrap_or_else(F::nan)
}

fn len_guard<F: Float>(m: usize) -> Option<Vec<F>> {
    if m <= 1 {
        Some(alloc::vec![F::one(); m])
    } else {
        None
    }
}

fn extend(m: usize, sym: bool) -> (usize, bool) {
    if sym {
        (m, false)
    } else {
        (m + 1, true)
    }
}

fn truncate<F>(mut w: Vec<F>, needed: bool) -> Vec<F> {
    if needed {
        w.pop();
    }
    w
}

fn general_cosine<F: Float + FloatConst>(m: usize, a: &[F], sym: bool) -> Vec<F> {
    if let Some(w) = len_guard(m) {
        return w;
    }
    let (m, trunc) = extend(m, sym);
    let pi = F::PI();
    let step = (pi + pi) / cast::<F>((m - 1) as f64);
    let w = (0..m)
        .map(|i| {
            let fac = -pi + step * cast::<F>(i as f64);
            a.iter().enumerate().fold(F::zero(), |acc, (k, ak)| {
                acc + *ak * (cast::<F>(k as f64) * fac).cos()
            })
        })
        .collect();
    truncate(w, trunc)
}

/// Rectangular window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boxcar {
    m: usize,
    sym: bool,
}

impl Boxcar {
    /// Rectangular window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float> GetWindow<W> for Boxcar {
    fn get_window(&self) -> Vec<W> {
        let (m, trunc) = extend(self.m, self.sym);
        truncate(alloc::vec![W::one(); m], trunc)
    }
}

/// Triangular window without zero end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    m: usize,
    sym: bool,
}

impl Triangle {
    /// Triangular window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float> GetWindow<W> for Triangle {
    fn get_window(&self) -> Vec<W> {
        if let Some(w) = len_guard(self.m) {
            return w;
        }
        let (m, trunc) = extend(self.m, self.sym);
        let half: Vec<W> = (1..=m.div_ceil(2))
            .map(|n| {
                if m.is_multiple_of(2) {
                    cast::<W>((2 * n - 1) as f64) / cast(m as f64)
                } else {
                    cast::<W>((2 * n) as f64) / cast((m + 1) as f64)
                }
            })
            .collect();
        let mirror = if m.is_multiple_of(2) {
            half.len()
        } else {
            half.len() - 1
        };
        let mut w = half.clone();
        w.extend(half[..mirror].iter().rev().copied());
        truncate(w, trunc)
    }
}

/// Generalized Hamming window, `alpha - (1 - alpha) cos(2 pi n / (M - 1))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralHamming<F> {
    m: usize,
    alpha: F,
    sym: bool,
}

impl<F> GeneralHamming<F> {
    /// Generalized Hamming window of length `m` with coefficient `alpha`.
    pub fn new(m: usize, alpha: F, sym: bool) -> Self {
        Self { m, alpha, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for GeneralHamming<W> {
    fn get_window(&self) -> Vec<W> {
        general_cosine(self.m, &[self.alpha, W::one() - self.alpha], self.sym)
    }
}

/// Hamming window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hamming {
    m: usize,
    sym: bool,
}

impl Hamming {
    /// Hamming window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for Hamming {
    fn get_window(&self) -> Vec<W> {
        GeneralHamming::new(self.m, cast(0.54), self.sym).get_window()
    }
}

/// Hann window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hann {
    m: usize,
    sym: bool,
}

impl Hann {
    /// Hann window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for Hann {
    fn get_window(&self) -> Vec<W> {
        GeneralHamming::new(self.m, cast(0.5), self.sym).get_window()
    }
}

/// Weighted sum of cosine terms.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralCosine<F> {
    m: usize,
    weights: Vec<F>,
    sym: bool,
}

impl<F> GeneralCosine<F> {
    /// General cosine window of length `m`.
    pub fn new(m: usize, weights: Vec<F>, sym: bool) -> Self {
        Self { m, weights, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for GeneralCosine<W> {
    fn get_window(&self) -> Vec<W> {
        general_cosine(self.m, &self.weights, self.sym)
    }
}

/// Blackman window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blackman {
    m: usize,
    sym: bool,
}

impl Blackman {
    /// Blackman window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for Blackman {
    fn get_window(&self) -> Vec<W> {
        general_cosine(self.m, &[cast(0.42), cast(0.50), cast(0.08)], self.sym)
    }
}

/// Minimum 4-term Blackman-Harris window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackmanHarris {
    m: usize,
    sym: bool,
}

impl BlackmanHarris {
    /// Blackman-Harris window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for BlackmanHarris {
    fn get_window(&self) -> Vec<W> {
        let a = [cast(0.35875), cast(0.48829), cast(0.14128), cast(0.01168)];
        general_cosine(self.m, &a, self.sym)
    }
}

/// Minimum 4-term Blackman-Harris window according to Nuttall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nuttall {
    m: usize,
    sym: bool,
}

impl Nuttall {
    /// Nuttall window of length `m`.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for Nuttall {
    fn get_window(&self) -> Vec<W> {
        let a = [
            cast(0.3635819),
            cast(0.4891775),
            cast(0.1365995),
            cast(0.0106411),
        ];
        general_cosine(self.m, &a, self.sym)
    }
}

/// Gaussian window with standard deviation `std` in samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian<F> {
    m: usize,
    std: F,
    sym: bool,
}

impl<F> Gaussian<F> {
    /// Gaussian window of length `m`.
    pub fn new(m: usize, std: F, sym: bool) -> Self {
        Self { m, std, sym }
    }
}

impl<W: Float> GetWindow<W> for Gaussian<W> {
    fn get_window(&self) -> Vec<W> {
        GeneralGaussian::new(self.m, W::one(), self.std, self.sym).get_window()
    }
}

/// Generalized Gaussian window, `exp(-0.5 |n / width|^(2p))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralGaussian<F> {
    m: usize,
    p: F,
    width: F,
    sym: bool,
}

impl<F> GeneralGaussian<F> {
    /// Generalized Gaussian window of length `m`.
    pub fn new(m: usize, p: F, width: F, sym: bool) -> Self {
        Self { m, p, width, sym }
    }
}

impl<W: Float> GetWindow<W> for GeneralGaussian<W> {
    fn get_window(&self) -> Vec<W> {
        if let Some(w) = len_guard(self.m) {
            return w;
        }
        let (m, trunc) = extend(self.m, self.sym);
        let center = cast::<W>((m - 1) as f64) / cast(2.0);
        let two_p = self.p + self.p;
        let w = (0..m)
            .map(|i| {
                let n = cast::<W>(i as f64) - center;
                (cast::<W>(-0.5) * (n / self.width).abs().powf(two_p)).exp()
            })
            .collect();
        truncate(w, trunc)
    }
}

/// Kaiser window with shape parameter `beta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kaiser<F> {
    m: usize,
    beta: F,
    sym: bool,
}

impl<F> Kaiser<F> {
    /// Kaiser window of length `m`.
    pub fn new(m: usize, beta: F, sym: bool) -> Self {
        Self { m, beta, sym }
    }
}

/// Modified Bessel function of the first kind, order zero, by power series.
fn bessel_i0<F: Float>(x: F) -> F {
    let half_x = x / cast(2.0);
    let mut term = F::one();
    let mut sum = F::one();
    let mut k = F::one();
    while term > sum * F::epsilon() {
        let ratio = half_x / k;
        term = term * ratio * ratio;
        sum = sum + term;
        k = k + F::one();
    }
    sum
}

impl<W: Float> GetWindow<W> for Kaiser<W> {
    fn get_window(&self) -> Vec<W> {
        if let Some(w) = len_guard(self.m) {
            return w;
        }
        let (m, trunc) = extend(self.m, self.sym);
        let alpha = cast::<W>((m - 1) as f64) / cast(2.0);
        let denom = bessel_i0(self.beta);
        let w = (0..m)
            .map(|i| {
                let r = (cast::<W>(i as f64) - alpha) / alpha;
                let arg = (W::one() - r * r).max(W::zero()).sqrt();
                bessel_i0(self.beta * arg) / denom
            })
            .collect();
        truncate(w, trunc)
    }
}

/// Tukey (tapered cosine) window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tukey<F> {
    m: usize,
    alpha: F,
    sym: bool,
}

impl<F> Tukey<F> {
    /// Tukey window of length `m` with taper fraction `alpha`.
    pub fn new(m: usize, alpha: F, sym: bool) -> Self {
        Self { m, alpha, sym }
    }
}

impl<W: Float + FloatConst> GetWindow<W> for Tukey<W> {
    fn get_window(&self) -> Vec<W> {
        if let Some(w) = len_guard(self.m) {
            return w;
        }
        if self.alpha <= W::zero() {
            return Boxcar::new(self.m, self.sym).get_window();
        }
        if self.alpha >= W::one() {
            return Hann::new(self.m, self.sym).get_window();
        }
        let (m, trunc) = extend(self.m, self.sym);
        let span = cast::<W>((m - 1) as f64);
        let width = (self.alpha * span / cast(2.0))
            .floor()
            .to_usize()
            .unwrap_or(0);
        let half = cast::<W>(0.5);
        let two = cast::<W>(2.0);
        let pi = W::PI();
        let w = (0..m)
            .map(|i| {
                let n = cast::<W>(i as f64);
                if i <= width {
                    half * (W::one() + (pi * (-W::one() + two * n / self.alpha / span)).cos())
                } else if i < m - width - 1 {
                    W::one()
                } else {
                    half * (W::one()
                        + (pi * (-two / self.alpha + W::one() + two * n / self.alpha / span))
                            .cos())
                }
            })
            .collect();
        truncate(w, trunc)
    }
}

/// Borrowed window family selector for [`get_window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GetWindowBuilder<'a, F> {
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
        weights: &'a [F],
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

/// A configured window of any supported family.
#[derive(Debug, Clone, PartialEq)]
pub enum Window<F> {
    /// Boxcar window.
    Boxcar(Boxcar),
    /// Triangle window.
    Triangle(Triangle),
    /// Hann window.
    Hann(Hann),
    /// Hamming window.
    Hamming(Hamming),
    /// Blackman window.
    Blackman(Blackman),
    /// Blackman-Harris window.
    BlackmanHarris(BlackmanHarris),
    /// Nuttall window.
    Nuttall(Nuttall),
    /// Kaiser window.
    Kaiser(Kaiser<F>),
    /// Gaussian window.
    Gaussian(Gaussian<F>),
    /// General cosine window.
    GeneralCosine(GeneralCosine<F>),
    /// General gaussian window.
    GeneralGaussian(GeneralGaussian<F>),
    /// General hamming window.
    GeneralHamming(GeneralHamming<F>),
    /// Tukey window.
    Tukey(Tukey<F>),
}

impl<W: Float + FloatConst> GetWindow<W> for Window<W> {
    fn get_window(&self) -> Vec<W> {
        match self {
            Window::Boxcar(w) => w.get_window(),
            Window::Triangle(w) => w.get_window(),
            Window::Hann(w) => w.get_window(),
            Window::Hamming(w) => w.get_window(),
            Window::Blackman(w) => w.get_window(),
            Window::BlackmanHarris(w) => w.get_window(),
            Window::Nuttall(w) => w.get_window(),
            Window::Kaiser(w) => w.get_window(),
            Window::Gaussian(w) => w.get_window(),
            Window::GeneralCosine(w) => w.get_window(),
            Window::GeneralGaussian(w) => w.get_window(),
            Window::GeneralHamming(w) => w.get_window(),
            Window::Tukey(w) => w.get_window(),
        }
    }
}

/// Return a window of a given length and type.
///
/// `fftbins = Some(true)` or `None` builds the periodic window (scipy's
/// default); `Some(false)` builds the symmetric window.
pub fn get_window<F>(builder: GetWindowBuilder<'_, F>, nx: usize, fftbins: Option<bool>) -> Window<F>
where
    F: Float,
{
    let sym = !fftbins.unwrap_or(true);
    match builder {
        GetWindowBuilder::Boxcar => Window::Boxcar(Boxcar::new(nx, sym)),
        GetWindowBuilder::Triangle => Window::Triangle(Triangle::new(nx, sym)),
        GetWindowBuilder::Hann => Window::Hann(Hann::new(nx, sym)),
        GetWindowBuilder::Hamming => Window::Hamming(Hamming::new(nx, sym)),
        GetWindowBuilder::Blackman => Window::Blackman(Blackman::new(nx, sym)),
        GetWindowBuilder::BlackmanHarris => Window::BlackmanHarris(BlackmanHarris::new(nx, sym)),
        GetWindowBuilder::Nuttall => Window::Nuttall(Nuttall::new(nx, sym)),
        GetWindowBuilder::Kaiser { beta } => Window::Kaiser(Kaiser::new(nx, beta, sym)),
        GetWindowBuilder::Gaussian { std } => Window::Gaussian(Gaussian::new(nx, std, sym)),
        GetWindowBuilder::GeneralCosine { weights } => {
            Window::GeneralCosine(GeneralCosine::new(nx, weights.to_vec(), sym))
        }
        GetWindowBuilder::GeneralGaussian { p, width } => {
            Window::GeneralGaussian(GeneralGaussian::new(nx, p, width, sym))
        }
        GetWindowBuilder::GeneralHamming { coefficient } => {
            Window::GeneralHamming(GeneralHamming::new(nx, coefficient, sym))
        }
        GetWindowBuilder::Tukey { alpha } => Window::Tukey(Tukey::new(nx, alpha, sym)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[track_caller]
    fn assert_window_eq(actual: Vec<f64>, expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(a, e, epsilon = 1e-8);
        }
    }

    #[test]
    fn hamming_symmetric_matches_scipy() {
        // scipy.signal.windows.hamming(7)
        assert_window_eq(
            Hamming::new(7, true).get_window(),
            &[0.08, 0.31, 0.77, 1.0, 0.77, 0.31, 0.08],
        );
    }

    #[test]
    fn hamming_periodic_drops_the_repeated_sample() {
        let periodic: Vec<f64> = Hamming::new(8, false).get_window();
        let symmetric: Vec<f64> = Hamming::new(9, true).get_window();
        assert_window_eq(periodic, &symmetric[..8]);
    }

    #[test]
    fn hann_and_blackman_endpoints_are_zero() {
        let hann: Vec<f64> = Hann::new(5, true).get_window();
        assert_window_eq(hann, &[0.0, 0.5, 1.0, 0.5, 0.0]);
        let blackman: Vec<f64> = Blackman::new(5, true).get_window();
        assert_window_eq(blackman, &[0.0, 0.34, 1.0, 0.34, 0.0]);
    }

    #[test]
    fn triangle_matches_scipy_for_odd_and_even_lengths() {
        assert_window_eq(
            Triangle::new(5, true).get_window(),
            &[1.0 / 3.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 1.0 / 3.0],
        );
        assert_window_eq(
            Triangle::new(4, true).get_window(),
            &[0.25, 0.75, 0.75, 0.25],
        );
    }

    #[test]
    fn gaussian_peaks_at_center() {
        let w: Vec<f64> = Gaussian::new(9, 2.0, true).get_window();
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[0], (-16.0f64 / 8.0).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(w[0], w[8], epsilon = 1e-12);
    }

    #[test]
    fn kaiser_matches_scipy_reference() {
        // scipy.signal.windows.kaiser(5, beta=6.0)
        assert_window_eq(
            Kaiser::new(5, 6.0, true).get_window(),
            &[0.01487334, 0.48295561, 1.0, 0.48295561, 0.01487334],
        );
    }

    #[test]
    fn tukey_interpolates_between_boxcar_and_hann() {
        let boxcar: Vec<f64> = Tukey::new(6, 0.0, true).get_window();
        assert_window_eq(boxcar, &[1.0; 6]);
        let hann: Vec<f64> = Tukey::new(6, 1.0, true).get_window();
        assert_window_eq(hann, &Hann::new(6, true).get_window());
        // scipy.signal.windows.tukey(8, alpha=0.5)
        assert_window_eq(
            Tukey::new(8, 0.5, true).get_window(),
            &[0.0, 0.61126047, 1.0, 1.0, 1.0, 1.0, 0.61126047, 0.0],
        );
    }

    #[test]
    fn short_windows_are_ones() {
        let single: Vec<f64> = get_window(GetWindowBuilder::Hamming, 1, Some(false)).get_window();
        assert_eq!(single, vec![1.0]);
        let empty: Vec<f64> = get_window(GetWindowBuilder::Hamming, 0, None).get_window();
        assert!(empty.is_empty());
    }

    #[test]
    fn builder_defaults_to_periodic() {
        let periodic: Vec<f64> = get_window(GetWindowBuilder::Hann, 8, None).get_window();
        let explicit: Vec<f64> = Hann::new(8, false).get_window();
        assert_eq!(periodic, explicit);
    }
}
