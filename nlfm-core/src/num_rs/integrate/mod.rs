use ndarray::{Array1, ArrayView1};
use num_traits::Num;

/// Scaled running sum, `np.cumsum(a) * dx`.
///
/// This is the first-order rectangular-rule indefinite integral used
/// throughout the chirp-design pipeline. The running sum is accumulated
/// first and scaled afterwards, matching numpy's evaluation order so
/// results agree bit-for-bit with `np.cumsum(a) * dx`.
///
/// # Parameters
/// * `a` : (N,) [[array_like]]([ndarray::Array1])  
///   Samples of the integrand on a uniform grid.
/// * `dx` : Grid spacing.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use nlfm_core::num_rs::cumsum;
///
/// let a = array![1., 2., 3., 4.];
/// let result = cumsum((&a).into(), 0.5);
/// assert_eq!(result, array![0.5, 1.5, 3.0, 5.0]);
/// ```
pub fn cumsum<T>(a: ArrayView1<T>, dx: T) -> Array1<T>
where
    T: Num + Copy,
{
    let mut acc = T::zero();
    a.iter()
        .map(|&x| {
            acc = acc + x;
            acc * dx
        })
        .collect()
}

/// Composite trapezoidal rule, `np.trapz(y, dx=dx)`.
///
/// Returns zero for inputs with fewer than two samples.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use nlfm_core::num_rs::trapz;
///
/// let y = array![1., 2., 3.];
/// assert_eq!(trapz((&y).into(), 1.0), 4.0);
/// ```
pub fn trapz<T>(y: ArrayView1<T>, dx: T) -> T
where
    T: Num + Copy,
{
    let two = T::one() + T::one();
    y.iter()
        .zip(y.iter().skip(1))
        .fold(T::zero(), |acc, (&lo, &hi)| acc + dx * (lo + hi) / two)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn cumsum_scales_after_summing() {
        let a = array![0.1, 0.2, 0.3];
        let result = cumsum((&a).into(), 10.0);
        let expected = array![(0.1) * 10.0, (0.1 + 0.2) * 10.0, (0.1 + 0.2 + 0.3) * 10.0];
        assert_eq!(result, expected);
    }

    #[test]
    fn cumsum_of_empty_is_empty() {
        let a: Array1<f64> = Array1::zeros(0);
        assert!(cumsum((&a).into(), 1.0).is_empty());
    }

    #[test]
    fn trapz_of_constant_spans_the_grid() {
        let y = Array1::from_elem(11, 4.0f64);
        // 10 intervals of width 0.1
        let area = trapz((&y).into(), 0.1);
        assert!((area - 4.0).abs() < 1e-12);
    }

    #[test]
    fn trapz_of_short_inputs_is_zero() {
        let single = array![3.0];
        assert_eq!(trapz((&single).into(), 1.0), 0.0);
        let empty: Array1<f64> = Array1::zeros(0);
        assert_eq!(trapz((&empty).into(), 1.0), 0.0);
    }

    #[test]
    fn trapz_matches_linear_ramp_exactly() {
        let y: Array1<f64> = Array1::linspace(0.0, 1.0, 101);
        let area = trapz((&y).into(), 0.01);
        assert!((area - 0.5).abs() < 1e-12);
    }
}
