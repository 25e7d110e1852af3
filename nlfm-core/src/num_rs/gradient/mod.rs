use crate::{invalid_arg, Result};
use ndarray::{Array1, ArrayView1};
use num_traits::Num;

/// Numerical derivative on a uniform grid, `np.gradient(f, dx)`.
///
/// Interior points use second-order central differences; the two end points
/// use first-order one-sided differences (numpy's `edge_order=1`).
///
/// # Errors
/// Fails when `f` has fewer than two samples or `dx` is zero.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use nlfm_core::num_rs::gradient;
///
/// let f = array![1., 2., 4., 7., 11.];
/// let df = gradient((&f).into(), 1.0).unwrap();
/// assert_eq!(df, array![1., 1.5, 2.5, 3.5, 4.]);
/// ```
pub fn gradient<T>(f: ArrayView1<T>, dx: T) -> Result<Array1<T>>
where
    T: Num + Copy,
{
    let n = f.len();
    if n < 2 {
        return Err(invalid_arg(
            "f",
            "gradient requires at least two samples",
        ));
    }
    if dx == T::zero() {
        return Err(invalid_arg("dx", "sample spacing must be non-zero"));
    }

    let two_dx = dx + dx;
    let mut out = Array1::from_elem(n, T::zero());
    out[0] = (f[1] - f[0]) / dx;
    out[n - 1] = (f[n - 1] - f[n - 2]) / dx;
    for i in 1..n - 1 {
        out[i] = (f[i + 1] - f[i - 1]) / two_dx;
    }
    Ok(out)
}
