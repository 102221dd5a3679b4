use anyhow::{bail, Result};
use ndarray::{ArrayBase, Data, Dimension};

/// Largest absolute elementwise difference between two arrays of the same shape.
pub fn max_abs_diff<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>) -> Result<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    if a.shape() != b.shape() {
        bail!(
            "Cannot compare arrays of shape {:?} and {:?}",
            a.shape(),
            b.shape()
        );
    }
    Ok(a.iter().zip(b.iter()).fold(0.0_f64, |acc, (x, y)| {
        let d = (x - y).abs();
        if d.is_nan() || d > acc {
            d
        } else {
            acc
        }
    }))
}

/// Check that `a` and `b` agree elementwise to strictly less than `eps`.
///
/// Returns an error naming the observed deviation instead of panicking, so
/// callers can decide whether a mismatch is fatal.
pub fn assert_all_close<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>, eps: f64) -> Result<()>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let diff = max_abs_diff(a, b)?;
    // NaN never compares below eps, so it is reported as a mismatch.
    if !(diff < eps) {
        bail!("Arrays differ by {} (tolerance {})", diff, eps);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn identical_arrays_are_close() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(max_abs_diff(&a, &a).unwrap(), 0.0);
        assert!(assert_all_close(&a, &a.view(), 1e-6).is_ok());
    }

    #[test]
    fn tolerance_is_strict() {
        let a = array![0.0, 1.0];
        let b = array![0.0, 1.5];
        assert!((max_abs_diff(&a, &b).unwrap() - 0.5).abs() < 1e-12);
        assert!(assert_all_close(&a, &b, 0.5).is_err());
        assert!(assert_all_close(&a, &b, 0.6).is_ok());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = array![0.0, 1.0];
        let b = array![0.0, 1.0, 2.0];
        assert!(max_abs_diff(&a, &b).is_err());
    }

    #[test]
    fn nan_is_never_close() {
        let a = array![f64::NAN];
        assert!(assert_all_close(&a, &a, 1.0).is_err());
    }
}
