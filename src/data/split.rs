//! Shape validation and the seeded train/validation split.

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::SelectError;

/// Training and validation arrays for one selection run.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: DMatrix<f64>,
    pub y_train: DVector<f64>,
    pub x_val: DMatrix<f64>,
    pub y_val: DVector<f64>,
}

/// Check that `y` pairs with `x` row-for-row and both are finite.
pub fn check_pair(
    x_name: &'static str,
    x: &DMatrix<f64>,
    y_name: &'static str,
    y: &DVector<f64>,
) -> Result<(), SelectError> {
    if x.nrows() == 0 {
        return Err(SelectError::ShapeMismatch {
            name: x_name,
            expected: "at least one row".to_string(),
            found: format!("{}x{}", x.nrows(), x.ncols()),
        });
    }
    if y.len() != x.nrows() {
        return Err(SelectError::ShapeMismatch {
            name: y_name,
            expected: format!("length {} (rows of `{x_name}`)", x.nrows()),
            found: format!("length {}", y.len()),
        });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(SelectError::NonFinite { name: x_name });
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(SelectError::NonFinite { name: y_name });
    }
    Ok(())
}

/// Shuffle rows with a seeded RNG and hold out `val_fraction` of them.
///
/// The validation size is `ceil(val_fraction · n)`; both sides must end up
/// non-empty.
pub fn train_test_split(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    val_fraction: f64,
    seed: u64,
) -> Result<Split, SelectError> {
    check_pair("x", x, "y", y)?;
    if !(val_fraction.is_finite() && val_fraction > 0.0 && val_fraction < 1.0) {
        return Err(SelectError::out_of_range("val_fraction", "must be on (0, 1)"));
    }

    let n = x.nrows();
    let n_val = (val_fraction * n as f64).ceil() as usize;
    if n_val == 0 || n_val >= n {
        return Err(SelectError::out_of_range(
            "val_fraction",
            format!("leaves an empty split for {n} observations"),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let (val_idx, train_idx) = order.split_at(n_val);

    Ok(Split {
        x_train: x.select_rows(train_idx.iter()),
        y_train: y.select_rows(train_idx.iter()),
        x_val: x.select_rows(val_idx.iter()),
        y_val: y.select_rows(val_idx.iter()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(n: usize) -> (DMatrix<f64>, DVector<f64>) {
        let x = DMatrix::from_fn(n, 2, |i, j| (i * 10 + j) as f64);
        let y = DVector::from_fn(n, |i, _| i as f64);
        (x, y)
    }

    #[test]
    fn split_sizes_follow_ceiling_rule() {
        let (x, y) = toy(501);
        let split = train_test_split(&x, &y, 0.25, 99).unwrap();
        assert_eq!(split.x_val.nrows(), 126);
        assert_eq!(split.x_train.nrows(), 375);
        assert_eq!(split.y_val.len(), 126);
        assert_eq!(split.y_train.len(), 375);
    }

    #[test]
    fn split_keeps_rows_paired() {
        let (x, y) = toy(40);
        let split = train_test_split(&x, &y, 0.3, 7).unwrap();
        for i in 0..split.x_train.nrows() {
            assert_eq!(split.x_train[(i, 0)], split.y_train[i] * 10.0);
        }
        for i in 0..split.x_val.nrows() {
            assert_eq!(split.x_val[(i, 1)], split.y_val[i] * 10.0 + 1.0);
        }
    }

    #[test]
    fn split_is_deterministic_for_a_seed() {
        let (x, y) = toy(30);
        let a = train_test_split(&x, &y, 0.25, 3).unwrap();
        let b = train_test_split(&x, &y, 0.25, 3).unwrap();
        assert_eq!(a.y_val, b.y_val);
    }

    #[test]
    fn invalid_fraction_is_rejected() {
        let (x, y) = toy(10);
        for bad in [0.0, 1.0, -0.2, f64::NAN] {
            assert!(train_test_split(&x, &y, bad, 0).is_err());
        }
    }

    #[test]
    fn check_pair_rejects_mismatch_and_nan() {
        let (x, y) = toy(4);
        assert!(check_pair("x", &x, "y", &y).is_ok());

        let short = DVector::zeros(3);
        let err = check_pair("x_train", &x, "y_train", &short).unwrap_err();
        assert!(matches!(err, SelectError::ShapeMismatch { name: "y_train", .. }));

        let mut bad = x.clone();
        bad[(1, 1)] = f64::NAN;
        let err = check_pair("x_val", &bad, "y_val", &y).unwrap_err();
        assert_eq!(err, SelectError::NonFinite { name: "x_val" });
    }
}
