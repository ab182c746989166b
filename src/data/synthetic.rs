//! Synthetic single-signal dataset.
//!
//! `y = x_m + e` with `e ~ Uniform(0, noise_max)`, where `x_m = 0, 1, …, n-1`
//! is the only non-zero column of an otherwise zero feature matrix. Exactly one
//! column is predictive, which makes the expected selection result known.

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::domain::Dataset;
use crate::error::SelectError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    pub observations: usize,
    pub features: usize,
    /// Index of the informative column.
    pub signal: usize,
    /// Upper bound of the additive uniform noise.
    pub noise_max: f64,
    pub seed: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            observations: 501,
            features: 20,
            signal: 10,
            noise_max: 50.0,
            seed: 99,
        }
    }
}

pub fn single_signal(config: &SignalConfig) -> Result<Dataset, SelectError> {
    if config.observations < 2 {
        return Err(SelectError::out_of_range("observations", "must be at least 2"));
    }
    if config.features == 0 {
        return Err(SelectError::out_of_range("features", "must be greater than zero"));
    }
    if config.signal >= config.features {
        return Err(SelectError::out_of_range(
            "signal",
            format!("must be on [0, {})", config.features),
        ));
    }
    if !(config.noise_max.is_finite() && config.noise_max > 0.0) {
        return Err(SelectError::out_of_range("noise_max", "must be finite and greater than zero"));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Uniform::new(0.0, config.noise_max);

    let n = config.observations;
    let x = DMatrix::from_fn(n, config.features, |i, j| {
        if j == config.signal { i as f64 } else { 0.0 }
    });
    let y = DVector::from_fn(n, |i, _| i as f64 + noise.sample(&mut rng));

    Ok(Dataset {
        feature_names: (0..config.features).map(|j| format!("x{j}")).collect(),
        target_name: "y".to_string(),
        x,
        y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_signal_column_is_non_zero() {
        let data = single_signal(&SignalConfig::default()).unwrap();
        assert_eq!(data.x.shape(), (501, 20));
        for j in 0..20 {
            let non_zero = data.x.column(j).iter().any(|&v| v != 0.0);
            assert_eq!(non_zero, j == 10, "column {j}");
        }
    }

    #[test]
    fn noise_stays_within_bounds() {
        let config = SignalConfig {
            observations: 200,
            noise_max: 5.0,
            ..SignalConfig::default()
        };
        let data = single_signal(&config).unwrap();
        for i in 0..200 {
            let e = data.y[i] - data.x[(i, config.signal)];
            assert!((0.0..5.0).contains(&e), "noise {e} out of range");
        }
    }

    #[test]
    fn same_seed_same_data() {
        let a = single_signal(&SignalConfig::default()).unwrap();
        let b = single_signal(&SignalConfig::default()).unwrap();
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn signal_index_must_exist() {
        let config = SignalConfig {
            signal: 20,
            ..SignalConfig::default()
        };
        assert!(single_signal(&config).is_err());
    }
}
