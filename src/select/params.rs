//! Stopping parameters and their normalization.
//!
//! Each search takes two mutually exclusive stopping parameters: a feature
//! count (absolute or a proportion of the total) and a minimum significant
//! change in the score. Exactly one of them must be set per call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SelectError;

/// A numeric stopping parameter.
///
/// `Int` is an absolute count, `Float` a proportion on `(0, 1)` when used as a
/// count, or a plain threshold when used as a minimum change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// Parse a raw (e.g. command-line) value for parameter `name`.
    ///
    /// Integers are tried first, so `"3"` is a count and `"0.3"` a proportion.
    pub fn parse(name: &str, raw: &str) -> Result<Self, SelectError> {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<i64>() {
            return Ok(ParamValue::Int(v));
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(ParamValue::Float(v)),
            _ => Err(SelectError::InvalidParamType {
                name: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            ParamValue::Int(v) => v as f64,
            ParamValue::Float(v) => v,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// The stopping mode chosen for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopRule {
    /// A feature-count target, not yet normalized against the total.
    Count { name: &'static str, value: ParamValue },
    /// Minimum oriented improvement considered significant.
    MinChange(f64),
}

/// Convert a count parameter into a concrete number of features.
///
/// - `Int(v)` must satisfy `0 < v < total` and is returned unchanged.
/// - `Float(f)` must satisfy `0 < f < 1`; the result is `floor(f · total)`,
///   raised to 1 so a proportion never asks for an empty set.
pub fn normalize_count(name: &str, value: ParamValue, total: usize) -> Result<usize, SelectError> {
    match value {
        ParamValue::Int(v) => {
            if v > 0 && (v as u64) < total as u64 {
                Ok(v as usize)
            } else {
                Err(SelectError::out_of_range(
                    name,
                    format!("must be on (0, {total}) when an int (got {v})"),
                ))
            }
        }
        ParamValue::Float(f) => {
            if f.is_finite() && f > 0.0 && f < 1.0 {
                Ok(((f * total as f64).floor() as usize).max(1))
            } else {
                Err(SelectError::out_of_range(
                    name,
                    format!("must be on (0, 1) when a float (got {f})"),
                ))
            }
        }
    }
}

/// Pick the single active stopping parameter out of `count` and `change`.
///
/// Zero or two set parameters is a type error naming both, alphabetically.
/// The set parameter must be strictly greater than zero.
pub fn resolve_stop_rule(
    count: (&'static str, Option<ParamValue>),
    change: (&'static str, Option<ParamValue>),
) -> Result<StopRule, SelectError> {
    let (count_name, count_value) = count;
    let (change_name, change_value) = change;

    let rule = match (count_value, change_value) {
        (Some(value), None) => StopRule::Count {
            name: count_name,
            value,
        },
        (None, Some(value)) => StopRule::MinChange(value.as_f64()),
        _ => {
            let (first, second) = if count_name <= change_name {
                (count_name, change_name)
            } else {
                (change_name, count_name)
            };
            return Err(SelectError::ExclusiveParams { first, second });
        }
    };

    let (name, value) = match rule {
        StopRule::Count { name, value } => (name, value.as_f64()),
        StopRule::MinChange(v) => (change_name, v),
    };
    if !(value > 0.0) {
        return Err(SelectError::out_of_range(name, "must be greater than zero"));
    }
    Ok(rule)
}

/// Stopping parameters for forward selection.
///
/// The default stops once an accepted feature improves the score by less
/// than `0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardParams {
    pub min_change: Option<ParamValue>,
    pub max_features: Option<ParamValue>,
}

impl Default for ForwardParams {
    fn default() -> Self {
        Self {
            min_change: Some(ParamValue::Float(0.5)),
            max_features: None,
        }
    }
}

impl ForwardParams {
    pub fn min_change(value: impl Into<ParamValue>) -> Self {
        Self {
            min_change: Some(value.into()),
            max_features: None,
        }
    }

    pub fn max_features(value: impl Into<ParamValue>) -> Self {
        Self {
            min_change: None,
            max_features: Some(value.into()),
        }
    }

    pub(crate) fn resolve(&self, total: usize) -> Result<ForwardStop, SelectError> {
        let rule = resolve_stop_rule(
            ("max_features", self.max_features),
            ("min_change", self.min_change),
        )?;
        Ok(match rule {
            StopRule::Count { name, value } => ForwardStop::MaxFeatures(normalize_count(name, value, total)?),
            StopRule::MinChange(t) => ForwardStop::MinChange(t),
        })
    }
}

/// Stopping parameters for backward elimination.
///
/// The default keeps half of the features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackwardParams {
    pub n_features: Option<ParamValue>,
    pub min_change: Option<ParamValue>,
}

impl Default for BackwardParams {
    fn default() -> Self {
        Self {
            n_features: Some(ParamValue::Float(0.5)),
            min_change: None,
        }
    }
}

impl BackwardParams {
    pub fn n_features(value: impl Into<ParamValue>) -> Self {
        Self {
            n_features: Some(value.into()),
            min_change: None,
        }
    }

    pub fn min_change(value: impl Into<ParamValue>) -> Self {
        Self {
            n_features: None,
            min_change: Some(value.into()),
        }
    }

    pub(crate) fn resolve(&self, total: usize) -> Result<BackwardStop, SelectError> {
        let rule = resolve_stop_rule(
            ("n_features", self.n_features),
            ("min_change", self.min_change),
        )?;
        Ok(match rule {
            StopRule::Count { name, value } => BackwardStop::Target(normalize_count(name, value, total)?),
            StopRule::MinChange(t) => BackwardStop::MinChange(t),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ForwardStop {
    MinChange(f64),
    MaxFeatures(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum BackwardStop {
    Target(usize),
    MinChange(f64),
}
