//! Error types.
//!
//! - `SelectError`: library errors raised by the estimator contract, the
//!   criterion math and the selection engine.
//! - `AppError`: binary-level error carrying a process exit code.

/// Broad category of a [`SelectError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model lacks one of `fit` / `predict` / `score`.
    Capability,
    /// Wrong shapes, non-finite data, or malformed stopping parameters.
    Type,
    /// A parameter is present but outside its allowed range.
    Range,
    /// A log/division domain failure inside the criterion math.
    NumericDomain,
    /// The estimator itself failed.
    Model,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
    #[error("model does not provide a `{method}` method")]
    MissingCapability { method: &'static str },

    #[error("`{name}` has shape {found}, expected {expected}")]
    ShapeMismatch {
        name: &'static str,
        expected: String,
        found: String,
    },

    #[error("`{name}` contains non-finite values")]
    NonFinite { name: &'static str },

    #[error("`{name}` must be of type int or float (got `{value}`)")]
    InvalidParamType { name: String, value: String },

    /// Names are stored in alphabetical order.
    #[error("exactly one of `{first}` and `{second}` must be set")]
    ExclusiveParams {
        first: &'static str,
        second: &'static str,
    },

    #[error("`{name}` {reason}")]
    OutOfRange { name: String, reason: String },

    #[error("too few features to select among: found {found}, need at least {min}")]
    TooFewFeatures { found: usize, min: usize },

    #[error("numeric domain error: {0}")]
    NumericDomain(String),

    #[error("model error: {0}")]
    Model(String),
}

impl SelectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SelectError::MissingCapability { .. } => ErrorKind::Capability,
            SelectError::ShapeMismatch { .. }
            | SelectError::NonFinite { .. }
            | SelectError::InvalidParamType { .. }
            | SelectError::ExclusiveParams { .. } => ErrorKind::Type,
            SelectError::OutOfRange { .. } | SelectError::TooFewFeatures { .. } => ErrorKind::Range,
            SelectError::NumericDomain(_) => ErrorKind::NumericDomain,
            SelectError::Model(_) => ErrorKind::Model,
        }
    }

    pub(crate) fn out_of_range(name: &str, reason: impl Into<String>) -> Self {
        SelectError::OutOfRange {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SelectError> for AppError {
    fn from(err: SelectError) -> Self {
        let exit_code = match (&err, err.kind()) {
            (SelectError::TooFewFeatures { .. }, _) => 3,
            (_, ErrorKind::Capability | ErrorKind::Type | ErrorKind::Range) => 2,
            (_, ErrorKind::NumericDomain | ErrorKind::Model) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
