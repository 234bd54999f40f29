//! Shared error types used across submodules.

use std::fmt;

use thiserror::Error;

use crate::transform::filters::FilterError;

/// Top-level error type for the crate.
///
/// Every variant is raised during input validation, before any numerical work
/// starts; the numerical core itself cannot fail.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Raised when the layered model is malformed or physically undefined.
    #[error("invalid model: {0}")]
    InvalidModel(String),
    /// Raised when an orientation code or pole orientation is invalid.
    #[error("invalid orientation: {0}")]
    InvalidOrientation(String),
    /// Raised for invalid poles, frequencies, times or transform parameters.
    #[error("invalid survey: {0}")]
    InvalidSurvey(String),
    /// Wraps errors from custom filter tables.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Adaptive transform that produced a [`PrecisionWarning`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Wavenumber-to-space (Hankel) integration.
    Hankel,
    /// Frequency-to-time (Fourier) integration.
    Fourier,
}

/// Best-effort result marker: an adaptive quadrature exhausted its interval
/// budget before reaching the requested tolerance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionWarning {
    /// Transform that did not converge.
    pub transform: TransformKind,
    /// Offset (Hankel, m) or time (Fourier, s) of the affected sample.
    pub at: f64,
    /// Number of intervals evaluated before giving up.
    pub intervals: usize,
}

impl fmt::Display for PrecisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.transform {
            TransformKind::Hankel => "offset",
            TransformKind::Fourier => "time",
        };
        write!(
            f,
            "{:?} quadrature not converged at {what} {:.6e} after {} intervals",
            self.transform, self.at, self.intervals
        )
    }
}
