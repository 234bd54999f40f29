//! Integral transforms from wavenumber to space and from frequency to time.

/// Filter tables for digital linear filtering.
pub mod filters;
/// Frequency-to-time transforms (DLF, QWE, FFTLog).
pub mod fourier;
/// Wavenumber-to-space transforms (DLF, QWE, panel quadrature).
pub mod hankel;
/// Gauss–Legendre panels and ε-algorithm extrapolation.
pub mod quadrature;
/// Bessel, error and gamma functions.
pub mod special;

pub use filters::{FilterError, FourierFilter, HankelFilter};
pub use fourier::{fourier, FftLogParams, FourierMethod, Signal};
pub use hankel::{hankel, AngularFactors, HankelMethod, SpectralTerms};
pub use quadrature::AdaptiveParams;
