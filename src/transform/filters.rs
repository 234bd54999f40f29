//! Digital linear filters for the Hankel (`J0`/`J1`) and Fourier (`sin`/`cos`)
//! transforms.
//!
//! A filter is a set of log-spaced abscissae `b_k` and weights `w_k` such that
//!
//! ```text
//! ∫₀^∞ f(x) K(x r) dx ≈ (1/r) Σ_k f(b_k / r) w_k
//! ```
//!
//! for the filter's kernel `K`. The built-in filters are designed at first use
//! from the Mellin transform of the kernel, band-limited by an erf taper, and
//! are then shared read-only for the lifetime of the process.

use std::f64::consts::{LN_10, LN_2, PI};
use std::sync::{Arc, OnceLock};

use log::debug;
use thiserror::Error;

use crate::math::{CScalar, Scalar, I};
use crate::transform::special::{bessel_j0, bessel_j1, erf, ln_gamma};

/// Errors raised while building or looking up a filter table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// No built-in filter has the requested name.
    #[error("unknown filter '{0}'")]
    Unknown(String),
    /// The table has no abscissae.
    #[error("filter '{0}' is empty")]
    Empty(String),
    /// A weight column does not match the abscissae in length.
    #[error("filter '{name}': {column} has {len} weights for {base} abscissae")]
    LengthMismatch {
        /// Filter name.
        name: String,
        /// Offending weight column.
        column: &'static str,
        /// Weights in that column.
        len: usize,
        /// Abscissae in the table.
        base: usize,
    },
    /// Abscissae must be positive, finite and strictly increasing.
    #[error("filter '{0}': abscissae must be positive, finite and strictly increasing")]
    InvalidBase(String),
    /// A weight is NaN or infinite.
    #[error("filter '{name}': {column} weight {index} is not finite")]
    NonFinite {
        /// Filter name.
        name: String,
        /// Offending weight column.
        column: &'static str,
        /// Position of the bad weight.
        index: usize,
    },
}

fn validate_table(
    name: &str,
    base: &[Scalar],
    columns: [(&'static str, &[Scalar]); 2],
) -> Result<(), FilterError> {
    if base.is_empty() {
        return Err(FilterError::Empty(name.to_owned()));
    }
    let increasing = base.windows(2).all(|w| w[1] > w[0]);
    if !increasing || base.iter().any(|&b| !(b.is_finite() && b > 0.0)) {
        return Err(FilterError::InvalidBase(name.to_owned()));
    }
    for (column, weights) in columns {
        if weights.len() != base.len() {
            return Err(FilterError::LengthMismatch {
                name: name.to_owned(),
                column,
                len: weights.len(),
                base: base.len(),
            });
        }
        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(FilterError::NonFinite {
                name: name.to_owned(),
                column,
                index,
            });
        }
    }
    Ok(())
}

/// Hankel filter with `J0` and `J1` weights on a shared abscissa grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HankelFilter {
    name: String,
    base: Vec<Scalar>,
    j0: Vec<Scalar>,
    j1: Vec<Scalar>,
}

impl HankelFilter {
    /// Custom filter from explicit abscissae and weights.
    pub fn new(
        name: impl Into<String>,
        base: Vec<Scalar>,
        j0: Vec<Scalar>,
        j1: Vec<Scalar>,
    ) -> Result<Self, FilterError> {
        let name = name.into();
        validate_table(&name, &base, [("j0", &j0), ("j1", &j1)])?;
        Ok(Self { name, base, j0, j1 })
    }

    /// Built-in filter by name (`"erf_30"` or `"erf_20"`).
    pub fn by_name(name: &str) -> Result<Arc<Self>, FilterError> {
        match name {
            "erf_30" => Ok(Self::erf_30()),
            "erf_20" => Ok(Self::erf_20()),
            other => Err(FilterError::Unknown(other.to_owned())),
        }
    }

    /// Default filter: 30 points per decade over `[1e-10, 2e4]`.
    #[must_use]
    pub fn erf_30() -> Arc<Self> {
        static CELL: OnceLock<Arc<HankelFilter>> = OnceLock::new();
        CELL.get_or_init(|| Arc::new(Self::design("erf_30", &ERF_30))).clone()
    }

    /// Lighter filter: 20 points per decade over `[1e-8, 1e4]`.
    #[must_use]
    pub fn erf_20() -> Arc<Self> {
        static CELL: OnceLock<Arc<HankelFilter>> = OnceLock::new();
        CELL.get_or_init(|| Arc::new(Self::design("erf_20", &ERF_20))).clone()
    }

    fn design(name: &str, window: &ErfWindow) -> Self {
        let (base, j0) = window.weights(|w| bessel_transfer(0, w), bessel_j0);
        let (_, j1) = window.weights(|w| bessel_transfer(1, w), bessel_j1);
        debug!("designed Hankel filter {name} with {} points", base.len());
        Self {
            name: name.to_owned(),
            base,
            j0,
            j1,
        }
    }

    /// Filter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abscissae, multiplied by `1/r` to give wavenumbers.
    #[must_use]
    pub fn base(&self) -> &[Scalar] {
        &self.base
    }

    /// Weights against `J0`.
    #[must_use]
    pub fn j0(&self) -> &[Scalar] {
        &self.j0
    }

    /// Weights against `J1`.
    #[must_use]
    pub fn j1(&self) -> &[Scalar] {
        &self.j1
    }

    /// Number of abscissae.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Whether the table has no abscissae.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

/// Fourier filter with sine and cosine weights on a shared abscissa grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FourierFilter {
    name: String,
    base: Vec<Scalar>,
    sin: Vec<Scalar>,
    cos: Vec<Scalar>,
}

impl FourierFilter {
    /// Custom filter from explicit abscissae and weights.
    pub fn new(
        name: impl Into<String>,
        base: Vec<Scalar>,
        sin: Vec<Scalar>,
        cos: Vec<Scalar>,
    ) -> Result<Self, FilterError> {
        let name = name.into();
        validate_table(&name, &base, [("sin", &sin), ("cos", &cos)])?;
        Ok(Self {
            name,
            base,
            sin,
            cos,
        })
    }

    /// Built-in filter by name (`"erf_sincos_20"`).
    pub fn by_name(name: &str) -> Result<Arc<Self>, FilterError> {
        match name {
            "erf_sincos_20" => Ok(Self::erf_sincos_20()),
            other => Err(FilterError::Unknown(other.to_owned())),
        }
    }

    /// Default filter: 20 points per decade over `[1e-10, 1e4]`.
    #[must_use]
    pub fn erf_sincos_20() -> Arc<Self> {
        static CELL: OnceLock<Arc<FourierFilter>> = OnceLock::new();
        CELL.get_or_init(|| {
            let window = &ERF_SINCOS_20;
            let (base, sin) = window.weights(sine_transfer, Scalar::sin);
            let (_, cos) = window.weights(cosine_transfer, Scalar::cos);
            debug!("designed Fourier filter erf_sincos_20 with {} points", base.len());
            Arc::new(Self {
                name: "erf_sincos_20".to_owned(),
                base,
                sin,
                cos,
            })
        })
        .clone()
    }

    /// Filter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abscissae, multiplied by `1/t` to give angular frequencies.
    #[must_use]
    pub fn base(&self) -> &[Scalar] {
        &self.base
    }

    /// Sine-transform weights.
    #[must_use]
    pub fn sin(&self) -> &[Scalar] {
        &self.sin
    }

    /// Cosine-transform weights.
    #[must_use]
    pub fn cos(&self) -> &[Scalar] {
        &self.cos
    }

    /// Number of abscissae.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Whether the table has no abscissae.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

/// Band limit of a filter design: the kernel's Mellin transfer function is
/// multiplied by `½[erf((ω + c)/σ) − erf((ω − c)/σ)]` before inversion.
struct ErfWindow {
    points_per_decade: Scalar,
    cutoff: Scalar,
    width: Scalar,
    min_base: Scalar,
    max_base: Scalar,
}

const ERF_30: ErfWindow = ErfWindow {
    points_per_decade: 30.0,
    cutoff: 28.0,
    width: 1.8,
    min_base: 1.0e-10,
    max_base: 2.0e4,
};

const ERF_20: ErfWindow = ErfWindow {
    points_per_decade: 20.0,
    cutoff: 18.0,
    width: 1.6,
    min_base: 1.0e-8,
    max_base: 1.0e4,
};

const ERF_SINCOS_20: ErfWindow = ErfWindow {
    points_per_decade: 20.0,
    cutoff: 18.0,
    width: 1.6,
    min_base: 1.0e-10,
    max_base: 1.0e4,
};

/// Step of the trapezoid rule over the transfer function.
const SPECTRAL_STEP: Scalar = 0.02;

/// Below this abscissa the weight is `Δ·b·K(b)`: the kernel is flat over one
/// grid step and the spectral sum loses digits to cancellation.
const DIRECT_WEIGHT_LIMIT: Scalar = 1.0e-2;

impl ErfWindow {
    fn weights(
        &self,
        transfer: impl Fn(Scalar) -> CScalar,
        kernel: impl Fn(Scalar) -> Scalar,
    ) -> (Vec<Scalar>, Vec<Scalar>) {
        let delta = LN_10 / self.points_per_decade;
        let k_min = (self.min_base.log10() * self.points_per_decade).round() as i64;
        let k_max = (self.max_base.log10() * self.points_per_decade).round() as i64;

        let omega_max = PI / delta;
        let steps = (omega_max / SPECTRAL_STEP).ceil() as usize;
        let d_omega = omega_max / steps as Scalar;
        let spectrum: Vec<(Scalar, CScalar)> = (0..=steps)
            .map(|j| {
                let omega = j as Scalar * d_omega;
                let trapezoid = if j == 0 || j == steps { 0.5 } else { 1.0 };
                let taper = 0.5
                    * (erf((omega + self.cutoff) / self.width)
                        - erf((omega - self.cutoff) / self.width));
                let scale = trapezoid * d_omega * delta / PI * taper;
                (omega, transfer(omega) * scale)
            })
            .collect();

        (k_min..=k_max)
            .map(|k| {
                let y = k as Scalar * delta;
                let b = y.exp();
                let w = if b < DIRECT_WEIGHT_LIMIT {
                    delta * b * kernel(b)
                } else {
                    spectrum
                        .iter()
                        .map(|(omega, h)| {
                            let (s, c) = (omega * y).sin_cos();
                            h.re * c - h.im * s
                        })
                        .sum()
                };
                (b, w)
            })
            .unzip()
    }
}

/// Mellin transfer function of `J_n`, evaluated on the imaginary axis.
fn bessel_transfer(order: u8, omega: Scalar) -> CScalar {
    let n1 = Scalar::from(order) + 1.0;
    let lhs = ln_gamma(CScalar::new(0.5 * n1, -0.5 * omega));
    let rhs = ln_gamma(CScalar::new(0.5 * n1, 0.5 * omega));
    (lhs - rhs - I * (omega * LN_2)).exp()
}

/// Transfer function of the sine kernel.
fn sine_transfer(omega: Scalar) -> CScalar {
    let x = 0.5 * PI * omega.abs();
    // ln cosh(x) without overflow
    let ln_cosh = x + (-2.0 * x).exp().ln_1p() - LN_2;
    (ln_gamma(CScalar::new(1.0, -omega)) + ln_cosh).exp()
}

/// Transfer function of the cosine kernel.
fn cosine_transfer(omega: Scalar) -> CScalar {
    sine_transfer(omega) * I * (0.5 * PI * omega).tanh()
}
