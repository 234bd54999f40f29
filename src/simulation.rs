//! Public modelling entry points: frequency- and time-domain responses of
//! dipoles and bipoles over a layered earth.
//!
//! Every call is stateless. Inputs are validated up front; afterwards the
//! computation cannot fail and adaptive transforms that miss their tolerance
//! report a [`PrecisionWarning`] next to their best-effort value.

use log::{debug, warn};
use nalgebra::DMatrix;

use crate::bipole::{clamped_pairs, point_spectrum, pole_pair, Pole};
use crate::constants::MIN_OFFSET;
use crate::errors::{PrecisionWarning, StrataError};
use crate::math::{CScalar, Scalar, R3};
use crate::model::LayeredModel;
use crate::orientation::{Component, FieldKind, OrientationCode};
use crate::parallel::parallel_map;
use crate::transform::fourier::{fourier, FourierMethod, Signal};
use crate::transform::hankel::HankelMethod;

/// Supported simulation domains.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub enum SimulationDomain {
    /// Complex responses at the requested frequencies (Hz).
    Frequency,
    /// Real responses at the requested times (s) for a source `signal`.
    Time {
        /// Impulse, switch-on or switch-off source waveform.
        signal: Signal,
        /// Frequency-to-time transform.
        method: FourierMethod,
    },
}

/// Options shared by all entry points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Domain of the requested samples.
    pub domain: SimulationDomain,
    /// Wavenumber integration scheme.
    pub hankel: HankelMethod,
    /// Add the direct wave of a shared source/receiver layer in the space
    /// domain instead of integrating it over wavenumber.
    pub xdirect: bool,
    /// `0` normalises to unit source and receiver length and unit current;
    /// a positive value is the source current (A) and scales by both lengths.
    pub strength: Scalar,
    /// Smallest horizontal offset (m); closer pairs are clamped.
    pub min_offset: Scalar,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::frequency()
    }
}

impl SimulationConfig {
    /// Frequency-domain configuration with the default filter.
    #[must_use]
    pub fn frequency() -> Self {
        Self {
            domain: SimulationDomain::Frequency,
            hankel: HankelMethod::default(),
            xdirect: false,
            strength: 0.0,
            min_offset: MIN_OFFSET,
        }
    }

    /// Time-domain configuration for `signal` transformed with `method`.
    #[must_use]
    pub fn time(signal: Signal, method: FourierMethod) -> Self {
        Self {
            domain: SimulationDomain::Time { signal, method },
            ..Self::frequency()
        }
    }

    /// Wavenumber integration scheme.
    #[must_use]
    pub fn with_hankel(mut self, method: HankelMethod) -> Self {
        self.hankel = method;
        self
    }

    /// Adds the direct wave in the space domain when source and receiver share a layer.
    #[must_use]
    pub const fn with_xdirect(mut self, xdirect: bool) -> Self {
        self.xdirect = xdirect;
        self
    }

    /// Source current in A; `0` normalises to unit lengths and current.
    #[must_use]
    pub const fn with_strength(mut self, strength: Scalar) -> Self {
        self.strength = strength;
        self
    }

    /// Horizontal offset (m) below which offsets are clamped.
    #[must_use]
    pub const fn with_min_offset(mut self, min_offset: Scalar) -> Self {
        self.min_offset = min_offset;
        self
    }

    fn validate(&self) -> Result<(), StrataError> {
        if !(self.strength.is_finite() && self.strength >= 0.0) {
            return Err(StrataError::InvalidSurvey(format!(
                "strength must be finite and non-negative, got {}",
                self.strength
            )));
        }
        if !(self.min_offset.is_finite() && self.min_offset > 0.0) {
            return Err(StrataError::InvalidSurvey(format!(
                "min_offset must be positive, got {}",
                self.min_offset
            )));
        }
        self.hankel.validate()?;
        if let SimulationDomain::Time { signal, method } = &self.domain {
            method.validate(*signal)?;
        }
        Ok(())
    }
}

/// Modelled values with the precision warnings raised while computing them.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Modelled<T: nalgebra::Scalar> {
    /// One `receivers × sources` matrix per frequency or time.
    pub values: Vec<DMatrix<T>>,
    /// Adaptive transforms that missed their tolerance.
    pub warnings: Vec<PrecisionWarning>,
}

impl<T: nalgebra::Scalar + Copy> Modelled<T> {
    /// Value at sample `k` for receiver `rec` and source `src`.
    #[must_use]
    pub fn at(&self, k: usize, rec: usize, src: usize) -> T {
        self.values[k][(rec, src)]
    }

    /// All samples of one receiver/source pair.
    #[must_use]
    pub fn series(&self, rec: usize, src: usize) -> Vec<T> {
        self.values.iter().map(|m| m[(rec, src)]).collect()
    }

    /// Whether every transform met its tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of [`bipole`] and [`dipole`], by domain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Complex fields, one matrix per frequency.
    Frequency(Modelled<CScalar>),
    /// Real fields, one matrix per time.
    Time(Modelled<Scalar>),
}

impl Response {
    /// Frequency-domain values, if that was the domain.
    #[must_use]
    pub fn into_frequency(self) -> Option<Modelled<CScalar>> {
        match self {
            Self::Frequency(m) => Some(m),
            Self::Time(_) => None,
        }
    }

    /// Time-domain values, if that was the domain.
    #[must_use]
    pub fn into_time(self) -> Option<Modelled<Scalar>> {
        match self {
            Self::Time(m) => Some(m),
            Self::Frequency(_) => None,
        }
    }

    /// Precision warnings of either domain.
    #[must_use]
    pub fn warnings(&self) -> &[PrecisionWarning] {
        match self {
            Self::Frequency(m) => &m.warnings,
            Self::Time(m) => &m.warnings,
        }
    }
}

/// Wavenumber-domain integrands of [`wavenumber`]: the field is
/// `∫ [j0(λ) J0(λr) + j1(λ) J1(λr)] dλ`.
#[derive(Debug, Clone, PartialEq)]
pub struct WavenumberResponse {
    /// Wavenumbers (1/m).
    pub lambdas: Vec<Scalar>,
    /// Integrand against `J0`, angular factors applied.
    pub j0: Vec<CScalar>,
    /// Integrand against `J1`, angular factors applied.
    pub j1: Vec<CScalar>,
}

fn validate_samples(freqtime: &[Scalar], what: &str) -> Result<(), StrataError> {
    if freqtime.is_empty() {
        return Err(StrataError::InvalidSurvey(format!("at least one {what} is required")));
    }
    if let Some(bad) = freqtime.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(StrataError::InvalidSurvey(format!(
            "{what} values must be positive and finite, got {bad}"
        )));
    }
    Ok(())
}

fn validate_poles(poles: &[Pole], role: &str) -> Result<(), StrataError> {
    if poles.is_empty() {
        return Err(StrataError::InvalidSurvey(format!("at least one {role} is required")));
    }
    poles.iter().try_for_each(|p| p.validate(role))
}

/// Responses of finite or point `receivers` to `sources` over `model`.
///
/// The samples in `freqtime` are frequencies (Hz) or times (s) depending on
/// `config.domain`. Values are indexed `[sample](receiver, source)`.
pub fn bipole(
    sources: &[Pole],
    receivers: &[Pole],
    model: &LayeredModel,
    freqtime: &[Scalar],
    config: &SimulationConfig,
) -> Result<Response, StrataError> {
    match &config.domain {
        SimulationDomain::Frequency => {
            frequency_domain(sources, receivers, model, freqtime, config).map(Response::Frequency)
        }
        SimulationDomain::Time { signal, method } => {
            time_domain(sources, receivers, model, freqtime, *signal, method, config)
                .map(Response::Time)
        }
    }
}

fn prepare(sources: &[Pole], receivers: &[Pole], config: &SimulationConfig) -> Result<(), StrataError> {
    validate_poles(sources, "source")?;
    validate_poles(receivers, "receiver")?;
    config.validate()?;
    let clamped: usize = sources
        .iter()
        .flat_map(|s| receivers.iter().map(move |r| clamped_pairs(s, r, config.min_offset)))
        .sum();
    if clamped > 0 {
        warn!(
            "{clamped} source/receiver point pairs closer than {} m horizontally; offsets clamped",
            config.min_offset
        );
    }
    Ok(())
}

fn frequency_domain(
    sources: &[Pole],
    receivers: &[Pole],
    model: &LayeredModel,
    frequencies: &[Scalar],
    config: &SimulationConfig,
) -> Result<Modelled<CScalar>, StrataError> {
    prepare(sources, receivers, config)?;
    validate_samples(frequencies, "frequency")?;
    let (nrec, nsrc) = (receivers.len(), sources.len());
    debug!(
        "modelling {nsrc} sources x {nrec} receivers at {} frequencies",
        frequencies.len()
    );
    let per_frequency = parallel_map(frequencies, |&hz| {
        let responses = model.responses(hz);
        let mut warnings = Vec::new();
        let values = DMatrix::from_fn(nrec, nsrc, |r, s| {
            let (value, w) = pole_pair(&sources[s], &receivers[r], model, &responses, config);
            warnings.extend(w);
            value
        });
        (values, warnings)
    });
    let mut out = Modelled {
        values: Vec::with_capacity(frequencies.len()),
        warnings: Vec::new(),
    };
    for (values, warnings) in per_frequency {
        out.values.push(values);
        out.warnings.extend(warnings);
    }
    Ok(out)
}

fn time_domain(
    sources: &[Pole],
    receivers: &[Pole],
    model: &LayeredModel,
    times: &[Scalar],
    signal: Signal,
    method: &FourierMethod,
    config: &SimulationConfig,
) -> Result<Modelled<Scalar>, StrataError> {
    prepare(sources, receivers, config)?;
    validate_samples(times, "time")?;
    let (nrec, nsrc) = (receivers.len(), sources.len());
    debug!(
        "modelling {nsrc} sources x {nrec} receivers at {} times ({signal:?})",
        times.len()
    );
    let mut values = vec![DMatrix::zeros(nrec, nsrc); times.len()];
    let mut warnings = Vec::new();
    for (s, source) in sources.iter().enumerate() {
        for (r, receiver) in receivers.iter().enumerate() {
            let mut hankel_warnings = Vec::new();
            let (series, fourier_warnings) = fourier(
                |frequencies| {
                    let spectrum = parallel_map(frequencies, |&hz| {
                        pole_pair(source, receiver, model, &model.responses(hz), config)
                    });
                    spectrum
                        .into_iter()
                        .map(|(value, w)| {
                            hankel_warnings.extend(w);
                            value
                        })
                        .collect()
                },
                times,
                signal,
                method,
            );
            for (matrix, v) in values.iter_mut().zip(series) {
                matrix[(r, s)] = v;
            }
            warnings.extend(hankel_warnings);
            warnings.extend(fourier_warnings);
        }
    }
    Ok(Modelled { values, warnings })
}

/// Point dipole at `point` along the axis of `component`.
fn axis_dipole(point: R3, component: Component) -> Pole {
    let (azimuth, dip) = component.axis.angles();
    let pole = Pole::dipole(point, azimuth, dip);
    match component.kind {
        FieldKind::Electric => pole,
        FieldKind::Magnetic => pole.magnetic(),
    }
}

fn axis_dipoles(points: &[R3], component: Component) -> Vec<Pole> {
    points.iter().map(|&p| axis_dipole(p, component)).collect()
}

/// Axis-aligned point dipoles at `sources` and `receivers` with the
/// components selected by the orientation code `ab`.
pub fn dipole(
    sources: &[R3],
    receivers: &[R3],
    model: &LayeredModel,
    freqtime: &[Scalar],
    ab: OrientationCode,
    config: &SimulationConfig,
) -> Result<Response, StrataError> {
    bipole(
        &axis_dipoles(sources, ab.source),
        &axis_dipoles(receivers, ab.receiver),
        model,
        freqtime,
        config,
    )
}

/// Frequency-domain [`dipole`] responses with default options.
pub fn frequency(
    sources: &[R3],
    receivers: &[R3],
    model: &LayeredModel,
    frequencies: &[Scalar],
    ab: OrientationCode,
) -> Result<Modelled<CScalar>, StrataError> {
    frequency_domain(
        &axis_dipoles(sources, ab.source),
        &axis_dipoles(receivers, ab.receiver),
        model,
        frequencies,
        &SimulationConfig::frequency(),
    )
}

/// Time-domain [`dipole`] responses for `signal`, transformed with `method`.
pub fn time(
    sources: &[R3],
    receivers: &[R3],
    model: &LayeredModel,
    times: &[Scalar],
    ab: OrientationCode,
    signal: Signal,
    method: FourierMethod,
) -> Result<Modelled<Scalar>, StrataError> {
    let config = SimulationConfig::time(signal, method.clone());
    time_domain(
        &axis_dipoles(sources, ab.source),
        &axis_dipoles(receivers, ab.receiver),
        model,
        times,
        signal,
        &method,
        &config,
    )
}

/// Wavenumber-domain integrands between a point `source` and `receiver`
/// at one frequency (Hz), for each of `lambdas` (1/m).
///
/// The direct wave is always part of the kernel.
pub fn wavenumber(
    source: &R3,
    receiver: &R3,
    model: &LayeredModel,
    hz: Scalar,
    lambdas: &[Scalar],
    ab: OrientationCode,
    config: &SimulationConfig,
) -> Result<WavenumberResponse, StrataError> {
    let source = axis_dipole(*source, ab.source);
    let receiver = axis_dipole(*receiver, ab.receiver);
    prepare(&[source], &[receiver], config)?;
    validate_samples(&[hz], "frequency")?;
    validate_samples(lambdas, "wavenumber")?;
    let spectrum = point_spectrum(
        &source,
        &receiver,
        model,
        &model.responses(hz),
        lambdas,
        config.min_offset,
    );
    let (j0, j1): (Vec<CScalar>, Vec<CScalar>) = spectrum.into_iter().unzip();
    Ok(WavenumberResponse {
        lambdas: lambdas.to_vec(),
        j0,
        j1,
    })
}
