//! Convenience re-exports for layered-earth modelling.

pub use crate::bipole::Pole;
pub use crate::constants::*;
pub use crate::errors::{PrecisionWarning, StrataError, TransformKind};
pub use crate::materials::{LayerMaterial, LayerResponse};
pub use crate::math::{direction_cosines, CScalar, Scalar, R3};
pub use crate::model::LayeredModel;
pub use crate::orientation::{Axis, Component, FieldKind, OrientationCode};
pub use crate::reference::{fullspace, halfspace};
pub use crate::simulation::{
    bipole, dipole, frequency, time, wavenumber, Modelled, Response, SimulationConfig,
    SimulationDomain, WavenumberResponse,
};
pub use crate::sweep::{linspace, logspace, mag, mag_db, phase_deg, phase_rad};
pub use crate::transform::{
    AdaptiveParams, FftLogParams, FilterError, FourierFilter, FourierMethod, HankelFilter,
    HankelMethod, Signal,
};
