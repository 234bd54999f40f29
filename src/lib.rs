#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants and modelling limits.
pub mod constants;
/// Shared numerical primitives (vectors, complex scalars, geometry).
pub mod math;
/// Per-layer material parameters and their frequency responses.
pub mod materials;
/// Horizontally layered earth model.
pub mod model;
/// Orientation codes and their reduction to elementary components.
pub mod orientation;
/// Wavenumber-domain Green's functions of the layered earth.
pub mod kernel;
/// Hankel and Fourier transforms with their filters and quadratures.
pub mod transform;
/// Finite-length sources and receivers.
pub mod bipole;
/// Closed-form and semi-analytic reference solutions.
pub mod reference;
/// Public modelling entry points and options.
pub mod simulation;
/// Sampling grids and post-processing helpers.
pub mod sweep;
/// Data-parallel helpers.
pub mod parallel;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
