//! Closed-form and semi-analytic reference solutions.
//!
//! These are independent of the layered kernel and the transforms and serve
//! to check them.

/// Unbounded homogeneous VTI medium.
pub mod fullspace;
/// Homogeneous VTI earth below insulating air, diffusive regime.
pub mod halfspace;

pub use fullspace::fullspace;
pub use halfspace::halfspace;
