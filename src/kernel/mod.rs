//! Wavenumber-domain Green's functions of the layered VTI earth.
//!
//! Each horizontal wavenumber decouples the fields into a TM and a TE mode,
//! each behaving as a layered transmission line. The elementary field
//! components are assembled from the line voltages and currents.

/// Transmission-line voltages and currents for point sources.
pub mod greens;
/// Propagation constants, impedances and generalized reflections.
pub mod reflection;
/// Assembly of elementary components and their angular factors.
pub mod wavenumber;

pub use greens::{line_response, Excitation, LineResponse};
pub use reflection::{ModalStack, Mode};
pub use wavenumber::{angular_factors, LayeredKernel};

use crate::math::Scalar;
use crate::model::layer_containing;

/// Source and receiver depths with the layers holding them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    /// Interface depths of the model.
    pub interfaces: &'a [Scalar],
    /// Layer index of the source.
    pub source_layer: usize,
    /// Layer index of the receiver.
    pub receiver_layer: usize,
    /// Source depth (m).
    pub z_source: Scalar,
    /// Receiver depth (m).
    pub z_receiver: Scalar,
}

impl<'a> Placement<'a> {
    /// Locates source depth `z_source` and receiver depth `z_receiver`.
    #[must_use]
    pub fn new(interfaces: &'a [Scalar], z_source: Scalar, z_receiver: Scalar) -> Self {
        Self {
            interfaces,
            source_layer: layer_containing(interfaces, z_source),
            receiver_layer: layer_containing(interfaces, z_receiver),
            z_source,
            z_receiver,
        }
    }

    /// Top interface of layer `i`.
    #[must_use]
    pub fn top(&self, i: usize) -> Option<Scalar> {
        i.checked_sub(1).map(|j| self.interfaces[j])
    }

    /// Bottom interface of layer `i`.
    #[must_use]
    pub fn bottom(&self, i: usize) -> Option<Scalar> {
        self.interfaces.get(i).copied()
    }

    /// Whether source and receiver share a layer.
    #[must_use]
    pub fn same_layer(&self) -> bool {
        self.source_layer == self.receiver_layer
    }
}
