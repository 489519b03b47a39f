use std::sync::Arc;

use crate::param::Parameter;

/// Core trait for signal-graph nodes.
///
/// A generator is a pull-driven node producing one mono sample per call. A
/// node that owns child generators must pull each child at most once per call
/// to its own `generate_sample`: double-pulling a child advances its phase
/// twice and is a bug.
pub trait Generator: Send {
    /// Produce the next sample. Called exactly once per output sample per
    /// top-level node; `sample_rate` is the device rate (typically 44100 Hz).
    fn generate_sample(&mut self, sample_rate: f32) -> f32;

    /// Triggered when a note starts. Nodes with children forward the event in
    /// insertion order.
    ///
    /// Default implementation does nothing (leaf and passthrough nodes).
    fn note_on(&mut self, _velocity: f32) {
        // Default: do nothing
    }

    /// Triggered when a note is released.
    ///
    /// Default implementation does nothing (leaf and passthrough nodes).
    fn note_off(&mut self) {
        // Default: do nothing
    }

    /// The node's own parameters followed by the recursive union of child
    /// parameters, in insertion order. The snapshot stays valid until the
    /// next structural change (children added, bank rebuilt, pool swapped).
    fn parameters(&self) -> Vec<Arc<Parameter>> {
        Vec::new()
    }
}

/// Finds a parameter by exact name in a generator's parameter view.
pub fn find_parameter(generator: &dyn Generator, name: &str) -> Option<Arc<Parameter>> {
    generator
        .parameters()
        .into_iter()
        .find(|param| param.name() == name)
}
