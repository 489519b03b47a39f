//! External interfaces: input events and their routing into the engine.

/// Event types and the CC→parameter mapping.
pub mod events;

pub use events::{cc_parameter_name, dispatch, SynthEvent};
