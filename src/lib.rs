//! chordate: a real-time polyphonic software synthesizer core.
//!
//! A pull-driven signal graph produces one mono `f32` sample per call at the
//! device sample rate. Presets compose oscillators, envelopes, and effects
//! into per-note voice graphs; a 128-slot pool dispatches note events into
//! them; the render loop pulls the root into the platform sink. Parameters
//! are live-editable by name while audio runs.

pub mod control;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph;
pub mod io;
pub mod param;
pub mod voices;

/// One voice slot per MIDI note.
pub const MIDI_NOTE_COUNT: usize = 128;

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub sample_rate: u32,
    /// Capacity of the input-event ring buffer drained by the render loop.
    pub event_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            event_queue_capacity: 256,
        }
    }
}
