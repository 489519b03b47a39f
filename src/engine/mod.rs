//! Voice management and the real-time render loop.

/// 128-slot note-indexed voice pool with grouped parameters.
pub mod pool;
/// Named voice-factory registry.
pub mod registry;
/// Audio sink boundary and the sample-pulling render loop.
pub mod render;

pub use pool::{note_to_frequency, VoicePool};
pub use registry::{VoiceFactory, VoiceFactoryRegistry};
pub use render::{AudioSink, BufferSink, Engine};
