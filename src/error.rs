use thiserror::Error;

/// Errors surfaced on control paths. The audio path never returns these; DSP
/// numerical trouble is handled by clamping, not by error values.
#[derive(Debug, Clone, Error)]
pub enum SynthError {
    #[error("parameter '{name}': value {value} outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown voice factory: {0}")]
    UnknownVoiceFactory(String),

    #[error("invalid MIDI note: {0}")]
    InvalidNote(i32),

    #[error("audio sink failure: {0}")]
    SinkFailure(String),
}
