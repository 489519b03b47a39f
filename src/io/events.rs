use crate::engine::pool::VoicePool;
use crate::error::SynthError;
use crate::MIDI_NOTE_COUNT;

/// Musical and control events the core accepts from any input source: MIDI
/// callbacks, the computer keyboard poller, or the control surface. Velocity
/// and CC values arrive already normalized / raw per the MIDI convention.
#[derive(Debug, Clone)]
pub enum SynthEvent {
    NoteOn {
        note: u8,
        channel: u8,
        frequency: f32,
        /// Normalized 0..1.
        velocity: f32,
    },
    NoteOff {
        note: u8,
        channel: u8,
    },
    ControlChange {
        controller: u8,
        /// Raw MIDI 0..127.
        value: u8,
    },
    ParameterSet {
        name: String,
        value: f32,
    },
}

impl SynthEvent {
    /// Builds a note-on from raw MIDI bytes.
    pub fn note_on_midi(note: u8, channel: u8, velocity: u8) -> Self {
        Self::NoteOn {
            note,
            channel,
            frequency: crate::engine::pool::note_to_frequency(note),
            velocity: velocity as f32 / 127.0,
        }
    }
}

/// Default CC→parameter map: the four envelope knobs.
pub fn cc_parameter_name(controller: u8) -> Option<&'static str> {
    match controller {
        70 => Some("Attack"),
        71 => Some("Decay"),
        72 => Some("Sustain"),
        73 => Some("Release"),
        _ => None,
    }
}

/// Routes one event into the pool. CC values map linearly from 0..127 onto
/// the target parameter's [min, max].
pub fn dispatch(event: SynthEvent, pool: &VoicePool) -> Result<(), SynthError> {
    match event {
        SynthEvent::NoteOn {
            note,
            channel,
            frequency,
            velocity,
        } => {
            if note as usize >= MIDI_NOTE_COUNT {
                return Err(SynthError::InvalidNote(note as i32));
            }
            pool.note_on(note, channel, frequency, velocity);
            Ok(())
        }
        SynthEvent::NoteOff { note, channel } => {
            if note as usize >= MIDI_NOTE_COUNT {
                return Err(SynthError::InvalidNote(note as i32));
            }
            pool.note_off(note, channel);
            Ok(())
        }
        SynthEvent::ControlChange { controller, value } => {
            let Some(name) = cc_parameter_name(controller) else {
                // Unmapped controllers are silently ignored.
                return Ok(());
            };
            let param = crate::graph::node::find_parameter(pool, name)
                .ok_or_else(|| SynthError::UnknownParameter(name.to_string()))?;
            let normalized = value.min(127) as f32 / 127.0;
            let mapped = param.min() + normalized * (param.max() - param.min());
            param.set(mapped)
        }
        SynthEvent::ParameterSet { name, value } => {
            let param = crate::graph::node::find_parameter(pool, &name)
                .ok_or(SynthError::UnknownParameter(name))?;
            param.set(value)
        }
    }
}
