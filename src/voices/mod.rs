//! Preset voice factories.
//!
//! Pure data: each file builds one voice graph for a `(frequency, volume)`
//! pair. `register_presets` loads them all into a registry in presentation
//! order; the first entry ("Sine Oscillator") is the engine default.

pub mod bass;
pub mod bell;
pub mod fm;
pub mod harmonic;
pub mod saw;
pub mod sine;
pub mod trio;

use crate::engine::registry::VoiceFactoryRegistry;

pub fn register_presets(registry: &mut VoiceFactoryRegistry) {
    registry.add("Sine Oscillator", sine::sine_oscillator);
    registry.add("FM Voice", fm::fm_voice);
    registry.add("Bell", bell::bell);
    registry.add("Harmonic Tone", harmonic::harmonic_tone);
    registry.add("Saw Oscillator", saw::saw_oscillator);
    registry.add("Bass", bass::bass);
    registry.add("Trio", trio::trio);
}
