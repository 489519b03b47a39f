//! Piano-ish layered voice: strike, string harmonics, body resonance.
//!
//! Three sub-voices share parameter names (every layer has an ADSR), so each
//! layer's parameters get a suffix before the mixer combines them, and the
//! control surface then shows "Attack(main)", "Attack(harmonic)",
//! "Attack(resonance)" as independent knobs.

use crate::graph::envelope::Adsr;
use crate::graph::fm::FmVoice;
use crate::graph::mixer::Mixer;
use crate::graph::node::Generator;
use crate::graph::tone::HarmonicTone;

pub fn trio(frequency: f32, volume: f32) -> Box<dyn Generator> {
    let main_suffix = "(main)";
    let harmonic_suffix = "(harmonic)";
    let resonance_suffix = "(resonance)";

    // Main voice: the fundamental with a bright attack transient.
    let fm_main = FmVoice::new(
        frequency,
        frequency * 2.0, // high modulator for a brighter strike
        0.3,
        0.1,
    );
    fm_main.add_suffix(main_suffix);
    let adsr_main = Adsr::new(fm_main, 0.001, 0.8, 0.2, 0.6);
    adsr_main.add_suffix(main_suffix);

    // String harmonics, slightly detuned against the fundamental.
    let harmonics = HarmonicTone::new(frequency * 1.001, volume);
    harmonics.add_suffix(harmonic_suffix);
    let adsr_harmonics = Adsr::new(harmonics, 0.001, 1.2, 0.1, 0.8);
    adsr_harmonics.add_suffix(harmonic_suffix);

    // Sympathetic body resonance an octave down.
    let fm_resonance = FmVoice::new(frequency * 0.5, frequency * 0.499, 0.2, 0.15);
    fm_resonance.add_suffix(resonance_suffix);
    let adsr_resonance = Adsr::new(fm_resonance, 0.002, 2.0, 0.05, 1.2);
    adsr_resonance.add_suffix(resonance_suffix);

    let mixer = Mixer::with_suffixes(
        vec![
            Box::new(adsr_main),
            Box::new(adsr_harmonics),
            Box::new(adsr_resonance),
        ],
        vec![
            main_suffix.to_string(),
            harmonic_suffix.to_string(),
            resonance_suffix.to_string(),
        ],
    );
    mixer.set_volume(0, 0.6); // the strike leads
    mixer.set_volume(1, 0.25);
    mixer.set_volume(2, 0.15);

    Box::new(mixer)
}
