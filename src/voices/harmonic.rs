//! Harmonic-stack voice under the default envelope.

use crate::graph::envelope::Adsr;
use crate::graph::node::Generator;
use crate::graph::tone::HarmonicTone;

pub fn harmonic_tone(frequency: f32, volume: f32) -> Box<dyn Generator> {
    Box::new(Adsr::with_defaults(HarmonicTone::new(frequency, volume)))
}
