//! FM bass voice: sub-unity modulator ratio, plucky envelope.

use crate::graph::envelope::Adsr;
use crate::graph::fm::FmVoice;
use crate::graph::node::Generator;

pub fn bass(frequency: f32, _volume: f32) -> Box<dyn Generator> {
    let fm = FmVoice::new(
        frequency,
        frequency * 0.36, // modulator ratio 0.36
        0.78,             // modulation index
        0.7,              // self modulation index
    );
    Box::new(Adsr::new(fm, 0.01, 0.4, 0.0, 0.39))
}
