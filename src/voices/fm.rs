//! Basic FM voice.
//!
//! An inharmonic modulator ratio (1/2.111) gives a clangorous, electric
//! timbre that cleans up nicely under the default envelope.

use crate::graph::envelope::Adsr;
use crate::graph::fm::FmVoice;
use crate::graph::node::Generator;

pub fn fm_voice(frequency: f32, _volume: f32) -> Box<dyn Generator> {
    Box::new(Adsr::with_defaults(FmVoice::new(
        frequency,
        frequency / 2.111,
        0.75,
        0.7,
    )))
}
