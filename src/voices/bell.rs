//! Bell voice.
//!
//! FM with a ratio a little above unity produces the stretched partials of a
//! struck bar; a slow shallow tremolo adds the shimmer of a real bell's beat
//! frequencies. The envelope does the rest: instant strike, long ring, no
//! sustain.

use crate::graph::envelope::Adsr;
use crate::graph::fm::FmVoice;
use crate::graph::node::Generator;
use crate::graph::tremolo::Tremolo;

pub fn bell(frequency: f32, _volume: f32) -> Box<dyn Generator> {
    let fm = FmVoice::new(frequency, frequency * 1.22, 0.82, 0.3);
    let tremolo = Tremolo::new(fm, 1.7, 0.13);
    Box::new(Adsr::new(
        tremolo,
        0.01, // Attack: the strike
        2.0,  // Decay: long ring-down
        0.0,  // Sustain: bells don't sustain
        2.0,  // Release
    ))
}
