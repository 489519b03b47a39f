//! Sawtooth voice with tremolo and a slap of delay.

use crate::graph::delay::InterpolatedDelay;
use crate::graph::envelope::Adsr;
use crate::graph::node::Generator;
use crate::graph::oscillator::{Oscillator, Waveform};
use crate::graph::tremolo::Tremolo;

/// The delay line is sized for the nominal device rate.
const NOMINAL_SAMPLE_RATE: f32 = 44_100.0;

pub fn saw_oscillator(frequency: f32, volume: f32) -> Box<dyn Generator> {
    let oscillator = Oscillator::new(frequency, volume, Waveform::Sawtooth);
    let tremolo = Tremolo::new(oscillator, 5.0, 0.3);
    let adsr = Adsr::new(tremolo, 0.05, 0.1, 0.7, 0.3);
    Box::new(InterpolatedDelay::new(
        adsr,
        0.3 * NOMINAL_SAMPLE_RATE, // 300 ms slapback
        0.5,
        0.3,
        NOMINAL_SAMPLE_RATE,
    ))
}
