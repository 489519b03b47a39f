//! Plain sine voice.
//!
//! The reference patch: one sine oscillator under a medium envelope. Useful
//! as a neutral baseline when auditioning effects or pool behavior.

use crate::graph::envelope::Adsr;
use crate::graph::node::Generator;
use crate::graph::oscillator::Oscillator;

pub fn sine_oscillator(frequency: f32, volume: f32) -> Box<dyn Generator> {
    Box::new(Adsr::new(
        Oscillator::sine(frequency, volume),
        0.05, // Attack
        0.1,  // Decay
        0.7,  // Sustain
        0.3,  // Release
    ))
}
