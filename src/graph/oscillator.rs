use std::f32::consts::{PI, TAU};

use crate::graph::node::Generator;

/*
Oscillator
==========

A phase accumulator traces one waveform cycle per τ radians:

    sample = waveform(phase)
    phase  = (phase + τ·f/sr) mod τ

The sample is computed at the *current* phase, then the phase advances, so
the first sample of a freshly built oscillator is waveform(0).

Waveform shapes (all scaled by `volume`):

  Sine      sin φ
  Square    sign(sin φ)
  Triangle  (2/π)·asin(sin φ)        linear ramps between ±1
  Sawtooth  (2/π)·(φ − π)            one ramp per cycle

No band-limiting is applied; square and sawtooth alias above a few kHz.
That grit is part of the instrument's sound.
*/

/// The shape of the waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

pub struct Oscillator {
    frequency: f32,
    volume: f32,
    phase: f32, // current position in the cycle, radians in [0, τ)
    waveform: Waveform,
}

impl Oscillator {
    pub fn new(frequency: f32, volume: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            volume,
            phase: 0.0,
            waveform,
        }
    }

    pub fn sine(frequency: f32, volume: f32) -> Self {
        Self::new(frequency, volume, Waveform::Sine)
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }
}

impl Generator for Oscillator {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => self.phase.sin(),
            Waveform::Square => {
                if self.phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => (2.0 / PI) * self.phase.sin().asin(),
            Waveform::Sawtooth => (2.0 / PI) * (self.phase - PI),
        };

        // FM can push the effective frequency past the sample rate, so wrap
        // with rem_euclid rather than a single subtraction.
        self.phase = (self.phase + TAU * self.frequency / sample_rate).rem_euclid(TAU);

        sample * self.volume
    }
}
