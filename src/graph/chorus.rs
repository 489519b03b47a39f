use std::f32::consts::TAU;
use std::sync::Arc;

use crate::dsp::delay_line::DelayLine;
use crate::graph::node::Generator;
use crate::param::Parameter;

/*
Chorus
======

Three modulated delay taps thicken the source into an ensemble. A shared LFO
drives all taps; voice i runs 1/N of a cycle ahead of voice i−1, so the taps
sweep through different delays at any instant:

    delay_i = depth · (0.5 + 0.5·sin(2π·(φ + i/N)))  milliseconds

The delay never drops below 1 ms: a tap that reaches the write head reads the
sample it is about to overwrite and produces artifacts.

The source is pulled once per output sample and the one input value feeds
every delay line. Wiring N delay lines each with their own handle to the same
source would pull it N times per sample and advance its phase N-fold.
*/

const NUM_VOICES: usize = 3;
const MINIMUM_DELAY_MS: f32 = 1.0;

pub struct Chorus {
    source: Box<dyn Generator>,
    lines: Vec<DelayLine>,
    phase: f32,
    rate: Arc<Parameter>,
    depth: Arc<Parameter>,
    mix: Arc<Parameter>,
}

impl Chorus {
    pub fn new(
        source: impl Generator + 'static,
        rate: f32,
        depth_ms: f32,
        mix: f32,
        sample_rate: f32,
    ) -> Self {
        Self {
            source: Box::new(source),
            lines: (0..NUM_VOICES)
                .map(|_| DelayLine::two_seconds(sample_rate))
                .collect(),
            phase: 0.0,
            rate: Parameter::new("Rate", rate, 0.01, 2.0, 0.01, "Hz").into_shared(),
            depth: Parameter::new("Depth", depth_ms, 0.0, 200.0, 0.1, "ms").into_shared(),
            mix: Parameter::new("Mix", mix, 0.0, 1.0, 0.01, "").into_shared(),
        }
    }
}

impl Generator for Chorus {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let input = self.source.generate_sample(sample_rate);

        self.phase += self.rate.value() / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        let depth = self.depth.value();
        let minimum_delay = MINIMUM_DELAY_MS * sample_rate / 1000.0;

        let mut wet = 0.0;
        for (i, line) in self.lines.iter_mut().enumerate() {
            let mut voice_phase = self.phase + i as f32 / NUM_VOICES as f32;
            if voice_phase >= 1.0 {
                voice_phase -= 1.0;
            }

            let delay_ms = depth * (0.5 + 0.5 * (TAU * voice_phase).sin());
            let delay_samples = (delay_ms * sample_rate / 1000.0).max(minimum_delay);

            wet += line.read_interpolated(delay_samples);
            line.write(input);
        }
        wet /= NUM_VOICES as f32;

        let mix = self.mix.value();
        input * (1.0 - mix) + wet * mix
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(velocity);
    }

    fn note_off(&mut self) {
        self.source.note_off();
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![self.rate.clone(), self.depth.clone(), self.mix.clone()];
        params.extend(self.source.parameters());
        params
    }
}
