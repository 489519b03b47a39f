use std::sync::Arc;

use crate::dsp::delay_line::DelayLine;
use crate::graph::node::Generator;
use crate::param::Parameter;

/// Feedback delay with an integer tap.
///
/// Each sample writes `input + feedback·delayed` into a two-second circular
/// buffer and mixes `dry·(1−mix) + delayed·mix`.
pub struct Delay {
    source: Box<dyn Generator>,
    line: DelayLine,
    delay_samples: Arc<Parameter>,
    feedback: Arc<Parameter>,
    mix: Arc<Parameter>,
}

impl Delay {
    pub fn new(
        source: impl Generator + 'static,
        delay_samples: usize,
        feedback: f32,
        mix: f32,
        sample_rate: f32,
    ) -> Self {
        let max_delay = sample_rate * 2.0;
        Self {
            source: Box::new(source),
            line: DelayLine::two_seconds(sample_rate),
            delay_samples: Parameter::new(
                "Delay Samples",
                delay_samples as f32,
                1.0,
                max_delay,
                1.0,
                "samples",
            )
            .into_shared(),
            feedback: Parameter::new("Feedback", feedback, 0.0, 0.99, 0.01, "").into_shared(),
            mix: Parameter::new("Mix", mix, 0.0, 1.0, 0.01, "").into_shared(),
        }
    }
}

impl Generator for Delay {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let input = self.source.generate_sample(sample_rate);

        let delayed = self.line.read(self.delay_samples.value() as usize);
        self.line.write(input + delayed * self.feedback.value());

        let mix = self.mix.value();
        input * (1.0 - mix) + delayed * mix
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(velocity);
    }

    fn note_off(&mut self) {
        self.source.note_off();
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![
            self.delay_samples.clone(),
            self.feedback.clone(),
            self.mix.clone(),
        ];
        params.extend(self.source.parameters());
        params
    }
}

/// Feedback delay with a fractional tap, readable between samples.
///
/// The float-valued `Delay Samples` makes the tap position smoothly
/// modulatable; this is the building block the chorus sweeps.
pub struct InterpolatedDelay {
    source: Box<dyn Generator>,
    line: DelayLine,
    delay_samples: Arc<Parameter>,
    feedback: Arc<Parameter>,
    mix: Arc<Parameter>,
}

impl InterpolatedDelay {
    pub fn new(
        source: impl Generator + 'static,
        delay_samples: f32,
        feedback: f32,
        mix: f32,
        sample_rate: f32,
    ) -> Self {
        let max_delay = sample_rate * 2.0;
        Self {
            source: Box::new(source),
            line: DelayLine::two_seconds(sample_rate),
            delay_samples: Parameter::new(
                "Delay Samples",
                delay_samples,
                0.0,
                max_delay,
                0.1,
                "samples",
            )
            .into_shared(),
            feedback: Parameter::new("Feedback", feedback, 0.0, 0.99, 0.01, "").into_shared(),
            mix: Parameter::new("Mix", mix, 0.0, 1.0, 0.01, "").into_shared(),
        }
    }

    pub fn set_delay_samples(&self, delay_samples: f32) {
        let _ = self.delay_samples.set(delay_samples);
    }
}

impl Generator for InterpolatedDelay {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let input = self.source.generate_sample(sample_rate);

        let delayed = self.line.read_interpolated(self.delay_samples.value());
        self.line.write(input + delayed * self.feedback.value());

        let mix = self.mix.value();
        input * (1.0 - mix) + delayed * mix
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(velocity);
    }

    fn note_off(&mut self) {
        self.source.note_off();
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![
            self.delay_samples.clone(),
            self.feedback.clone(),
            self.mix.clone(),
        ];
        params.extend(self.source.parameters());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    /// Plays a fixed sequence, then silence.
    struct Script {
        samples: Vec<f32>,
        pos: usize,
    }

    impl Script {
        fn new(samples: Vec<f32>) -> Self {
            Self { samples, pos: 0 }
        }
    }

    impl Generator for Script {
        fn generate_sample(&mut self, _sample_rate: f32) -> f32 {
            let out = self.samples.get(self.pos).copied().unwrap_or(0.0);
            self.pos += 1;
            out
        }
    }

    #[test]
    fn wet_only_integer_delay_is_a_pure_shift() {
        let d = 16;
        let input: Vec<f32> = (0..64).map(|i| ((i * 7) % 13) as f32 / 13.0).collect();
        let mut delay = Delay::new(Script::new(input.clone()), d, 0.0, 1.0, SAMPLE_RATE);

        let output: Vec<f32> = (0..64).map(|_| delay.generate_sample(SAMPLE_RATE)).collect();
        for t in d..64 {
            assert!(
                (output[t] - input[t - d]).abs() < 1e-6,
                "output[{t}] = {}, expected input[{}] = {}",
                output[t],
                t - d,
                input[t - d]
            );
        }
    }

    #[test]
    fn interpolated_delay_matches_integer_shift_at_whole_offsets() {
        let d = 12.0;
        let input: Vec<f32> = (0..48).map(|i| (i as f32 * 0.37).sin()).collect();
        let mut delay =
            InterpolatedDelay::new(Script::new(input.clone()), d, 0.0, 1.0, SAMPLE_RATE);

        let output: Vec<f32> = (0..48).map(|_| delay.generate_sample(SAMPLE_RATE)).collect();
        for t in 12..48 {
            assert!((output[t] - input[t - 12]).abs() < 1e-5);
        }
    }

    #[test]
    fn dry_mix_passes_input_through() {
        let input: Vec<f32> = vec![0.5; 32];
        let mut delay = Delay::new(Script::new(input), 8, 0.5, 0.0, SAMPLE_RATE);
        for _ in 0..32 {
            assert!((delay.generate_sample(SAMPLE_RATE) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn feedback_repeats_decay() {
        let mut input = vec![0.0; 64];
        input[0] = 1.0;
        let mut delay = Delay::new(Script::new(input), 8, 0.5, 1.0, SAMPLE_RATE);

        let output: Vec<f32> = (0..33).map(|_| delay.generate_sample(SAMPLE_RATE)).collect();
        assert!((output[8] - 1.0).abs() < 1e-6);
        assert!((output[16] - 0.5).abs() < 1e-6);
        assert!((output[24] - 0.25).abs() < 1e-6);
        assert!((output[32] - 0.125).abs() < 1e-6);
    }
}
