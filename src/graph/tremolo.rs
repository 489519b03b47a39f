use std::f32::consts::TAU;
use std::sync::Arc;

use crate::graph::node::Generator;
use crate::param::Parameter;

/// Periodic amplitude modulation.
///
/// The LFO phase advances every sample, but the applied gain is refreshed
/// only when the input crosses zero (in either direction). Changing the gain
/// mid-cycle would multiply the waveform by a step and ring-modulate it; at a
/// zero crossing the step is inaudible.
pub struct Tremolo {
    source: Box<dyn Generator>,
    rate: Arc<Parameter>,
    depth: Arc<Parameter>,
    phase: f32,
    last_sample: f32,
    amplitude: f32,
}

impl Tremolo {
    pub fn new(source: impl Generator + 'static, rate: f32, depth: f32) -> Self {
        Self {
            source: Box::new(source),
            rate: Parameter::new("Rate", rate, 0.1, 20.0, 0.1, "Hz").into_shared(),
            depth: Parameter::new("Depth", depth, 0.0, 1.0, 0.01, "").into_shared(),
            phase: 0.0,
            last_sample: 0.0,
            amplitude: 1.0,
        }
    }
}

impl Generator for Tremolo {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let sample = self.source.generate_sample(sample_rate);

        self.phase += self.rate.value() / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        let crossed_up = self.last_sample <= 0.0 && sample > 0.0;
        let crossed_down = self.last_sample >= 0.0 && sample < 0.0;
        if crossed_up || crossed_down {
            let modulation = 0.5 * (1.0 + (TAU * self.phase).sin());
            self.amplitude = 1.0 - self.depth.value() * modulation;
        }

        self.last_sample = sample;
        sample * self.amplitude
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(velocity);
    }

    fn note_off(&mut self) {
        self.source.note_off();
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![self.rate.clone(), self.depth.clone()];
        params.extend(self.source.parameters());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::oscillator::Oscillator;

    const SAMPLE_RATE: f32 = 44_100.0;

    #[test]
    fn zero_depth_is_transparent() {
        let mut tremolo = Tremolo::new(Oscillator::sine(440.0, 1.0), 5.0, 0.0);
        let mut reference = Oscillator::sine(440.0, 1.0);
        for _ in 0..2048 {
            let t = tremolo.generate_sample(SAMPLE_RATE);
            let r = reference.generate_sample(SAMPLE_RATE);
            assert!((t - r).abs() < 1e-6);
        }
    }

    #[test]
    fn depth_modulates_the_peak_level() {
        let mut tremolo = Tremolo::new(Oscillator::sine(440.0, 1.0), 8.0, 0.8);
        // Track per-cycle peaks over one full LFO period.
        let lfo_period = (SAMPLE_RATE / 8.0) as usize;
        let mut min_peak = f32::MAX;
        let mut max_peak = 0.0f32;
        let mut cycle_peak = 0.0f32;
        let mut last = 0.0f32;
        for _ in 0..2 * lfo_period {
            let out = tremolo.generate_sample(SAMPLE_RATE);
            if last <= 0.0 && out > 0.0 && cycle_peak > 0.0 {
                min_peak = min_peak.min(cycle_peak);
                max_peak = max_peak.max(cycle_peak);
                cycle_peak = 0.0;
            }
            cycle_peak = cycle_peak.max(out.abs());
            last = out;
        }
        assert!(max_peak > 0.9, "loud half of the cycle missing: {max_peak}");
        assert!(min_peak < 0.4, "quiet half of the cycle missing: {min_peak}");
    }

    #[test]
    fn gain_is_constant_between_zero_crossings() {
        let mut tremolo = Tremolo::new(Oscillator::sine(440.0, 1.0), 5.0, 0.5);
        let mut reference = Oscillator::sine(440.0, 1.0);
        let mut previous: Option<(f32, f32)> = None; // (ratio, input sign)
        for _ in 0..4096 {
            let t = tremolo.generate_sample(SAMPLE_RATE);
            let r = reference.generate_sample(SAMPLE_RATE);
            if r.abs() < 1e-3 {
                previous = None;
                continue;
            }
            let ratio = t / r;
            if let Some((previous_ratio, previous_sign)) = previous {
                if previous_sign == r.signum() {
                    assert!(
                        (ratio - previous_ratio).abs() < 1e-4,
                        "gain moved mid-half-cycle: {previous_ratio} -> {ratio}"
                    );
                }
            }
            previous = Some((ratio, r.signum()));
        }
    }
}
