use std::sync::Arc;

use crate::graph::node::Generator;
use crate::param::Parameter;

/*
Level
  1.0 ┐     ╱╲________
      │    ╱  ╲       ╲
  0.7 │   ╱    ╲_______╲___
      │  ╱              ╲  ╲
  0.0 └─╱────────────────╲──╲─→ Time
      Attack Decay Sustain Release

Stage timing is counted in samples, not wall clock: the counter increments
once per generate_sample call while the stage is unchanged, and elapsed time
is counter / sample_rate. If the render thread falls behind real time the
envelope falls behind with it, which is the correct behavior: the envelope
must advance with the audio, not with the clock.

Stage entry captures the amplitude it started from, so a retrigger during
decay or release glides from the current level instead of clicking to zero.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Four-stage amplitude envelope wrapping a source generator.
///
/// While idle the envelope outputs exactly 0 without pulling its source.
/// Output is `source · amplitude · velocity_gain`; the amplitude is clamped
/// to [0, 1] after every update, which also contains any NaN/Inf the stage
/// math could produce from degenerate parameter values.
pub struct Adsr {
    source: Box<dyn Generator>,

    attack: Arc<Parameter>,
    decay: Arc<Parameter>,
    sustain: Arc<Parameter>,
    release: Arc<Parameter>,

    stage: Stage,
    amplitude: f32,
    velocity_gain: f32,
    stage_samples: u64,
    attack_start: f32,
    decay_start: f32,
    release_start: f32,
}

impl Adsr {
    pub fn new(
        source: impl Generator + 'static,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Self {
        Self {
            source: Box::new(source),
            attack: Parameter::new("Attack", attack, 0.01, 10.0, 0.01, "s").into_shared(),
            decay: Parameter::new("Decay", decay, 0.01, 10.0, 0.01, "s").into_shared(),
            sustain: Parameter::new("Sustain", sustain, 0.0, 1.0, 0.01, "").into_shared(),
            release: Parameter::new("Release", release, 0.01, 10.0, 0.01, "s").into_shared(),
            stage: Stage::Idle,
            amplitude: 0.0,
            velocity_gain: 1.0,
            stage_samples: 0,
            attack_start: 0.0,
            decay_start: 0.0,
            release_start: 0.0,
        }
    }

    /// Default envelope: 100 ms attack and decay, 0.7 sustain, 300 ms release.
    pub fn with_defaults(source: impl Generator + 'static) -> Self {
        Self::new(source, 0.1, 0.1, 0.7, 0.3)
    }

    pub fn is_active(&self) -> bool {
        self.stage != Stage::Idle
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn add_suffix(&self, suffix: &str) {
        self.attack.append_suffix(suffix);
        self.decay.append_suffix(suffix);
        self.sustain.append_suffix(suffix);
        self.release.append_suffix(suffix);
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.stage_samples = 0;
    }

    fn advance(&mut self, sample_rate: f32) {
        self.stage_samples += 1;
        let elapsed = self.stage_samples as f32 / sample_rate;

        match self.stage {
            Stage::Idle => self.amplitude = 0.0,
            Stage::Attack => {
                let attack = self.attack.value();
                if attack > 0.0 {
                    self.amplitude =
                        self.attack_start + (1.0 - self.attack_start) * (elapsed / attack);
                }
                if attack <= 0.0 || self.amplitude >= 1.0 {
                    self.amplitude = 1.0;
                    self.decay_start = 1.0;
                    self.enter(Stage::Decay);
                }
            }
            Stage::Decay => {
                let decay = self.decay.value();
                let sustain = self.sustain.value();
                if decay > 0.0 {
                    self.amplitude =
                        self.decay_start - (self.decay_start - sustain) * (elapsed / decay);
                }
                if decay <= 0.0 || elapsed >= decay {
                    self.amplitude = sustain;
                    self.enter(Stage::Sustain);
                }
            }
            Stage::Sustain => self.amplitude = self.sustain.value(),
            Stage::Release => {
                let release = self.release.value();
                if release > 0.0 {
                    self.amplitude = self.release_start * (1.0 - elapsed / release);
                }
                if release <= 0.0 || elapsed >= release {
                    self.amplitude = 0.0;
                    self.enter(Stage::Idle);
                }
            }
        }

        self.amplitude = self.amplitude.clamp(0.0, 1.0);
        if self.amplitude.is_nan() {
            self.amplitude = 0.0;
        }
    }
}

impl Generator for Adsr {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        if self.stage == Stage::Idle {
            return 0.0;
        }

        let sample = self.source.generate_sample(sample_rate);

        // Update on every sample for at-sample stage timing.
        self.advance(sample_rate);

        sample * self.amplitude * self.velocity_gain
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(1.0);
        self.velocity_gain = velocity;
        self.attack_start = self.amplitude;
        self.enter(Stage::Attack);
    }

    fn note_off(&mut self) {
        self.source.note_off();
        if self.stage == Stage::Idle {
            return;
        }
        self.release_start = if self.stage == Stage::Sustain {
            self.sustain.value()
        } else {
            self.amplitude
        };
        self.enter(Stage::Release);
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![
            self.attack.clone(),
            self.decay.clone(),
            self.sustain.clone(),
            self.release.clone(),
        ];
        params.extend(self.source.parameters());
        params
    }
}
