//! Detuned oscillator stacks.
//!
//! [`Tone`] fattens a single pitch by spreading N oscillators symmetrically
//! around it. [`HarmonicTone`] stacks Tones at fixed partial ratios for an
//! organ-ish spectrum.

use std::sync::Arc;

use crate::graph::node::Generator;
use crate::graph::oscillator::{Oscillator, Waveform};
use crate::param::{AtomicF32, Parameter};

/// N sine oscillators at `f·(1 + (i − (N−1)/2)·detune)`, averaged.
///
/// `Oscillators` and `Detune Factor` are edit-rate parameters: their writes
/// land in control cells and the bank is rebuilt on the next pull that
/// observes a change. New oscillators start at phase 0; the click is
/// acceptable at edit rate.
pub struct Tone {
    frequency: f32,
    volume: f32,
    oscillators: Vec<Oscillator>,
    count_cell: Arc<AtomicF32>,
    detune_cell: Arc<AtomicF32>,
    built_count: usize,
    built_detune: f32,
    params: Vec<Arc<Parameter>>,
}

impl Tone {
    pub const DEFAULT_OSCILLATORS: usize = 3;

    pub fn new(frequency: f32, volume: f32) -> Self {
        Self::with_spread(frequency, volume, Self::DEFAULT_OSCILLATORS, 0.001)
    }

    pub fn with_spread(
        frequency: f32,
        volume: f32,
        oscillators_per_tone: usize,
        detune_factor: f32,
    ) -> Self {
        let count_cell = Arc::new(AtomicF32::new(oscillators_per_tone as f32));
        let detune_cell = Arc::new(AtomicF32::new(detune_factor));

        let count_target = count_cell.clone();
        let detune_target = detune_cell.clone();
        let params = vec![
            Parameter::new(
                "Oscillators",
                oscillators_per_tone as f32,
                1.0,
                10.0,
                1.0,
                "",
            )
            .with_callback(Box::new(move |value| count_target.store(value)))
            .into_shared(),
            Parameter::new("Detune Factor", detune_factor, 0.0, 0.1, 0.0001, "")
                .with_callback(Box::new(move |value| detune_target.store(value)))
                .into_shared(),
        ];

        let mut tone = Self {
            frequency,
            volume,
            oscillators: Vec::new(),
            count_cell,
            detune_cell,
            built_count: 0,
            built_detune: 0.0,
            params,
        };
        tone.rebuild(oscillators_per_tone, detune_factor);
        tone
    }

    fn rebuild(&mut self, count: usize, detune: f32) {
        let count = count.max(1);
        self.oscillators = (0..count)
            .map(|i| {
                let offset = (i as f32 - (count - 1) as f32 / 2.0) * detune;
                Oscillator::new(self.frequency * (1.0 + offset), 1.0, Waveform::Sine)
            })
            .collect();
        self.built_count = count;
        self.built_detune = detune;
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.rebuild(self.built_count, self.built_detune);
    }

    /// Programmatic detune, bypassing the parameter. Used by
    /// [`HarmonicTone`], whose `Detune` range is wider than the parameter's.
    pub fn set_detune_factor(&mut self, detune: f32) {
        self.detune_cell.store(detune);
    }

    pub(crate) fn detune_cell(&self) -> Arc<AtomicF32> {
        self.detune_cell.clone()
    }

    pub fn add_suffix(&self, suffix: &str) {
        for param in &self.params {
            param.append_suffix(suffix);
        }
    }
}

impl Generator for Tone {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let count = self.count_cell.load().round().max(1.0) as usize;
        let detune = self.detune_cell.load();
        if count != self.built_count || detune != self.built_detune {
            self.rebuild(count, detune);
        }

        let sum: f32 = self
            .oscillators
            .iter_mut()
            .map(|osc| osc.generate_sample(sample_rate))
            .sum();
        sum * self.volume / self.oscillators.len() as f32
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        self.params.clone()
    }
}

/// Harmonic partial ratios and weights, fundamental excluded.
const PARTIALS: [(f32, f32); 5] = [
    (1.5, 0.5),
    (2.0, 0.4),
    (2.5, 0.3),
    (3.0, 0.2),
    (3.5, 0.1),
];

/// The main [`Tone`] plus five fixed partials, summed through `tanh(x/√K)`.
///
/// The single `Detune` parameter fans out to the partials only; the
/// fundamental keeps its own `Detune Factor`.
pub struct HarmonicTone {
    tones: Vec<Tone>, // [0] is the fundamental
    params: Vec<Arc<Parameter>>,
}

impl HarmonicTone {
    pub fn new(frequency: f32, volume: f32) -> Self {
        let mut tones = vec![Tone::new(frequency, volume)];
        for (ratio, weight) in PARTIALS {
            tones.push(Tone::new(frequency * ratio, volume * weight));
        }

        let partial_cells: Vec<Arc<AtomicF32>> =
            tones[1..].iter().map(|tone| tone.detune_cell()).collect();
        let params = vec![
            Parameter::new("Detune", 0.0, -0.1, 0.1, 0.001, "")
                .with_callback(Box::new(move |value| {
                    for cell in &partial_cells {
                        cell.store(value);
                    }
                }))
                .into_shared(),
        ];

        Self { tones, params }
    }

    pub fn add_suffix(&self, suffix: &str) {
        for param in &self.params {
            param.append_suffix(suffix);
        }
    }
}

impl Generator for HarmonicTone {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let sum: f32 = self
            .tones
            .iter_mut()
            .map(|tone| tone.generate_sample(sample_rate))
            .sum();
        (sum / (self.tones.len() as f32).sqrt()).tanh()
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        // Own params, then the fundamental's. The partials are internal: they
        // are controlled through `Detune`, not exposed one by one.
        let mut params = self.params.clone();
        params.extend(self.tones[0].parameters());
        params
    }
}
