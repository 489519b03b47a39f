//! Two-operator FM synthesis cell.

use std::sync::Arc;

use crate::graph::node::Generator;
use crate::graph::oscillator::Oscillator;
use crate::param::Parameter;

/// Carrier + modulator with optional self-modulation of the modulator.
///
/// Per sample: pull the modulator, retune the modulator for the *next* sample
/// from its own output (`f_mod·(1 + I_self·m)`), retune the carrier for *this*
/// sample (`f_car·(1 + I_mod·m)`), then pull the carrier. Both index sweeps
/// scale the deviation with the base frequency, so timbre tracks pitch.
pub struct FmVoice {
    carrier_base: f32,
    carrier: Oscillator,
    modulator: Oscillator,
    ratio: Arc<Parameter>,
    modulation_index: Arc<Parameter>,
    self_modulation_index: Arc<Parameter>,
}

impl FmVoice {
    pub fn new(
        carrier_freq: f32,
        modulator_freq: f32,
        modulation_index: f32,
        self_modulation_index: f32,
    ) -> Self {
        Self {
            carrier_base: carrier_freq,
            carrier: Oscillator::sine(carrier_freq, 1.0),
            modulator: Oscillator::sine(modulator_freq, 1.0),
            ratio: Parameter::new(
                "Modulator Frequency Ratio",
                modulator_freq / carrier_freq,
                0.1,
                10.0,
                0.01,
                "",
            )
            .into_shared(),
            modulation_index: Parameter::new("Modulation Index", modulation_index, 0.0, 10.0, 0.01, "")
                .into_shared(),
            self_modulation_index: Parameter::new(
                "Self Modulation Index",
                self_modulation_index,
                0.0,
                10.0,
                0.01,
                "",
            )
            .into_shared(),
        }
    }

    pub fn add_suffix(&self, suffix: &str) {
        self.ratio.append_suffix(suffix);
        self.modulation_index.append_suffix(suffix);
        self.self_modulation_index.append_suffix(suffix);
    }
}

impl Generator for FmVoice {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let m = self.modulator.generate_sample(sample_rate);

        let modulator_base = self.carrier_base * self.ratio.value();
        self.modulator
            .set_frequency(modulator_base * (1.0 + self.self_modulation_index.value() * m));
        self.carrier
            .set_frequency(self.carrier_base * (1.0 + self.modulation_index.value() * m));

        self.carrier.generate_sample(sample_rate)
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        vec![
            self.ratio.clone(),
            self.modulation_index.clone(),
            self.self_modulation_index.clone(),
        ]
    }
}
