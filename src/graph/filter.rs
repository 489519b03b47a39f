use std::sync::Arc;

use crate::dsp::biquad::{BiquadCoeffs, BiquadState};
use crate::graph::node::Generator;
use crate::param::Parameter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Response {
    LowPass,
    HighPass,
}

/// Second-order Butterworth filter over a source generator.
///
/// The cutoff is a live parameter; the node re-derives its coefficients on
/// the first pull that observes a changed value, so writer threads never
/// touch filter state.
pub struct BiquadFilter {
    source: Box<dyn Generator>,
    response: Response,
    cutoff: Arc<Parameter>,
    coeffs: BiquadCoeffs,
    state: BiquadState,
    built_cutoff: f32,
    built_sample_rate: f32,
}

impl BiquadFilter {
    pub fn lowpass(source: impl Generator + 'static, cutoff_hz: f32) -> Self {
        Self::new(source, Response::LowPass, "Lowpass Cutoff", cutoff_hz)
    }

    pub fn highpass(source: impl Generator + 'static, cutoff_hz: f32) -> Self {
        Self::new(source, Response::HighPass, "Highpass Cutoff", cutoff_hz)
    }

    fn new(
        source: impl Generator + 'static,
        response: Response,
        param_name: &str,
        cutoff_hz: f32,
    ) -> Self {
        Self {
            source: Box::new(source),
            response,
            cutoff: Parameter::new(param_name, cutoff_hz, 20.0, 20_000.0, 1.0, "Hz").into_shared(),
            // Placeholder until the first pull supplies the sample rate.
            coeffs: BiquadCoeffs::lowpass(cutoff_hz, 44_100.0),
            state: BiquadState::default(),
            built_cutoff: f32::NAN,
            built_sample_rate: f32::NAN,
        }
    }

    fn refresh_coeffs(&mut self, cutoff: f32, sample_rate: f32) {
        self.coeffs = match self.response {
            Response::LowPass => BiquadCoeffs::lowpass(cutoff, sample_rate),
            Response::HighPass => BiquadCoeffs::highpass(cutoff, sample_rate),
        };
        self.built_cutoff = cutoff;
        self.built_sample_rate = sample_rate;
    }
}

impl Generator for BiquadFilter {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff.value();
        if cutoff != self.built_cutoff || sample_rate != self.built_sample_rate {
            self.refresh_coeffs(cutoff, sample_rate);
        }

        let input = self.source.generate_sample(sample_rate);
        self.state.process(&self.coeffs, input)
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(velocity);
    }

    fn note_off(&mut self) {
        self.source.note_off();
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![self.cutoff.clone()];
        params.extend(self.source.parameters());
        params
    }
}
