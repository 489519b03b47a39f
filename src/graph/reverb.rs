use std::sync::Arc;

use crate::dsp::reverb::{AllPassFilter, CombFilter};
use crate::graph::node::Generator;
use crate::param::{AtomicF32, Parameter};

/// Comb delay times in seconds, mutually prime so the echo trains do not
/// reinforce a single resonance.
const COMB_DELAYS: [f32; 4] = [0.0297, 0.0371, 0.0411, 0.0437];
/// All-pass delay times in seconds.
const ALLPASS_DELAYS: [f32; 2] = [0.005, 0.0017];
const ALLPASS_FEEDBACK: f32 = 0.5;

/// Schroeder reverb: four parallel combs, averaged, then two series
/// all-passes for density. Wet and dry levels mix independently.
///
/// `Room Size` and `Damping` both steer the one comb damping value
/// (`Room Size` as `1 − size`), so whichever parameter was written last
/// wins. Each write lands in a shared control cell synchronously, in write
/// order; the audio thread applies the cell to the combs on the next pull.
pub struct Reverb {
    source: Box<dyn Generator>,
    combs: Vec<CombFilter>,
    allpasses: Vec<AllPassFilter>,
    room_size: Arc<Parameter>,
    damping: Arc<Parameter>,
    wet_mix: Arc<Parameter>,
    dry_mix: Arc<Parameter>,
    comb_damping_cell: Arc<AtomicF32>,
    applied_comb_damping: f32,
}

impl Reverb {
    pub fn new(
        source: impl Generator + 'static,
        room_size: f32,
        damping: f32,
        wet_mix: f32,
        dry_mix: f32,
        sample_rate: f32,
    ) -> Self {
        let comb_damping_cell = Arc::new(AtomicF32::new(damping));

        let room_target = comb_damping_cell.clone();
        let damping_target = comb_damping_cell.clone();
        Self {
            source: Box::new(source),
            combs: COMB_DELAYS
                .iter()
                .map(|seconds| CombFilter::new((seconds * sample_rate) as usize, damping))
                .collect(),
            allpasses: ALLPASS_DELAYS
                .iter()
                .map(|seconds| {
                    AllPassFilter::new((seconds * sample_rate) as usize, ALLPASS_FEEDBACK)
                })
                .collect(),
            room_size: Parameter::new("Room Size", room_size, 0.1, 1.0, 0.01, "")
                .with_callback(Box::new(move |value| room_target.store(1.0 - value)))
                .into_shared(),
            damping: Parameter::new("Damping", damping, 0.0, 1.0, 0.01, "")
                .with_callback(Box::new(move |value| damping_target.store(value)))
                .into_shared(),
            wet_mix: Parameter::new("Wet Mix", wet_mix, 0.0, 1.0, 0.01, "").into_shared(),
            dry_mix: Parameter::new("Dry Mix", dry_mix, 0.0, 1.0, 0.01, "").into_shared(),
            comb_damping_cell,
            applied_comb_damping: damping,
        }
    }

    fn refresh_comb_damping(&mut self) {
        let damping = self.comb_damping_cell.load();
        if damping != self.applied_comb_damping {
            for comb in &mut self.combs {
                comb.set_damping(damping);
            }
            self.applied_comb_damping = damping;
        }
    }
}

impl Generator for Reverb {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        self.refresh_comb_damping();

        let input = self.source.generate_sample(sample_rate);

        let mut processed = 0.0;
        for comb in &mut self.combs {
            processed += comb.process(input);
        }
        processed /= self.combs.len() as f32;

        for allpass in &mut self.allpasses {
            processed = allpass.process(processed);
        }

        processed * self.wet_mix.value() + input * self.dry_mix.value()
    }

    fn note_on(&mut self, velocity: f32) {
        self.source.note_on(velocity);
    }

    fn note_off(&mut self) {
        self.source.note_off();
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = vec![
            self.room_size.clone(),
            self.damping.clone(),
            self.wet_mix.clone(),
            self.dry_mix.clone(),
        ];
        params.extend(self.source.parameters());
        params
    }
}
