use std::sync::Arc;

use crate::graph::node::Generator;
use crate::param::Parameter;

/// Weighted sum of N sources, one volume parameter per channel.
///
/// No normalization: the explicit channel weights are the user contract.
/// Suffixes disambiguate parameter names when the sources are sibling
/// sub-graphs that publish identically named parameters (see the "Trio"
/// preset).
pub struct Mixer {
    sources: Vec<Box<dyn Generator>>,
    volume_params: Vec<Arc<Parameter>>,
}

impl Mixer {
    /// Per-channel default level. Summing three full-scale voices at unity
    /// would clip immediately; 0.3 leaves headroom out of the box.
    const DEFAULT_VOLUME: f32 = 0.3;

    pub fn new(sources: Vec<Box<dyn Generator>>) -> Self {
        let count = sources.len();
        Self::with_suffixes(sources, vec![String::new(); count])
    }

    pub fn with_suffixes(sources: Vec<Box<dyn Generator>>, suffixes: Vec<String>) -> Self {
        let volume_params = (0..sources.len())
            .map(|i| {
                let suffix = suffixes.get(i).map(String::as_str).unwrap_or("");
                Parameter::new(
                    format!("Channel {} Volume{suffix}", i + 1),
                    Self::DEFAULT_VOLUME,
                    0.0,
                    2.0,
                    0.01,
                    "",
                )
                .into_shared()
            })
            .collect();

        Self {
            sources,
            volume_params,
        }
    }

    pub fn volume_param(&self, channel: usize) -> Option<Arc<Parameter>> {
        self.volume_params.get(channel).cloned()
    }

    /// Sets a channel's level. Channel count is fixed at construction, so
    /// builders index channels directly; out-of-range volumes are rejected by
    /// the parameter like any other write.
    pub fn set_volume(&self, channel: usize, volume: f32) {
        let _ = self.volume_params[channel].set(volume);
    }
}

impl Generator for Mixer {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        self.sources
            .iter_mut()
            .zip(&self.volume_params)
            .map(|(source, volume)| source.generate_sample(sample_rate) * volume.value())
            .sum()
    }

    fn note_on(&mut self, velocity: f32) {
        for source in &mut self.sources {
            source.note_on(velocity);
        }
    }

    fn note_off(&mut self) {
        for source in &mut self.sources {
            source.note_off();
        }
    }

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        let mut params = self.volume_params.clone();
        for source in &self.sources {
            params.extend(source.parameters());
        }
        params
    }
}
