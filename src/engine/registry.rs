use std::sync::Arc;

use crate::error::SynthError;
use crate::graph::node::Generator;

/// Builds a fresh voice graph for a note: `(frequency, volume) -> generator`.
///
/// The pool calls the factory 128 times per rebuild, once per MIDI note, so
/// factories must be cheap and must not share mutable state between the
/// graphs they return.
pub type VoiceFactory = Arc<dyn Fn(f32, f32) -> Box<dyn Generator> + Send + Sync>;

/// Ordered list of named voice factories.
///
/// Order is the presentation order: `names()` returns factories as they were
/// registered, and the first entry is the engine's default voice.
#[derive(Default)]
pub struct VoiceFactoryRegistry {
    entries: Vec<(String, VoiceFactory)>,
}

impl VoiceFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(f32, f32) -> Box<dyn Generator> + Send + Sync + 'static,
    ) {
        self.entries.push((name.into(), Arc::new(factory)));
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Result<VoiceFactory, SynthError> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, factory)| factory.clone())
            .ok_or_else(|| SynthError::UnknownVoiceFactory(name.to_string()))
    }
}
