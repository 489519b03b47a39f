//! Named, bounded control parameters.
//!
//! Every knob in the synth is a [`Parameter`]: a scalar with bounds, a step
//! size, a unit label, and an optional change callback that runs synchronously
//! on the writing thread. Values live in an [`AtomicF32`] so control threads
//! can write while the audio thread reads without locking; tearing between
//! *independent* floats is acceptable for this application, a single float
//! store is atomic.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::warn;

use crate::error::SynthError;

/// An `f32` stored in an `AtomicU32` via bit casts.
///
/// Shared between parameter callbacks and the DSP nodes that consume the
/// value. Relaxed ordering is enough: readers only need *some* recent value,
/// never cross-variable ordering.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

pub type ChangeCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Descriptor handed to the control plane when enumerating parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub unit: String,
}

/// A named scalar with bounds and an optional change callback.
///
/// The name is mutable: sibling sub-graphs that contribute identically named
/// parameters get a suffix appended (see the mixer and the "Trio" preset).
pub struct Parameter {
    name: RwLock<String>,
    value: AtomicF32,
    min: f32,
    max: f32,
    step: f32,
    unit: String,
    on_change: Option<ChangeCallback>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        initial: f32,
        min: f32,
        max: f32,
        step: f32,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: RwLock::new(name.into()),
            value: AtomicF32::new(initial),
            min,
            max,
            step,
            unit: unit.into(),
            on_change: None,
        }
    }

    /// Attach a change callback. Runs synchronously on every accepted write,
    /// on the writing thread.
    pub fn with_callback(mut self, callback: ChangeCallback) -> Self {
        self.on_change = Some(callback);
        self
    }

    pub fn into_shared(self) -> Arc<Parameter> {
        Arc::new(self)
    }

    pub fn name(&self) -> String {
        self.name.read().expect("parameter name lock").clone()
    }

    /// Appends a suffix to the name, disambiguating parameters contributed by
    /// sibling sub-graphs.
    pub fn append_suffix(&self, suffix: &str) {
        self.name
            .write()
            .expect("parameter name lock")
            .push_str(suffix);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value.load()
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Writes a new value. Out-of-range writes are rejected outright: no
    /// mutation, no callback.
    pub fn set(&self, value: f32) -> Result<(), SynthError> {
        if value < self.min || value > self.max {
            let name = self.name();
            warn!(
                param = %name,
                value,
                min = self.min,
                max = self.max,
                "rejected out-of-range parameter write"
            );
            return Err(SynthError::OutOfRange {
                name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        self.value.store(value);
        if let Some(callback) = &self.on_change {
            callback(value);
        }
        Ok(())
    }

    /// Steps the value up by `step`, clamped to the bounds.
    pub fn increment(&self) {
        let next = (self.value() + self.step).clamp(self.min, self.max);
        let _ = self.set(next);
    }

    /// Steps the value down by `step`, clamped to the bounds.
    pub fn decrement(&self) {
        let next = (self.value() - self.step).clamp(self.min, self.max);
        let _ = self.set(next);
    }

    pub fn info(&self) -> ParameterInfo {
        ParameterInfo {
            name: self.name(),
            value: self.value(),
            min: self.min,
            max: self.max,
            step: self.step,
            unit: self.unit.clone(),
        }
    }
}

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name())
            .field("value", &self.value())
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("unit", &self.unit)
            .finish()
    }
}
