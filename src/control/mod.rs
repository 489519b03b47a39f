//! Parameter-control surface.
//!
//! The controller is what an external control plane (HTTP handlers, a TUI, a
//! test harness) talks to: enumerate parameters and voices, write a parameter
//! by name, swap the active voice factory. Successful changes are broadcast
//! to every subscriber over a channel; serializing the payloads to a wire
//! format is the control plane's concern, which is why the payload types just
//! derive `Serialize`.

use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::pool::VoicePool;
use crate::engine::registry::VoiceFactoryRegistry;
use crate::error::SynthError;
use crate::graph::node::Generator;
use crate::param::ParameterInfo;

/// Broadcast messages emitted on successful control operations.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlEvent {
    AllParams { params: Vec<ParameterInfo> },
    AllVoices { names: Vec<String> },
    ParamUpdate { name: String, value: f32 },
    VoiceGeneratorChange { name: String },
}

pub struct Controller {
    pool: VoicePool,
    registry: VoiceFactoryRegistry,
    subscribers: Mutex<Vec<Sender<ControlEvent>>>,
}

impl Controller {
    pub fn new(pool: VoicePool, registry: VoiceFactoryRegistry) -> Self {
        Self {
            pool,
            registry,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a subscriber and immediately sends it the current state.
    pub fn subscribe(&self) -> Receiver<ControlEvent> {
        let (sender, receiver) = unbounded();
        let _ = sender.send(ControlEvent::AllParams {
            params: self.parameters(),
        });
        let _ = sender.send(ControlEvent::AllVoices {
            names: self.voice_names(),
        });
        self.subscribers
            .lock()
            .expect("subscriber lock")
            .push(sender);
        receiver
    }

    pub fn parameters(&self) -> Vec<ParameterInfo> {
        self.pool.parameters().iter().map(|p| p.info()).collect()
    }

    pub fn voice_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Writes a parameter by exact name and broadcasts the new value.
    pub fn set_parameter(&self, name: &str, value: f32) -> Result<(), SynthError> {
        let Some(param) = crate::graph::node::find_parameter(&self.pool, name) else {
            warn!(param = name, "write to unknown parameter ignored");
            return Err(SynthError::UnknownParameter(name.to_string()));
        };
        param.set(value)?;
        info!(param = name, value, "parameter updated");
        self.broadcast(ControlEvent::ParamUpdate {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    /// Swaps the active voice factory. Unknown names leave the pool
    /// untouched. After a successful swap the full parameter set is
    /// rebroadcast, since the new voices publish different knobs.
    pub fn set_voice(&self, name: &str) -> Result<(), SynthError> {
        let factory = self.registry.get(name)?;
        self.pool.set_voice_factory(&factory);
        info!(voice = name, "voice factory changed");
        self.broadcast(ControlEvent::VoiceGeneratorChange {
            name: name.to_string(),
        });
        self.broadcast(ControlEvent::AllParams {
            params: self.parameters(),
        });
        Ok(())
    }

    fn broadcast(&self, event: ControlEvent) {
        let mut subscribers = self.subscribers.lock().expect("subscriber lock");
        // Drop subscribers whose receiving end has gone away.
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::VoiceFactoryRegistry;
    use crate::graph::envelope::Adsr;
    use crate::graph::oscillator::Oscillator;

    fn test_controller() -> Controller {
        let mut registry = VoiceFactoryRegistry::new();
        registry.add("Sine", |frequency, volume| {
            Box::new(Adsr::with_defaults(Oscillator::sine(frequency, volume)))
        });
        registry.add("Raw", |frequency, volume| {
            Box::new(Oscillator::sine(frequency, volume))
        });
        let pool = VoicePool::new(&registry.get("Sine").unwrap());
        Controller::new(pool, registry)
    }

    #[test]
    fn subscribe_receives_initial_state() {
        let controller = test_controller();
        let receiver = controller.subscribe();

        match receiver.try_recv().unwrap() {
            ControlEvent::AllParams { params } => {
                let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, ["Attack", "Decay", "Sustain", "Release"]);
            }
            other => panic!("expected AllParams first, got {other:?}"),
        }
        match receiver.try_recv().unwrap() {
            ControlEvent::AllVoices { names } => assert_eq!(names, ["Sine", "Raw"]),
            other => panic!("expected AllVoices, got {other:?}"),
        }
    }

    #[test]
    fn parameter_write_broadcasts_update() {
        let controller = test_controller();
        let receiver = controller.subscribe();
        receiver.try_recv().unwrap();
        receiver.try_recv().unwrap();

        controller.set_parameter("Attack", 1.5).unwrap();
        match receiver.try_recv().unwrap() {
            ControlEvent::ParamUpdate { name, value } => {
                assert_eq!(name, "Attack");
                assert_eq!(value, 1.5);
            }
            other => panic!("expected ParamUpdate, got {other:?}"),
        }
    }

    #[test]
    fn unknown_parameter_is_surfaced_and_not_broadcast() {
        let controller = test_controller();
        let receiver = controller.subscribe();
        receiver.try_recv().unwrap();
        receiver.try_recv().unwrap();

        assert!(matches!(
            controller.set_parameter("Flutter", 0.1),
            Err(SynthError::UnknownParameter(_))
        ));
        assert!(receiver.try_recv().is_err(), "no broadcast on failure");
    }

    #[test]
    fn rejected_value_is_not_broadcast() {
        let controller = test_controller();
        let receiver = controller.subscribe();
        receiver.try_recv().unwrap();
        receiver.try_recv().unwrap();

        assert!(controller.set_parameter("Sustain", 2.0).is_err());
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn voice_swap_broadcasts_change_and_fresh_params() {
        let controller = test_controller();
        let receiver = controller.subscribe();
        receiver.try_recv().unwrap();
        receiver.try_recv().unwrap();

        controller.set_voice("Raw").unwrap();
        assert!(matches!(
            receiver.try_recv().unwrap(),
            ControlEvent::VoiceGeneratorChange { .. }
        ));
        match receiver.try_recv().unwrap() {
            ControlEvent::AllParams { params } => {
                assert!(params.is_empty(), "raw oscillator publishes no knobs");
            }
            other => panic!("expected AllParams, got {other:?}"),
        }
    }

    #[test]
    fn unknown_voice_leaves_pool_untouched() {
        let controller = test_controller();
        assert!(matches!(
            controller.set_voice("Choir"),
            Err(SynthError::UnknownVoiceFactory(_))
        ));
        let names: Vec<String> = controller
            .parameters()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, ["Attack", "Decay", "Sustain", "Release"]);
    }

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let json = serde_json::to_string(&ControlEvent::ParamUpdate {
            name: "Attack".into(),
            value: 0.5,
        })
        .unwrap();
        assert!(json.contains("\"type\":\"param_update\""));
        assert!(json.contains("\"name\":\"Attack\""));
    }
}
