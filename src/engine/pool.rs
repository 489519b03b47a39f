use std::sync::{Arc, Mutex, RwLock};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::engine::registry::VoiceFactory;
use crate::graph::node::Generator;
use crate::param::Parameter;
use crate::MIDI_NOTE_COUNT;

/// Slots quieter than this don't count toward normalization. About −80 dBFS:
/// excludes numerical release tails so they don't dim the remaining notes.
const ACTIVE_THRESHOLD: f32 = 1e-4;

/// Gain smoothing time constant.
const GAIN_TAU_SECONDS: f32 = 0.010;

/// Random per-slot detune range (±0.1%), breaking phase coherence between
/// identical voices that would otherwise beat against each other.
const SLOT_DETUNE: f32 = 0.001;

struct PoolInner {
    slots: Vec<Box<dyn Generator>>,
    smoothed_gain: f32,
}

/// 128 pre-allocated per-note voices behind a single pool lock.
///
/// Every MIDI note owns a slot for the pool's whole life; note-on events
/// index straight into it. Inactive voices (idle envelopes) return exactly 0
/// and cost almost nothing, so every slot is pulled every sample; the
/// simplicity is worth more than the skipped work.
///
/// The pool mutex is the one acknowledged audio-thread lock: the audio
/// thread takes it per `generate_sample`, note events take it briefly, and a
/// factory swap holds it while all 128 slots rebuild (an audible dropout of
/// a few milliseconds, accepted as user-initiated).
///
/// Cloning the pool clones a handle to the same shared state.
#[derive(Clone)]
pub struct VoicePool {
    inner: Arc<Mutex<PoolInner>>,
    grouped: Arc<RwLock<Vec<Arc<Parameter>>>>,
}

impl VoicePool {
    pub fn new(factory: &VoiceFactory) -> Self {
        let pool = Self {
            inner: Arc::new(Mutex::new(PoolInner {
                slots: Vec::new(),
                smoothed_gain: 1.0,
            })),
            grouped: Arc::new(RwLock::new(Vec::new())),
        };
        pool.set_voice_factory(factory);
        pool
    }

    /// Rebuilds all 128 slots from the factory, then republishes the grouped
    /// parameters. Atomic with respect to the audio thread: it holds the pool
    /// lock for the whole rebuild.
    pub fn set_voice_factory(&self, factory: &VoiceFactory) {
        let mut rng = rand::thread_rng();
        {
            let mut inner = self.inner.lock().expect("pool lock");
            inner.slots.clear();
            for note in 0..MIDI_NOTE_COUNT {
                let detune = 1.0 + rng.gen_range(-SLOT_DETUNE..SLOT_DETUNE);
                let frequency = note_to_frequency(note as u8) * detune;
                inner.slots.push(factory(frequency, 1.0));
            }
        }

        let grouped = self.build_grouped_parameters();
        info!(parameters = grouped.len(), "voice pool rebuilt");
        *self.grouped.write().expect("grouped params lock") = grouped;
    }

    /// One published parameter per distinct per-note parameter name, in order
    /// of first appearance. Bounds and unit mirror the first instance; the
    /// change callback fans the write out to every slot under the pool lock.
    fn build_grouped_parameters(&self) -> Vec<Arc<Parameter>> {
        let inner = self.inner.lock().expect("pool lock");

        let mut names: Vec<String> = Vec::new();
        let mut firsts: Vec<Arc<Parameter>> = Vec::new();
        for slot in &inner.slots {
            for param in slot.parameters() {
                let name = param.name();
                if !names.contains(&name) {
                    names.push(name);
                    firsts.push(param);
                }
            }
        }
        drop(inner);

        names
            .into_iter()
            .zip(firsts)
            .map(|(name, first)| {
                let pool = self.inner.clone();
                let fan_name = name.clone();
                Parameter::new(
                    name,
                    first.value(),
                    first.min(),
                    first.max(),
                    first.step(),
                    first.unit(),
                )
                .with_callback(Box::new(move |value| {
                    // The lock also excludes a concurrent factory swap, so
                    // the fan-out never walks a half-rebuilt slot array.
                    let inner = pool.lock().expect("pool lock");
                    for slot in &inner.slots {
                        for param in slot.parameters() {
                            if param.name() == fan_name {
                                let _ = param.set(value);
                                break;
                            }
                        }
                    }
                }))
                .into_shared()
            })
            .collect()
    }

    pub fn note_on(&self, note: u8, channel: u8, _frequency: f32, velocity: f32) {
        // `channel` is accepted for interface parity; there is no per-channel
        // routing yet.
        let _ = channel;
        if note as usize >= MIDI_NOTE_COUNT {
            warn!(note, "ignoring note-on outside 0..128");
            return;
        }
        let mut inner = self.inner.lock().expect("pool lock");
        inner.slots[note as usize].note_on(velocity);
        debug!(note, velocity, "note on");
    }

    pub fn note_off(&self, note: u8, channel: u8) {
        let _ = channel;
        if note as usize >= MIDI_NOTE_COUNT {
            warn!(note, "ignoring note-off outside 0..128");
            return;
        }
        let mut inner = self.inner.lock().expect("pool lock");
        inner.slots[note as usize].note_off();
        debug!(note, "note off");
    }
}

impl Generator for VoicePool {
    fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let mut inner = self.inner.lock().expect("pool lock");

        let mut sum = 0.0;
        let mut active = 0u32;
        for slot in &mut inner.slots {
            let sample = slot.generate_sample(sample_rate);
            sum += sample;
            if sample.abs() > ACTIVE_THRESHOLD {
                active += 1;
            }
        }

        // Chord-aware normalization: K voices summed coherently grow like K,
        // uncorrelated ones like √K; dividing by √K keeps chords at roughly
        // constant loudness. Smoothed with a one-pole so voices joining or
        // leaving don't step the gain.
        let target_gain = if active > 0 {
            1.0 / (active as f32).sqrt()
        } else {
            1.0
        };
        let alpha = (-1.0 / (GAIN_TAU_SECONDS * sample_rate)).exp();
        inner.smoothed_gain = alpha * inner.smoothed_gain + (1.0 - alpha) * target_gain;

        sum * inner.smoothed_gain
    }

    fn note_on(&mut self, _velocity: f32) {
        // Notes address individual slots via `VoicePool::note_on(note, ...)`;
        // a broadcast note-on has no meaning for the pool.
    }

    fn note_off(&mut self) {}

    fn parameters(&self) -> Vec<Arc<Parameter>> {
        self.grouped.read().expect("grouped params lock").clone()
    }
}

pub fn note_to_frequency(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
