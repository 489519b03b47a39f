use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{error, info};

use crate::engine::pool::VoicePool;
use crate::graph::node::Generator;
use crate::io::events::{dispatch, SynthEvent};
use crate::EngineConfig;

/// Platform audio output boundary.
///
/// `begin_write` blocks (or spins) until the device can accept more frames
/// and returns the writable region; `commit` hands the filled region back.
/// Samples are mono f32 in [−1, 1] at `sample_rate`.
pub trait AudioSink: Send {
    fn sample_rate(&self) -> f32;
    fn begin_write(&mut self) -> Result<&mut [f32], crate::error::SynthError>;
    fn commit(&mut self) -> Result<(), crate::error::SynthError>;
}

/// The render loop: drains input events, then fills the sink one sample at a
/// time from the root generator, soft-clipping with `tanh`.
///
/// Runs until the shared `running` flag clears or the sink fails. It owns the
/// root exclusively; everything shared (the pool's slots, parameter values)
/// synchronizes internally.
pub struct Engine {
    root: Box<dyn Generator>,
    pool: VoicePool,
    events: Consumer<SynthEvent>,
    running: Arc<AtomicBool>,
}

impl Engine {
    /// Builds an engine whose root is the pool itself. Returns the event
    /// producer for input threads and the run flag for the shutdown path.
    pub fn new(config: &EngineConfig, pool: VoicePool) -> (Self, Producer<SynthEvent>) {
        Self::with_root(config, Box::new(pool.clone()), pool)
    }

    /// Builds an engine with an explicit root graph (e.g. the pool behind a
    /// master effect chain). The pool handle is still needed for note
    /// dispatch.
    pub fn with_root(
        config: &EngineConfig,
        root: Box<dyn Generator>,
        pool: VoicePool,
    ) -> (Self, Producer<SynthEvent>) {
        let (producer, consumer) = RingBuffer::new(config.event_queue_capacity);
        (
            Self {
                root,
                pool,
                events: consumer,
                running: Arc::new(AtomicBool::new(true)),
            },
            producer,
        )
    }

    /// Shared flag controlling the render loop. Clear it to stop.
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Pulls samples into the sink until stopped or the sink fails.
    pub fn run(&mut self, sink: &mut dyn AudioSink) -> Result<(), crate::error::SynthError> {
        let sample_rate = sink.sample_rate();
        info!(sample_rate, "render loop started");

        while self.running.load(Ordering::Relaxed) {
            self.drain_events();

            let buffer = match sink.begin_write() {
                Ok(buffer) => buffer,
                Err(err) => {
                    error!(%err, "audio sink failed, stopping render loop");
                    return Err(err);
                }
            };
            for sample in buffer.iter_mut() {
                *sample = self.root.generate_sample(sample_rate).tanh();
            }
            sink.commit()?;
        }

        info!("render loop stopped");
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.pop() {
            if let Err(err) = dispatch(event, &self.pool) {
                // Bad input is the sender's problem; the loop keeps running.
                tracing::warn!(%err, "dropped input event");
            }
        }
    }
}

/// In-memory sink for offline rendering and tests: fixed-size chunks appended
/// to a growing buffer.
pub struct BufferSink {
    sample_rate: f32,
    chunk: Vec<f32>,
    pub samples: Vec<f32>,
}

impl BufferSink {
    pub fn new(sample_rate: f32, chunk_len: usize) -> Self {
        Self {
            sample_rate,
            chunk: vec![0.0; chunk_len],
            samples: Vec::new(),
        }
    }
}

impl AudioSink for BufferSink {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn begin_write(&mut self) -> Result<&mut [f32], crate::error::SynthError> {
        Ok(&mut self.chunk)
    }

    fn commit(&mut self) -> Result<(), crate::error::SynthError> {
        self.samples.extend_from_slice(&self.chunk);
        Ok(())
    }
}
