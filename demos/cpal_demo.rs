//! Plays a repeating C-major arpeggio through the default output device.
//!
//! The render loop pulls samples into a ring buffer; the cpal callback
//! drains it. Run with `cargo run --example cpal_demo`.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};

use chordate::control::Controller;
use chordate::engine::render::AudioSink;
use chordate::engine::{Engine, VoicePool};
use chordate::error::SynthError;
use chordate::io::SynthEvent;
use chordate::voices::register_presets;
use chordate::EngineConfig;

const CHUNK: usize = 256;

/// Pull-side adapter: the render loop fills a staging buffer, `commit` pushes
/// it into the ring the cpal callback drains.
struct RingSink {
    producer: Producer<f32>,
    staging: Vec<f32>,
    sample_rate: f32,
}

impl AudioSink for RingSink {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn begin_write(&mut self) -> Result<&mut [f32], SynthError> {
        while self.producer.slots() < CHUNK {
            if self.producer.is_abandoned() {
                return Err(SynthError::SinkFailure("output stream gone".into()));
            }
            thread::sleep(Duration::from_micros(500));
        }
        Ok(&mut self.staging)
    }

    fn commit(&mut self) -> Result<(), SynthError> {
        for &sample in &self.staging {
            self.producer
                .push(sample)
                .map_err(|_| SynthError::SinkFailure("ring buffer overrun".into()))?;
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(err) = run() {
        eprintln!("cpal demo error: {err}");
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("no default output device available")?;
    let config = device.default_output_config()?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err("cpal demo currently supports only f32 output".into());
    }

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    // Synth core: presets, pool, controller, engine.
    let mut registry = chordate::engine::VoiceFactoryRegistry::new();
    register_presets(&mut registry);
    let pool = VoicePool::new(&registry.get("Sine Oscillator")?);
    let controller = Controller::new(pool.clone(), registry);

    let engine_config = EngineConfig {
        sample_rate: sample_rate as u32,
        ..EngineConfig::default()
    };
    let (mut engine, mut events) = Engine::new(&engine_config, pool);
    let running = engine.running();

    // Audio plumbing: render thread -> ring -> cpal callback.
    let (producer, mut consumer) = RingBuffer::<f32>::new(CHUNK * 8);
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            for frame in data.chunks_mut(channels) {
                let sample = consumer.pop().unwrap_or(0.0);
                for out in frame.iter_mut() {
                    *out = sample;
                }
            }
        },
        move |err| eprintln!("stream error: {err}"),
        None,
    )?;
    stream.play()?;

    let render_thread = thread::spawn(move || {
        let mut sink = RingSink {
            producer,
            staging: vec![0.0; CHUNK],
            sample_rate,
        };
        if let Err(err) = engine.run(&mut sink) {
            eprintln!("render loop exited: {err}");
        }
    });

    println!(
        "Playing a C-major arpeggio with voices {:?}. Press Ctrl+C to stop.",
        controller.voice_names()
    );
    play_arpeggio(&mut events);

    running.store(false, Ordering::Relaxed);
    let _ = render_thread.join();
    Ok(())
}

fn play_arpeggio(events: &mut Producer<SynthEvent>) {
    let notes = [60u8, 64, 67, 72]; // C4, E4, G4, C5
    let note_duration = Duration::from_millis(450);
    let gap = Duration::from_millis(50);

    for _ in 0..8 {
        for &note in &notes {
            let _ = events.push(SynthEvent::note_on_midi(note, 0, 100));
            thread::sleep(note_duration);
            let _ = events.push(SynthEvent::NoteOff { note, channel: 0 });
            thread::sleep(gap);
        }
    }
}
