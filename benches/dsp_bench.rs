use chordate::engine::registry::VoiceFactory;
use chordate::engine::VoicePool;
use chordate::graph::envelope::Adsr;
use chordate::graph::node::Generator;
use chordate::graph::oscillator::{Oscillator, Waveform};
use chordate::graph::tone::HarmonicTone;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

const SAMPLE_RATE: f32 = 44_100.0;
const BLOCK: usize = 512;

fn render_block(generator: &mut dyn Generator) -> f32 {
    let mut acc = 0.0;
    for _ in 0..BLOCK {
        acc += generator.generate_sample(SAMPLE_RATE);
    }
    acc
}

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillator");
    for (name, waveform) in [
        ("sine", Waveform::Sine),
        ("square", Waveform::Square),
        ("sawtooth", Waveform::Sawtooth),
    ] {
        group.bench_function(name, |b| {
            let mut osc = Oscillator::new(440.0, 1.0, waveform);
            b.iter(|| black_box(render_block(&mut osc)));
        });
    }
    group.finish();
}

fn bench_voice_graphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice");
    group.bench_function("adsr_sine", |b| {
        let mut voice = Adsr::with_defaults(Oscillator::sine(440.0, 1.0));
        voice.note_on(1.0);
        b.iter(|| black_box(render_block(&mut voice)));
    });
    group.bench_function("harmonic_tone", |b| {
        let mut voice = HarmonicTone::new(440.0, 1.0);
        b.iter(|| black_box(render_block(&mut voice)));
    });
    group.finish();
}

fn bench_pool(c: &mut Criterion) {
    let factory: VoiceFactory = Arc::new(|frequency, volume| {
        Box::new(Adsr::with_defaults(Oscillator::sine(frequency, volume)))
    });

    let mut group = c.benchmark_group("pool");
    group.bench_function("idle_128_voices", |b| {
        let mut pool = VoicePool::new(&factory);
        b.iter(|| black_box(render_block(&mut pool)));
    });
    group.bench_function("chord_128_voices", |b| {
        let mut pool = VoicePool::new(&factory);
        for note in [60, 64, 67] {
            pool.note_on(note, 0, chordate::engine::note_to_frequency(note), 1.0);
        }
        b.iter(|| black_box(render_block(&mut pool)));
    });
    group.finish();
}

criterion_group!(benches, bench_oscillator, bench_voice_graphs, bench_pool);
criterion_main!(benches);
