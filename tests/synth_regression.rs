//! End-to-end scenarios for the synthesizer core: envelope timing against
//! literal sample indices, pool normalization, factory swaps, and the CC
//! mapping. Everything renders offline at 44.1 kHz.

use chordate::engine::pool::note_to_frequency;
use chordate::engine::registry::{VoiceFactory, VoiceFactoryRegistry};
use chordate::engine::VoicePool;
use chordate::graph::envelope::Adsr;
use chordate::graph::node::{find_parameter, Generator};
use chordate::graph::oscillator::Oscillator;
use chordate::io::{dispatch, SynthEvent};
use chordate::voices::register_presets;
use std::sync::Arc;

const SAMPLE_RATE: f32 = 44_100.0;

fn render(generator: &mut dyn Generator, samples: usize) -> Vec<f32> {
    (0..samples)
        .map(|_| generator.generate_sample(SAMPLE_RATE))
        .collect()
}

fn rms(buffer: &[f32]) -> f32 {
    (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
}

/// A sine through an ADSR: attack peak, sustain plateau, and the
/// release-to-zero deadline in samples.
#[test]
fn sine_adsr_lifecycle() {
    let mut adsr = Adsr::new(Oscillator::sine(440.0, 1.0), 0.1, 0.1, 0.7, 0.3);
    adsr.note_on(1.0);

    // Track the envelope level through half a second of held note.
    let half_second = (0.5 * SAMPLE_RATE) as usize;
    let mut attack_peak = 0.0f32;
    let mut sustain_level = 0.0f32;
    for i in 0..half_second {
        adsr.generate_sample(SAMPLE_RATE);
        let level = adsr.amplitude();
        if i < (0.12 * SAMPLE_RATE) as usize {
            attack_peak = attack_peak.max(level);
        }
        if i >= (0.3 * SAMPLE_RATE) as usize {
            sustain_level = sustain_level.max(level);
        }
    }
    assert!(
        (0.99..=1.0).contains(&attack_peak),
        "attack peak was {attack_peak}"
    );
    assert!(
        (0.69..=0.71).contains(&sustain_level),
        "sustain level was {sustain_level}"
    );

    adsr.note_off();
    let released = render(&mut adsr, half_second);

    // Must be exactly zero within ceil(0.3·sr) + 2 samples of note-off.
    let deadline = (0.3 * SAMPLE_RATE).ceil() as usize + 2;
    for (i, &sample) in released.iter().enumerate().skip(deadline) {
        assert_eq!(sample, 0.0, "still sounding {i} samples after note-off");
    }
}

/// Retriggering at sustain glides instead of clicking.
#[test]
fn retrigger_from_sustain_has_no_click() {
    let mut adsr = Adsr::new(Oscillator::sine(440.0, 1.0), 0.1, 0.1, 0.7, 0.3);
    adsr.note_on(1.0);
    render(&mut adsr, (0.5 * SAMPLE_RATE) as usize);

    adsr.note_on(1.0);
    adsr.generate_sample(SAMPLE_RATE);
    let envelope = adsr.amplitude();
    assert!(
        (envelope - 0.7).abs() < 1e-4,
        "first post-retrigger envelope value was {envelope}"
    );

    // And the envelope rises monotonically from there through the attack.
    let mut previous = envelope;
    for _ in 0..2000 {
        adsr.generate_sample(SAMPLE_RATE);
        let level = adsr.amplitude();
        assert!(level + 1e-6 >= previous, "attack dipped: {previous} -> {level}");
        previous = level;
    }
}

fn immediate_sine_factory() -> VoiceFactory {
    // Attack/decay as short as the parameters allow, sustain at 1: the voice
    // is effectively a steady full-scale sine almost immediately.
    Arc::new(|frequency, volume| {
        Box::new(Adsr::new(
            Oscillator::sine(frequency, volume),
            0.01,
            0.01,
            1.0,
            0.01,
        ))
    })
}

/// A triad's RMS stays near a single voice's RMS thanks to the 1/√K
/// normalization.
#[test]
fn chord_rms_matches_single_voice() {
    let mut solo_pool = VoicePool::new(&immediate_sine_factory());
    solo_pool.note_on(60, 0, note_to_frequency(60), 1.0);
    // Let attack and gain smoothing settle before measuring.
    render(&mut solo_pool, (0.1 * SAMPLE_RATE) as usize);
    let solo = rms(&render(&mut solo_pool, (0.2 * SAMPLE_RATE) as usize));

    let mut chord_pool = VoicePool::new(&immediate_sine_factory());
    for note in [60, 64, 67] {
        chord_pool.note_on(note, 0, note_to_frequency(note), 1.0);
    }
    render(&mut chord_pool, (0.1 * SAMPLE_RATE) as usize);
    let chord = rms(&render(&mut chord_pool, (0.2 * SAMPLE_RATE) as usize));

    assert!(
        (chord - solo).abs() / solo < 0.2,
        "chord RMS {chord} vs solo RMS {solo}"
    );
}

/// Swapping factories replaces the published parameters and leaves no
/// per-note state behind.
#[test]
fn factory_swap_replaces_parameters_and_state() {
    let mut registry = VoiceFactoryRegistry::new();
    register_presets(&mut registry);

    let pool = VoicePool::new(&registry.get("Sine Oscillator").unwrap());
    pool.note_on(60, 0, note_to_frequency(60), 1.0);

    pool.set_voice_factory(&registry.get("Bell").unwrap());

    let names: Vec<String> = pool.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        [
            "Attack",
            "Decay",
            "Sustain",
            "Release",
            "Rate",
            "Depth",
            "Modulator Frequency Ratio",
            "Modulation Index",
            "Self Modulation Index",
        ]
    );

    // The held note from before the swap is gone: fresh slots are silent.
    let mut pool = pool;
    let silent = render(&mut pool, 1000);
    assert!(silent.iter().all(|&s| s == 0.0), "pre-swap state leaked");

    // A fresh note shows Bell's 10 ms strike: near-full level almost at once.
    pool.note_on(60, 0, note_to_frequency(60), 1.0);
    let strike = render(&mut pool, (0.05 * SAMPLE_RATE) as usize);
    let peak = strike.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    assert!(peak > 0.5, "bell strike missing, peak {peak}");
}

/// CC 70 maps across the grouped Attack's full range.
#[test]
fn cc_mapping_sweeps_parameter_range() {
    let mut registry = VoiceFactoryRegistry::new();
    register_presets(&mut registry);
    let pool = VoicePool::new(&registry.get("Sine Oscillator").unwrap());

    dispatch(
        SynthEvent::ControlChange {
            controller: 70,
            value: 127,
        },
        &pool,
    )
    .unwrap();
    let attack = find_parameter(&pool, "Attack").unwrap();
    assert!((attack.value() - 10.0).abs() < 1e-4);

    dispatch(
        SynthEvent::ControlChange {
            controller: 70,
            value: 0,
        },
        &pool,
    )
    .unwrap();
    assert!((attack.value() - 0.01).abs() < 1e-4);
}

/// A lowpass pinned just under Nyquist stays finite and bounded.
#[test]
fn lowpass_near_nyquist_is_stable() {
    use chordate::graph::filter::BiquadFilter;

    struct Impulse(bool);
    impl Generator for Impulse {
        fn generate_sample(&mut self, _sample_rate: f32) -> f32 {
            if self.0 {
                0.0
            } else {
                self.0 = true;
                1.0
            }
        }
    }

    let mut filter = BiquadFilter::lowpass(Impulse(false), SAMPLE_RATE / 2.0 - 1.0);
    for i in 0..SAMPLE_RATE as usize {
        let out = filter.generate_sample(SAMPLE_RATE);
        assert!(out.is_finite(), "non-finite output at sample {i}");
        assert!(out.abs() <= 2.0, "unbounded output {out} at sample {i}");
    }
}

/// Grouped-parameter fan-out reaches all 128 per-note envelopes, observed
/// through behavior: after shrinking Release via the grouped knob,
/// a released note dies within the new release time.
#[test]
fn grouped_release_edit_shortens_every_voice() {
    let mut registry = VoiceFactoryRegistry::new();
    register_presets(&mut registry);
    let mut pool = VoicePool::new(&registry.get("Sine Oscillator").unwrap());

    find_parameter(&pool, "Release").unwrap().set(0.01).unwrap();

    for note in [48, 60, 72] {
        pool.note_on(note, 0, note_to_frequency(note), 1.0);
    }
    render(&mut pool, (0.3 * SAMPLE_RATE) as usize);
    for note in [48, 60, 72] {
        pool.note_off(note, 0);
    }

    // 0.01 s release plus slack; then the pool must be fully silent.
    render(&mut pool, (0.02 * SAMPLE_RATE) as usize);
    let tail = render(&mut pool, 1000);
    assert!(tail.iter().all(|&s| s == 0.0));
}
