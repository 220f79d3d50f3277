//! Criterion benchmarks for the master effects chain
//!
//! Run with: cargo bench -p howl-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use howl_core::Effect;
use howl_effects::{
    Delay, Distortion, EffectParams, EffectsProcessor, FilterProcessor, FilterType, Reverb,
    TransientShaper,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| (std::f32::consts::TAU * 220.0 * i as f32 / SAMPLE_RATE).sin() * 0.5)
        .collect()
}

fn bench_stage<E: Effect>(c: &mut Criterion, name: &str, mut make: impl FnMut() -> E) {
    let mut group = c.benchmark_group(name);
    for &block_size in BLOCK_SIZES {
        let input = test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("stereo", block_size),
            &block_size,
            |b, _| {
                let mut effect = make();
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    effect.process_block_stereo(&mut left, &mut right);
                    black_box((&left, &right));
                });
            },
        );
    }
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    bench_stage(c, "Distortion", || {
        let mut d = Distortion::new(SAMPLE_RATE);
        d.set_drive(0.7);
        d.set_mix(0.8);
        d
    });
    bench_stage(c, "TransientShaper", || {
        let mut t = TransientShaper::new(SAMPLE_RATE);
        t.set_bite(0.6);
        t
    });
    bench_stage(c, "Delay", || {
        let mut d = Delay::new(SAMPLE_RATE);
        d.set_time(0.33);
        d.set_feedback(0.6);
        d.set_mix(0.5);
        d
    });
    bench_stage(c, "Reverb", || {
        let mut r = Reverb::new(SAMPLE_RATE);
        r.set_room_size(0.8);
        r.set_mix(0.4);
        r
    });
    bench_stage(c, "Formant", || {
        let mut f = FilterProcessor::new(SAMPLE_RATE);
        f.set_filter_type(FilterType::Formant);
        f.set_vowel(0.3);
        f
    });
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("EffectsProcessor");
    let params = EffectParams {
        dist_drive: 0.5,
        dist_mix: 0.6,
        delay_mix: 0.4,
        reverb_mix: 0.3,
        bite: 0.5,
        ..Default::default()
    };
    for &block_size in BLOCK_SIZES {
        let input = test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("full_chain", block_size),
            &block_size,
            |b, _| {
                let mut fx = EffectsProcessor::new(SAMPLE_RATE);
                fx.update_parameters(&params);
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    fx.process_stereo(&mut left, &mut right);
                    black_box((&left, &right));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_chain);
criterion_main!(benches);
