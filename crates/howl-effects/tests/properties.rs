//! Property-based tests for howl-effects.
//!
//! Every stage and every chain ordering stays finite and bounded for any
//! in-range parameter set, and the reverb wet/dry invariant holds for any mix.

use howl_core::Effect;
use howl_effects::{
    CHAIN_PRESETS, Distortion, EffectParams, EffectsProcessor, FilterProcessor, FilterType,
    Reverb, ReverbParameters, formant_table,
};
use proptest::prelude::*;

fn effect_params() -> impl Strategy<Value = EffectParams> {
    (
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=2.0),
        (0.0f32..=0.95, 0.0f32..=1.0, 0.0f32..=1.0),
        (0.0f32..=1.0, 0.0f32..=1.0, -1.0f32..=1.0),
    )
        .prop_map(|((dd, dm, dt), (fb, dmix, rs), (rd, rm, bite))| EffectParams {
            dist_drive: dd,
            dist_mix: dm,
            delay_time: dt,
            delay_feedback: fb,
            delay_mix: dmix,
            reverb_size: rs,
            reverb_damping: rd,
            reverb_mix: rm,
            bite,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any parameter set through any preset ordering stays finite.
    #[test]
    fn chain_output_is_finite(
        params in effect_params(),
        preset in 0usize..6,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut fx = EffectsProcessor::new(44100.0);
        fx.update_parameters(&params);
        fx.set_chain_preset(preset);
        prop_assert_eq!(fx.chain_order(), &CHAIN_PRESETS[preset][..]);

        let mut left = input.clone();
        let mut right: Vec<f32> = input.iter().map(|x| -x).collect();
        fx.process_stereo(&mut left, &mut right);
        for s in left.iter().chain(right.iter()) {
            prop_assert!(s.is_finite());
        }
    }

    /// Reverb wet + dry is 1 for every mix, including out-of-range input.
    #[test]
    fn reverb_wet_dry_sum(
        mix in -2.0f32..3.0,
        size in 0.0f32..=1.0,
        wet in -2.0f32..3.0,
        dry in -2.0f32..3.0,
        width in 0.0f32..=1.0,
    ) {
        let mut reverb = Reverb::new(44100.0);
        reverb.set_room_size(size);
        reverb.set_mix(mix);
        let p = reverb.parameters();
        prop_assert!((p.wet_level + p.dry_level - 1.0).abs() < 1e-6);

        reverb.set_parameters(ReverbParameters {
            wet_level: wet,
            dry_level: dry,
            width,
            ..p
        });
        let p = reverb.parameters();
        prop_assert!((p.wet_level + p.dry_level - 1.0).abs() < 1e-6);
        prop_assert!((0.0..=1.0).contains(&p.wet_level));
    }

    /// Distortion at full mix is bounded by 1 in magnitude.
    #[test]
    fn distortion_is_bounded(drive in 0.0f32..=1.0, x in -10.0f32..10.0) {
        let mut dist = Distortion::new(48000.0);
        dist.set_drive(drive);
        dist.set_mix(1.0);
        dist.reset();
        prop_assert!(dist.process(x).abs() <= 1.0);
    }

    /// Formant interpolation stays between its neighbouring anchors.
    #[test]
    fn formant_interpolation_is_bracketed(position in 0.0f32..4.0) {
        let lo = libm::floorf(position);
        let (f, g) = formant_table(position);
        let (fa, ga) = formant_table(lo);
        let (fb, gb) = formant_table((lo + 1.0).min(4.0));
        for k in 0..5 {
            prop_assert!(f[k] >= fa[k].min(fb[k]) - 1e-2 && f[k] <= fa[k].max(fb[k]) + 1e-2);
            prop_assert!(g[k] >= ga[k].min(gb[k]) - 1e-6 && g[k] <= ga[k].max(gb[k]) + 1e-6);
        }
    }

    /// Every filter type at any resonance stays finite.
    #[test]
    fn filter_is_stable(
        kind in 0usize..5,
        cutoff in 20.0f32..20000.0,
        resonance in 0.0f32..=1.0,
        vowel in 0.0f32..=1.0,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut filter = FilterProcessor::new(44100.0);
        filter.set_filter_type(FilterType::from_index(kind));
        filter.set_cutoff(cutoff);
        filter.set_resonance(resonance);
        filter.set_vowel(vowel);
        for &x in &input {
            let (l, r) = filter.process_stereo(x, x);
            prop_assert!(l.is_finite() && r.is_finite());
        }
    }
}
