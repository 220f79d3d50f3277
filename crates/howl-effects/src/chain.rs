//! Reorderable master effects chain.
//!
//! [`EffectsProcessor`] owns one instance of each stage and runs them in the
//! order held by a fixed-size list of [`EffectStage`] identifiers. Any
//! duplicate-free subset is a valid order; stages left out do not run.
//!
//! Every sample a stage produces is checked. A non-finite value resets that
//! stage and is replaced by silence for the tick, so one blown-up delay line
//! cannot poison the rest of the chain.

use howl_core::Effect;

use crate::{Delay, Distortion, Reverb, TransientShaper};

/// Number of distinct stages.
pub const STAGE_COUNT: usize = 4;

/// One slot of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectStage {
    /// Tanh waveshaper.
    Distortion,
    /// Bite.
    TransientShaper,
    /// Feedback delay.
    Delay,
    /// Freeverb.
    Reverb,
}

/// Named orderings selectable by index.
pub const CHAIN_PRESETS: [[EffectStage; STAGE_COUNT]; 6] = {
    use EffectStage::{Delay as Dly, Distortion as Dist, Reverb as Rev, TransientShaper as Bite};
    [
        [Dist, Bite, Dly, Rev],
        [Bite, Dist, Dly, Rev],
        [Dist, Bite, Rev, Dly],
        [Dly, Rev, Dist, Bite],
        [Rev, Dly, Bite, Dist],
        [Bite, Dly, Dist, Rev],
    ]
};

/// Default ordering: Distortion → Bite → Delay → Reverb.
pub const DEFAULT_ORDER: [EffectStage; STAGE_COUNT] = CHAIN_PRESETS[0];

/// Target values for every stage, pushed once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// Distortion drive, 0..1.
    pub dist_drive: f32,
    /// Distortion wet proportion, 0..1.
    pub dist_mix: f32,
    /// Delay time in seconds.
    pub delay_time: f32,
    /// Delay feedback, 0..0.95.
    pub delay_feedback: f32,
    /// Delay echo level, 0..1.
    pub delay_mix: f32,
    /// Reverb room size, 0..1.
    pub reverb_size: f32,
    /// Reverb damping, 0..1.
    pub reverb_damping: f32,
    /// Reverb wet level, 0..1.
    pub reverb_mix: f32,
    /// Transient shaper amount, -1..1.
    pub bite: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            dist_drive: 0.0,
            dist_mix: 0.0,
            delay_time: 0.5,
            delay_feedback: 0.3,
            delay_mix: 0.0,
            reverb_size: 0.5,
            reverb_damping: 0.5,
            reverb_mix: 0.0,
            bite: 0.0,
        }
    }
}

/// The master effects chain.
///
/// # Example
///
/// ```rust
/// use howl_effects::{EffectParams, EffectStage, EffectsProcessor};
///
/// let mut fx = EffectsProcessor::new(48000.0);
/// fx.set_chain_order(&[EffectStage::Reverb, EffectStage::Distortion]);
/// fx.update_parameters(&EffectParams { dist_mix: 1.0, dist_drive: 0.2, ..Default::default() });
/// fx.reset();
///
/// let mut left = vec![0.1f32; 64];
/// let mut right = vec![-0.1f32; 64];
/// fx.process_stereo(&mut left, &mut right);
/// assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct EffectsProcessor {
    distortion: Distortion,
    transient: TransientShaper,
    delay: Delay,
    reverb: Reverb,
    order: [EffectStage; STAGE_COUNT],
    order_len: usize,
}

impl EffectsProcessor {
    /// Create with the default order and a 2 s delay line.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_max_delay(sample_rate, crate::delay::DEFAULT_MAX_DELAY_SECS)
    }

    /// Create with a custom delay-line length.
    pub fn with_max_delay(sample_rate: f32, max_delay_secs: f32) -> Self {
        Self {
            distortion: Distortion::new(sample_rate),
            transient: TransientShaper::new(sample_rate),
            delay: Delay::with_max_delay(sample_rate, max_delay_secs),
            reverb: Reverb::new(sample_rate),
            order: DEFAULT_ORDER,
            order_len: STAGE_COUNT,
        }
    }

    /// Re-initialize for a new sample rate. Smoothers snap to their targets.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.distortion.set_sample_rate(sample_rate);
        self.transient.set_sample_rate(sample_rate);
        self.delay.set_sample_rate(sample_rate);
        self.reverb.set_sample_rate(sample_rate);
        self.reset();
    }

    /// Clear every stage's state.
    pub fn reset(&mut self) {
        self.distortion.reset();
        self.transient.reset();
        self.delay.reset();
        self.reverb.reset();
    }

    /// Push new targets. Reverb settings apply instantly, the rest ramp.
    pub fn update_parameters(&mut self, params: &EffectParams) {
        self.distortion.set_drive(params.dist_drive);
        self.distortion.set_mix(params.dist_mix);
        self.transient.set_bite(params.bite);
        self.delay.set_time(params.delay_time);
        self.delay.set_feedback(params.delay_feedback);
        self.delay.set_mix(params.delay_mix);
        self.reverb.set_room_size(params.reverb_size);
        self.reverb.set_damping(params.reverb_damping);
        self.reverb.set_mix(params.reverb_mix);
    }

    /// Replace the order. Later duplicates are dropped; an empty list
    /// disables the chain.
    pub fn set_chain_order(&mut self, stages: &[EffectStage]) {
        let mut len = 0;
        for &stage in stages {
            if len < STAGE_COUNT && !self.order[..len].contains(&stage) {
                self.order[len] = stage;
                len += 1;
            }
        }
        self.order_len = len;
    }

    /// Select one of [`CHAIN_PRESETS`]; out-of-range indices clamp.
    pub fn set_chain_preset(&mut self, index: usize) {
        let preset = CHAIN_PRESETS[index.min(CHAIN_PRESETS.len() - 1)];
        self.set_chain_order(&preset);
    }

    /// Current order.
    pub fn chain_order(&self) -> &[EffectStage] {
        &self.order[..self.order_len]
    }

    /// Reverb settings currently in force.
    pub fn reverb_parameters(&self) -> crate::ReverbParameters {
        self.reverb.parameters()
    }

    fn stage_mut(&mut self, stage: EffectStage) -> &mut dyn Effect {
        match stage {
            EffectStage::Distortion => &mut self.distortion,
            EffectStage::TransientShaper => &mut self.transient,
            EffectStage::Delay => &mut self.delay,
            EffectStage::Reverb => &mut self.reverb,
        }
    }

    fn is_bypassed(&self, stage: EffectStage) -> bool {
        stage == EffectStage::Reverb && self.reverb.is_silent()
    }

    /// Run the chain over a stereo pair in place.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for i in 0..self.order_len {
            let stage = self.order[i];
            if self.is_bypassed(stage) {
                continue;
            }
            let effect = self.stage_mut(stage);
            for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                let (out_l, out_r) = effect.process_stereo(*l, *r);
                if out_l.is_finite() && out_r.is_finite() {
                    *l = out_l;
                    *r = out_r;
                } else {
                    effect.reset();
                    *l = 0.0;
                    *r = 0.0;
                }
            }
        }
    }

    /// Run the chain over a mono buffer in place.
    pub fn process_mono(&mut self, buffer: &mut [f32]) {
        for i in 0..self.order_len {
            let stage = self.order[i];
            if self.is_bypassed(stage) {
                continue;
            }
            let effect = self.stage_mut(stage);
            for sample in buffer.iter_mut() {
                let out = effect.process(*sample);
                if out.is_finite() {
                    *sample = out;
                } else {
                    effect.reset();
                    *sample = 0.0;
                }
            }
        }
    }

    /// Run the chain over planar channels in place. Only the first two
    /// channels are processed.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        match channels {
            [] => {}
            [mono] => self.process_mono(mono),
            [left, right, ..] => self.process_stereo(left, right),
        }
    }
}
