//! One block's worth of parameter values, decoded into engine settings.

use howl_config::{HuntMode, Param, ParamStore, ParamValues};
use howl_core::LfoWaveform;
use howl_effects::{EffectParams, FilterType};
use howl_midi::{ArpMode, ArpSettings, ChordMode};
use howl_synth::{AdsrParams, LfoTarget, SampleParams, VoiceParams};

/// Values read from the [`ParamStore`] once per block.
///
/// ```rust
/// use howl_config::{Param, ParamStore};
/// use howl_effects::FilterType;
/// use howl_instrument::ParamSnapshot;
///
/// let store = ParamStore::new();
/// store.set(Param::FilterType, 4.0);
/// let snap = ParamSnapshot::capture(&store);
/// assert_eq!(snap.filter_type(), FilterType::Formant);
/// assert_eq!(snap.voice_params().filter_mode, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    values: ParamValues,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self::capture(&ParamStore::new())
    }
}

impl ParamSnapshot {
    /// Read every value from `store`.
    pub fn capture(store: &ParamStore) -> Self {
        Self {
            values: store.snapshot(),
        }
    }

    /// Wrap raw values.
    pub fn from_values(values: ParamValues) -> Self {
        Self { values }
    }

    /// Raw values in storage order.
    pub fn values(&self) -> &ParamValues {
        &self.values
    }

    /// Plain value of one parameter.
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        self.values[param.index()]
    }

    fn choice(&self, param: Param) -> usize {
        self.get(param).max(0.0) as usize
    }

    fn toggle(&self, param: Param) -> bool {
        self.get(param) >= 0.5
    }

    /// True when any of `params` differs from `other`.
    pub fn differs(&self, other: &Self, params: &[Param]) -> bool {
        params.iter().any(|&p| self.get(p) != other.get(p))
    }

    /// Master output gain.
    pub fn gain(&self) -> f32 {
        self.get(Param::Gain)
    }

    /// Voice pan.
    pub fn pan(&self) -> f32 {
        self.get(Param::Pan)
    }

    /// Selected filter response.
    pub fn filter_type(&self) -> FilterType {
        FilterType::from_index(self.choice(Param::FilterType))
    }

    /// Formant vowel position, 0 (A) to 4 (U).
    pub fn vowel_position(&self) -> f32 {
        self.get(Param::FilterVowel)
    }

    /// Envelope, voice filter and LFO.
    pub fn voice_params(&self) -> VoiceParams {
        VoiceParams {
            envelope: AdsrParams {
                attack: self.get(Param::Attack),
                decay: self.get(Param::Decay),
                sustain: self.get(Param::Sustain),
                release: self.get(Param::Release),
            },
            cutoff: self.get(Param::FilterCutoff),
            resonance: self.get(Param::FilterRes),
            filter_mode: self.filter_type().svf_mode(),
            lfo_rate: self.get(Param::LfoRate),
            lfo_depth: self.get(Param::LfoDepth),
            lfo_waveform: lfo_waveform(self.choice(Param::LfoWave)),
            lfo_target: LfoTarget::from_index(self.choice(Param::LfoTarget)),
        }
    }

    /// Tuning and playback region.
    pub fn sample_params(&self) -> SampleParams {
        SampleParams {
            tune: self.get(Param::SampleTune),
            start: self.get(Param::SampleStart),
            end: self.get(Param::SampleEnd),
            looping: self.toggle(Param::SampleLoop),
        }
    }

    /// Master effects targets.
    pub fn effect_params(&self) -> EffectParams {
        EffectParams {
            dist_drive: self.get(Param::DistDrive),
            dist_mix: self.get(Param::DistMix),
            delay_time: self.get(Param::DelayTime),
            delay_feedback: self.get(Param::DelayFeedback),
            delay_mix: self.get(Param::DelayMix),
            reverb_size: self.get(Param::ReverbSize),
            reverb_damping: self.get(Param::ReverbDamping),
            reverb_mix: self.get(Param::ReverbMix),
            bite: self.get(Param::Bite),
        }
    }

    /// Index into the chain-order presets.
    pub fn chain_preset(&self) -> usize {
        self.choice(Param::ChainOrder)
    }

    /// Arpeggiator controls.
    pub fn arp_settings(&self) -> ArpSettings {
        ArpSettings {
            enabled: self.toggle(Param::ArpEnabled),
            mode: ArpMode::from_index(self.choice(Param::ArpMode)),
            rate: self.get(Param::ArpRate),
            octaves: self.get(Param::ArpOctave).clamp(1.0, 4.0) as u8,
            gate: self.get(Param::ArpGate),
            density: self.get(Param::ArpDensity),
            complexity: self.get(Param::ArpComplexity),
            spread: self.get(Param::ArpSpread),
        }
    }

    /// Chord shape and hold.
    pub fn chord(&self) -> (ChordMode, bool) {
        (
            ChordMode::from_index(self.choice(Param::ChordMode)),
            self.toggle(Param::ChordHold),
        )
    }

    /// Intensity the host last selected for the Hunt.
    pub fn hunt_mode(&self) -> HuntMode {
        HuntMode::from_index(self.choice(Param::HuntMode))
    }
}

fn lfo_waveform(index: usize) -> LfoWaveform {
    match index {
        0 => LfoWaveform::Sine,
        1 => LfoWaveform::Triangle,
        2 => LfoWaveform::Square,
        _ => LfoWaveform::Saw,
    }
}
