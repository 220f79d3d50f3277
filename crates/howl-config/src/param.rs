//! The instrument's host-visible parameter layout.
//!
//! Every parameter has a [`Param`] variant, a stable string id (used in
//! presets and by the Hunt categorizer) and a [`ParamDescriptor`] giving its
//! range, default and step. The order of [`Param::ALL`] is the storage order
//! of [`ParamStore`](crate::ParamStore).

use howl_core::{ParamDescriptor, ParamScale, ParamUnit};

/// Number of parameters.
pub const PARAM_COUNT: usize = 39;

/// Every host-visible parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    /// Master output gain.
    Gain,
    /// Voice pan.
    Pan,
    /// Amplitude attack.
    Attack,
    /// Amplitude decay.
    Decay,
    /// Amplitude sustain level.
    Sustain,
    /// Amplitude release.
    Release,
    /// Filter cutoff.
    FilterCutoff,
    /// Filter resonance.
    FilterRes,
    /// Filter type: LowPass, HighPass, BandPass, Notch, Formant.
    FilterType,
    /// Formant vowel position, A=0 through U=4.
    FilterVowel,
    /// LFO rate.
    LfoRate,
    /// LFO depth.
    LfoDepth,
    /// LFO waveform: Sine, Triangle, Square, Saw.
    LfoWave,
    /// LFO destination: Cutoff, Volume, Pan, Pitch.
    LfoTarget,
    /// Sample tuning.
    SampleTune,
    /// Sample region start.
    SampleStart,
    /// Sample region end.
    SampleEnd,
    /// Loop the sample region.
    SampleLoop,
    /// Distortion drive.
    DistDrive,
    /// Distortion wet/dry.
    DistMix,
    /// Delay time.
    DelayTime,
    /// Delay feedback.
    DelayFeedback,
    /// Delay wet level.
    DelayMix,
    /// Reverb room size.
    ReverbSize,
    /// Reverb damping.
    ReverbDamping,
    /// Reverb wet/dry.
    ReverbMix,
    /// Transient shaper amount.
    Bite,
    /// Hunt intensity: Stalk, Chase, Kill.
    HuntMode,
    /// Effects chain ordering preset.
    ChainOrder,
    /// Classic arpeggio on/off.
    ArpEnabled,
    /// Arpeggio walk order: Up, Down, UpDown, Random.
    ArpMode,
    /// Arpeggio step rate.
    ArpRate,
    /// Arpeggio octave span.
    ArpOctave,
    /// Arpeggio gate length.
    ArpGate,
    /// Arpeggio density (stored only).
    ArpDensity,
    /// Arpeggio complexity (stored only).
    ArpComplexity,
    /// Arpeggio spread (stored only).
    ArpSpread,
    /// Chord shape: Off, Major, Minor, Seventh, Ninth.
    ChordMode,
    /// Chord hold.
    ChordHold,
}

static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    // Master
    ParamDescriptor::new("gain", "Gain", 0.0, 1.0, 0.8).with_group("Master"),
    ParamDescriptor::new("pan", "Pan", -1.0, 1.0, 0.0).with_group("Master"),
    // Envelope
    ParamDescriptor::new("attack", "Attack", 0.001, 5.0, 0.01)
        .with_unit(ParamUnit::Seconds)
        .with_scale(ParamScale::Logarithmic)
        .with_group("Envelope"),
    ParamDescriptor::new("decay", "Decay", 0.001, 5.0, 0.1)
        .with_unit(ParamUnit::Seconds)
        .with_scale(ParamScale::Logarithmic)
        .with_group("Envelope"),
    ParamDescriptor::new("sustain", "Sustain", 0.0, 1.0, 0.8).with_group("Envelope"),
    ParamDescriptor::new("release", "Release", 0.001, 10.0, 0.3)
        .with_unit(ParamUnit::Seconds)
        .with_scale(ParamScale::Logarithmic)
        .with_group("Envelope"),
    // Filter
    ParamDescriptor::new("filterCutoff", "Cutoff", 20.0, 20000.0, 20000.0)
        .with_unit(ParamUnit::Hertz)
        .with_scale(ParamScale::Logarithmic)
        .with_group("Filter"),
    ParamDescriptor::new("filterRes", "Resonance", 0.0, 1.0, 0.0).with_group("Filter"),
    ParamDescriptor::choice("filterType", "Filter Type", 5, 0).with_group("Filter"),
    ParamDescriptor::new("filterVowel", "Vowel", 0.0, 4.0, 0.0).with_group("Filter"),
    // LFO
    ParamDescriptor::new("lfoRate", "LFO Rate", 0.01, 20.0, 1.0)
        .with_unit(ParamUnit::Hertz)
        .with_scale(ParamScale::Logarithmic)
        .with_group("LFO"),
    ParamDescriptor::new("lfoDepth", "LFO Depth", 0.0, 1.0, 0.0).with_group("LFO"),
    ParamDescriptor::choice("lfoWave", "LFO Wave", 4, 0).with_group("LFO"),
    ParamDescriptor::choice("lfoTarget", "LFO Target", 4, 0).with_group("LFO"),
    // Sample
    ParamDescriptor::new("sampleTune", "Tune", -24.0, 24.0, 0.0)
        .with_unit(ParamUnit::Semitones)
        .with_group("Sample"),
    ParamDescriptor::new("sampleStart", "Start", 0.0, 1.0, 0.0).with_group("Sample"),
    ParamDescriptor::new("sampleEnd", "End", 0.0, 1.0, 1.0).with_group("Sample"),
    ParamDescriptor::toggle("sampleLoop", "Loop", false).with_group("Sample"),
    // Effects
    ParamDescriptor::new("distDrive", "Drive", 0.0, 1.0, 0.0).with_group("Effects"),
    ParamDescriptor::new("distMix", "Dist Mix", 0.0, 1.0, 0.0).with_group("Effects"),
    ParamDescriptor::new("delayTime", "Delay Time", 0.01, 2.0, 0.25)
        .with_unit(ParamUnit::Seconds)
        .with_group("Effects"),
    ParamDescriptor::new("delayFeedback", "Feedback", 0.0, 0.95, 0.3).with_group("Effects"),
    ParamDescriptor::new("delayMix", "Delay Mix", 0.0, 1.0, 0.0).with_group("Effects"),
    ParamDescriptor::new("reverbSize", "Size", 0.0, 1.0, 0.5).with_group("Effects"),
    ParamDescriptor::new("reverbDamping", "Damping", 0.0, 1.0, 0.5).with_group("Effects"),
    ParamDescriptor::new("reverbMix", "Reverb Mix", 0.0, 1.0, 0.0).with_group("Effects"),
    ParamDescriptor::new("BITE", "Bite", -1.0, 1.0, 0.0).with_group("Effects"),
    ParamDescriptor::choice("HUNT_MODE", "Hunt Mode", 3, 0).with_group("Hunt"),
    ParamDescriptor::choice("CHAIN_ORDER", "Chain Order", 6, 0).with_group("Effects"),
    // Arpeggiator
    ParamDescriptor::toggle("arpEnabled", "Arp", false).with_group("Arp"),
    ParamDescriptor::choice("arpMode", "Arp Mode", 4, 0).with_group("Arp"),
    ParamDescriptor::new("arpRate", "Arp Rate", 0.0, 1.0, 0.5).with_group("Arp"),
    ParamDescriptor::new("arpOctave", "Octaves", 1.0, 4.0, 1.0)
        .with_step(1.0)
        .with_group("Arp"),
    ParamDescriptor::new("arpGate", "Gate", 0.0, 1.0, 0.5).with_group("Arp"),
    ParamDescriptor::new("arpDensity", "Density", 0.0, 1.0, 0.5).with_group("Arp"),
    ParamDescriptor::new("arpComplexity", "Complexity", 0.0, 1.0, 0.5).with_group("Arp"),
    ParamDescriptor::new("arpSpread", "Spread", 0.0, 1.0, 0.5).with_group("Arp"),
    // Chord
    ParamDescriptor::choice("chordMode", "Chord", 5, 0).with_group("Chord"),
    ParamDescriptor::toggle("chordHold", "Hold", false).with_group("Chord"),
];

impl Param {
    /// Every parameter in storage order.
    pub const ALL: [Param; PARAM_COUNT] = [
        Param::Gain,
        Param::Pan,
        Param::Attack,
        Param::Decay,
        Param::Sustain,
        Param::Release,
        Param::FilterCutoff,
        Param::FilterRes,
        Param::FilterType,
        Param::FilterVowel,
        Param::LfoRate,
        Param::LfoDepth,
        Param::LfoWave,
        Param::LfoTarget,
        Param::SampleTune,
        Param::SampleStart,
        Param::SampleEnd,
        Param::SampleLoop,
        Param::DistDrive,
        Param::DistMix,
        Param::DelayTime,
        Param::DelayFeedback,
        Param::DelayMix,
        Param::ReverbSize,
        Param::ReverbDamping,
        Param::ReverbMix,
        Param::Bite,
        Param::HuntMode,
        Param::ChainOrder,
        Param::ArpEnabled,
        Param::ArpMode,
        Param::ArpRate,
        Param::ArpOctave,
        Param::ArpGate,
        Param::ArpDensity,
        Param::ArpComplexity,
        Param::ArpSpread,
        Param::ChordMode,
        Param::ChordHold,
    ];

    /// Storage index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Range, default and identity.
    #[inline]
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Stable string id.
    #[inline]
    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Default plain value.
    #[inline]
    pub fn default_value(self) -> f32 {
        self.descriptor().default
    }

    /// Parameter at a storage index.
    pub fn from_index(index: usize) -> Option<Param> {
        Self::ALL.get(index).copied()
    }

    /// Look up by id. Matching is exact.
    pub fn from_id(id: &str) -> Option<Param> {
        Self::ALL.iter().copied().find(|p| p.id() == id)
    }
}

/// All descriptors in storage order.
pub fn descriptors() -> &'static [ParamDescriptor; PARAM_COUNT] {
    &DESCRIPTORS
}
