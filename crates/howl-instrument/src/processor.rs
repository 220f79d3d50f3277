//! The instrument's block processor.
//!
//! Per block, in order:
//!
//! 1. snapshot the [`ParamStore`] and push changed values into the engines
//! 2. load the published sound bank
//! 3. run host MIDI through chords and the arpeggiator
//! 4. render the voices (output replaces the input buffer)
//! 5. formant filter on the voice sum when the filter type is Formant
//! 6. effects chain
//! 7. smoothed master gain
//!
//! Nothing here allocates once [`HowlingWolves::prepare`] has run, as long
//! as the host stays within the prepared block size and MIDI load.

use std::sync::Arc;

use howl_config::{Param, ParamStore};
use howl_core::{Effect, LinearSmoothedParam, MidiBuffer};
use howl_effects::{EffectsProcessor, FilterProcessor, FilterType};
use howl_midi::{GRID_STEPS, MidiProcessor};
use howl_synth::{SharedSoundBank, SynthEngine};

use crate::config::{InstrumentConfig, Transport, resolve_sample_rate};
use crate::snapshot::ParamSnapshot;

/// Master gain ramp.
const GAIN_RAMP_MS: f32 = 50.0;

/// MIDI events reserved per sample of block size.
const EVENTS_PER_BLOCK_SAMPLE: usize = 1;

/// Minimum MIDI scratch capacity.
const MIN_EVENT_CAPACITY: usize = 256;

const VOICE_PARAMS: &[Param] = &[
    Param::Attack,
    Param::Decay,
    Param::Sustain,
    Param::Release,
    Param::FilterCutoff,
    Param::FilterRes,
    Param::FilterType,
    Param::LfoRate,
    Param::LfoDepth,
    Param::LfoWave,
    Param::LfoTarget,
];

const SAMPLE_PARAMS: &[Param] = &[
    Param::SampleTune,
    Param::SampleStart,
    Param::SampleEnd,
    Param::SampleLoop,
];

const EFFECT_PARAMS: &[Param] = &[
    Param::DistDrive,
    Param::DistMix,
    Param::DelayTime,
    Param::DelayFeedback,
    Param::DelayMix,
    Param::ReverbSize,
    Param::ReverbDamping,
    Param::ReverbMix,
    Param::Bite,
];

const ARP_PARAMS: &[Param] = &[
    Param::ArpEnabled,
    Param::ArpMode,
    Param::ArpRate,
    Param::ArpOctave,
    Param::ArpGate,
    Param::ArpDensity,
    Param::ArpComplexity,
    Param::ArpSpread,
];

/// Howling Wolves: sampler, MIDI generators and master effects.
///
/// # Example
///
/// ```rust
/// use howl_config::Param;
/// use howl_core::{MidiBuffer, MidiMessage};
/// use howl_instrument::{HowlingWolves, InstrumentConfig, Transport};
/// use howl_synth::{Sound, SoundBank};
///
/// let mut wolves = HowlingWolves::new(InstrumentConfig::default());
/// wolves.prepare(48000.0, 256);
/// wolves.sound_bank().publish(SoundBank::new(vec![
///     Sound::new("howl", vec![vec![0.5; 48000]], 48000.0),
/// ]));
/// wolves.params().set(Param::ReverbMix, 0.2);
///
/// let mut midi = MidiBuffer::new();
/// midi.push(0, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 100 });
///
/// let mut left = vec![0.0f32; 256];
/// let mut right = vec![0.0f32; 256];
/// wolves.process(&mut [&mut left[..], &mut right[..]], &midi, &Transport::at(120.0));
/// assert!(left.iter().any(|s| *s != 0.0));
/// ```
#[derive(Debug)]
pub struct HowlingWolves {
    params: Arc<ParamStore>,
    bank: Arc<SharedSoundBank>,
    midi: MidiProcessor,
    synth: SynthEngine,
    formant: FilterProcessor,
    effects: EffectsProcessor,
    gain: LinearSmoothedParam,
    events: MidiBuffer,
    applied: Option<ParamSnapshot>,
    was_playing: bool,
    config: InstrumentConfig,
}

impl HowlingWolves {
    /// Create with its own parameter store and sound bank.
    pub fn new(config: InstrumentConfig) -> Self {
        Self::with_shared(
            config,
            Arc::new(ParamStore::new()),
            Arc::new(SharedSoundBank::new()),
        )
    }

    /// Create around a store and bank shared with control threads.
    pub fn with_shared(
        config: InstrumentConfig,
        params: Arc<ParamStore>,
        bank: Arc<SharedSoundBank>,
    ) -> Self {
        let sample_rate = resolve_sample_rate(config.sample_rate);
        let mut synth = SynthEngine::new(sample_rate);
        synth.set_voice_stealing(config.voice_stealing);
        let mut formant = FilterProcessor::new(sample_rate);
        formant.set_filter_type(FilterType::Formant);
        let gain = params.get(Param::Gain);

        Self {
            params,
            bank,
            midi: MidiProcessor::new(sample_rate),
            synth,
            formant,
            effects: EffectsProcessor::with_max_delay(sample_rate, config.max_delay_secs),
            gain: LinearSmoothedParam::with_config(gain, sample_rate, GAIN_RAMP_MS),
            events: MidiBuffer::with_capacity(event_capacity(config.max_block)),
            applied: None,
            was_playing: true,
            config: InstrumentConfig {
                sample_rate,
                ..config
            },
        }
    }

    /// Parameter store read at the start of every block.
    pub fn params(&self) -> &Arc<ParamStore> {
        &self.params
    }

    /// Bank handle the sample loader publishes to.
    pub fn sound_bank(&self) -> &Arc<SharedSoundBank> {
        &self.bank
    }

    /// Settings in force.
    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    /// The voice engine.
    pub fn synth(&self) -> &SynthEngine {
        &self.synth
    }

    /// The MIDI pipeline.
    pub fn midi_processor(&self) -> &MidiProcessor {
        &self.midi
    }

    /// The master effects.
    pub fn effects(&self) -> &EffectsProcessor {
        &self.effects
    }

    /// Size everything for a sample rate and block size, and clear all state.
    ///
    /// A non-finite or non-positive rate falls back to 44.1 kHz.
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize) {
        let sample_rate = resolve_sample_rate(sample_rate);
        self.config.sample_rate = sample_rate;
        self.config.max_block = max_block;

        self.midi.prepare(sample_rate);
        self.synth.prepare(sample_rate);
        self.formant.set_sample_rate(sample_rate);
        self.formant.reset();
        self.gain.set_sample_rate(sample_rate);
        self.events = MidiBuffer::with_capacity(event_capacity(max_block));
        self.applied = None;
        self.apply_params();
        // snaps the effect smoothers to the targets just pushed
        self.effects.prepare(sample_rate);
        self.gain.snap_to_target();

        tracing::debug!(sample_rate, max_block, "instrument prepared");
    }

    /// Silence every voice, clear effect tails and drop arpeggio state.
    pub fn reset(&mut self) {
        self.midi.reset();
        self.synth.reset();
        self.formant.reset();
        self.effects.reset();
        self.gain.snap_to_target();
    }

    /// Replace the step-sequencer grid. Missing trailing steps become rests.
    pub fn set_rhythm(&mut self, steps: impl IntoIterator<Item = Option<u8>>) {
        let arp = self.midi.arpeggiator_mut();
        arp.clear_rhythm();
        for (index, degree) in steps.into_iter().take(GRID_STEPS).enumerate() {
            arp.set_rhythm_step(index, degree);
        }
    }

    /// Render one block in place.
    ///
    /// `channels` holds one (mono) or two (stereo) planar buffers; extra
    /// channels are left untouched. Incoming audio is discarded.
    pub fn process(&mut self, channels: &mut [&mut [f32]], midi: &MidiBuffer, transport: &Transport) {
        let (used, _) = channels.split_at_mut(channels.len().min(2));
        if used.is_empty() {
            return;
        }
        let len = used.iter().map(|c| c.len()).min().unwrap_or(0);

        if self.was_playing && !transport.playing {
            self.midi.reset();
            self.synth.all_notes_off(true);
        }
        self.was_playing = transport.playing;

        self.apply_params();
        self.synth.set_sound_bank(self.bank.load_full());

        self.events.clear();
        for event in midi {
            self.events.push_event(*event);
        }
        self.midi.process(&mut self.events, len, transport.bpm);

        for channel in used.iter_mut() {
            channel[..len].fill(0.0);
        }
        self.synth.render(used, &self.events);

        if self.formant_enabled() {
            self.run_formant(used, len);
        }
        self.effects.process(used);
        self.apply_gain(used, len);
    }

    fn formant_enabled(&self) -> bool {
        self.applied
            .is_some_and(|snap| snap.filter_type() == FilterType::Formant)
    }

    /// Push whatever changed since the last block into the engines.
    fn apply_params(&mut self) {
        let snap = ParamSnapshot::capture(&self.params);
        let previous = self.applied;
        let changed = |params: &[Param]| previous.is_none_or(|prev| snap.differs(&prev, params));

        if changed(VOICE_PARAMS) {
            self.synth.update_params(&snap.voice_params());
        }
        if changed(SAMPLE_PARAMS) {
            self.synth.update_sample_params(&snap.sample_params());
        }
        if changed(&[Param::Pan]) {
            self.synth.set_pan(snap.pan());
        }
        if changed(EFFECT_PARAMS) {
            self.effects.update_parameters(&snap.effect_params());
        }
        if changed(&[Param::ChainOrder]) {
            self.effects.set_chain_preset(snap.chain_preset());
        }
        if changed(&[Param::FilterType, Param::FilterRes, Param::FilterVowel]) {
            let entering = snap.filter_type() == FilterType::Formant
                && previous.is_some_and(|prev| prev.filter_type() != FilterType::Formant);
            if entering {
                self.formant.reset();
            }
            self.formant.set_resonance(snap.get(Param::FilterRes));
            self.formant.set_vowel(snap.vowel_position() / 4.0);
        }
        if changed(ARP_PARAMS) {
            self.midi.set_arp(snap.arp_settings());
        }
        if changed(&[Param::ChordMode, Param::ChordHold]) {
            let (mode, hold) = snap.chord();
            self.midi.set_chord(mode, hold);
        }
        self.gain.set_target(snap.gain());
        self.applied = Some(snap);
    }

    fn run_formant(&mut self, channels: &mut [&mut [f32]], len: usize) {
        match channels {
            [mono] => {
                for sample in mono[..len].iter_mut() {
                    let out = self.formant.process(*sample);
                    *sample = if out.is_finite() {
                        out
                    } else {
                        self.formant.reset();
                        0.0
                    };
                }
            }
            [left, right, ..] => {
                for (l, r) in left[..len].iter_mut().zip(right[..len].iter_mut()) {
                    let (out_l, out_r) = self.formant.process_stereo(*l, *r);
                    if out_l.is_finite() && out_r.is_finite() {
                        *l = out_l;
                        *r = out_r;
                    } else {
                        self.formant.reset();
                        *l = 0.0;
                        *r = 0.0;
                    }
                }
            }
            [] => {}
        }
    }

    fn apply_gain(&mut self, channels: &mut [&mut [f32]], len: usize) {
        for i in 0..len {
            let gain = self.gain.advance();
            for channel in channels.iter_mut() {
                channel[i] *= gain;
            }
        }
    }
}

fn event_capacity(max_block: usize) -> usize {
    (max_block * EVENTS_PER_BLOCK_SAMPLE).max(MIN_EVENT_CAPACITY)
}
