//! Linear ADSR envelope generator.
//!
//! Times are in seconds. Attack and decay are linear ramps; release is a
//! linear ramp from whatever level the envelope held at gate-off down to
//! zero, so a release always takes exactly the configured time.
//!
//! Segments with a zero time are skipped: zero attack jumps straight to the
//! peak, zero release stops the envelope on gate-off.

/// ADSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Envelope is inactive, output is zero.
    #[default]
    Idle,
    /// Ramping up toward 1.
    Attack,
    /// Falling from 1 toward the sustain level.
    Decay,
    /// Holding the sustain level while the gate is held.
    Sustain,
    /// Ramping down to zero after gate release.
    Release,
}

/// Attack, decay and release in seconds, sustain as a level in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.1,
        }
    }
}

impl AdsrParams {
    /// Gate-shaped envelope used to declick sample playback: sustain 1, no
    /// decay.
    pub fn declick(attack: f32, release: f32) -> Self {
        Self {
            attack,
            decay: 0.0,
            sustain: 1.0,
            release,
        }
    }
}

/// ADSR envelope generator.
///
/// # Example
///
/// ```rust
/// use howl_synth::{AdsrEnvelope, AdsrParams, EnvelopeState};
///
/// let mut env = AdsrEnvelope::new(1000.0);
/// env.set_parameters(AdsrParams { attack: 0.01, decay: 0.0, sustain: 0.5, release: 0.02 });
///
/// env.gate_on();
/// for _ in 0..12 {
///     env.advance();
/// }
/// assert_eq!(env.state(), EnvelopeState::Sustain);
///
/// env.gate_off();
/// for _ in 0..25 {
///     env.advance();
/// }
/// assert!(!env.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    state: EnvelopeState,
    level: f32,
    sample_rate: f32,
    params: AdsrParams,

    // per-sample increments, zero when the segment is skipped
    attack_rate: f32,
    decay_rate: f32,
    // fixed at gate-off from the level held at that moment
    release_rate: f32,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl AdsrEnvelope {
    /// Create an idle envelope with [`AdsrParams::default`].
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            sample_rate,
            params: AdsrParams::default(),
            attack_rate: 0.0,
            decay_rate: 0.0,
            release_rate: 0.0,
        };
        env.recalculate_rates();
        env
    }

    /// Replace all four parameters. Negative times count as zero and the
    /// sustain level is clamped to [0, 1].
    pub fn set_parameters(&mut self, params: AdsrParams) {
        self.params = AdsrParams {
            attack: params.attack.max(0.0),
            decay: params.decay.max(0.0),
            sustain: params.sustain.clamp(0.0, 1.0),
            release: params.release.max(0.0),
        };
        self.recalculate_rates();
        if self.state == EnvelopeState::Sustain {
            self.level = self.params.sustain;
        }
    }

    /// Current parameters.
    pub fn parameters(&self) -> AdsrParams {
        self.params
    }

    /// Set sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_rates();
    }

    /// Note on. The level is not reset, so a retrigger ramps up from where
    /// the envelope currently is.
    pub fn gate_on(&mut self) {
        if self.attack_rate > 0.0 {
            self.state = EnvelopeState::Attack;
        } else if self.decay_rate > 0.0 {
            self.level = 1.0;
            self.state = EnvelopeState::Decay;
        } else {
            self.level = self.params.sustain;
            self.state = EnvelopeState::Sustain;
        }
    }

    /// Note off. With a zero release the envelope stops at once.
    pub fn gate_off(&mut self) {
        if self.state == EnvelopeState::Idle {
            return;
        }
        let release_samples = self.params.release * self.sample_rate;
        if release_samples > 0.0 {
            self.release_rate = self.level / release_samples;
            self.state = EnvelopeState::Release;
        } else {
            self.reset();
        }
    }

    /// Force envelope to idle state.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
    }

    /// Get current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Get current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Check if envelope is active (not idle).
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Advance envelope by one sample and return current level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => {}

            EnvelopeState::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    if self.decay_rate > 0.0 {
                        self.state = EnvelopeState::Decay;
                    } else {
                        self.level = self.params.sustain;
                        self.state = EnvelopeState::Sustain;
                    }
                }
            }

            EnvelopeState::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.params.sustain {
                    self.level = self.params.sustain;
                    self.state = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.params.sustain;
            }

            EnvelopeState::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.reset();
                }
            }
        }

        self.level
    }

    fn recalculate_rates(&mut self) {
        let rate = |span: f32, seconds: f32| {
            let samples = seconds * self.sample_rate;
            if samples > 0.0 { span / samples } else { 0.0 }
        };
        self.attack_rate = rate(1.0, self.params.attack);
        self.decay_rate = rate(1.0 - self.params.sustain, self.params.decay);
    }
}
