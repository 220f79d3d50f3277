//! Hunt: categorized stochastic parameter randomization.
//!
//! Parameters are sorted into categories by case-insensitive substring of
//! their id. Each category is mutated with its own probability, by a
//! uniform offset of up to `variation` times the parameter's full range.
//!
//! | category | id contains                          | chance                  |
//! |----------|--------------------------------------|-------------------------|
//! | Filter   | `filter`                             | p                       |
//! | Envelope | `attack` `decay` `sustain` `release` | always on Kill, else p/2|
//! | Effects  | `dist` `delay` `reverb` `bite`       | p                       |
//! | Lfo      | `lfo`                                | p                       |
//! | Sample   | `sample` `tune`                      | Kill only               |
//!
//! Anything else, and anything on the exclusion list, is left alone.

use std::time::{SystemTime, UNIX_EPOCH};

use howl_core::ParamDescriptor;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::param::Param;
use crate::store::ParamStore;

/// Ids skipped by default.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["gain"];

/// How hard to hunt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HuntMode {
    /// Small drift on a few parameters.
    #[default]
    Stalk,
    /// Moderate changes on most parameters.
    Chase,
    /// Full-range randomization of everything categorized.
    Kill,
}

impl HuntMode {
    /// Map a choice index; out-of-range values clamp to [`HuntMode::Kill`].
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => HuntMode::Stalk,
            1 => HuntMode::Chase,
            _ => HuntMode::Kill,
        }
    }

    /// Largest offset as a fraction of the parameter range.
    pub fn variation(self) -> f32 {
        match self {
            HuntMode::Stalk => 0.05,
            HuntMode::Chase => 0.3,
            HuntMode::Kill => 1.0,
        }
    }

    /// Base probability of touching a parameter.
    pub fn probability(self) -> f64 {
        match self {
            HuntMode::Stalk => 0.3,
            HuntMode::Chase => 0.6,
            HuntMode::Kill => 1.0,
        }
    }
}

impl std::str::FromStr for HuntMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stalk" => Ok(HuntMode::Stalk),
            "chase" => Ok(HuntMode::Chase),
            "kill" => Ok(HuntMode::Kill),
            other => Err(format!("unknown hunt mode '{other}' (stalk, chase, kill)")),
        }
    }
}

/// Which rule a parameter is hunted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntCategory {
    /// Filter settings.
    Filter,
    /// Amplitude envelope.
    Envelope,
    /// Master effects.
    Effects,
    /// Modulation.
    Lfo,
    /// Sample region and tuning.
    Sample,
}

impl HuntCategory {
    /// Classify an id. First match wins, in table order.
    ///
    /// ```rust
    /// use howl_config::HuntCategory;
    ///
    /// assert_eq!(HuntCategory::of("filterCutoff"), Some(HuntCategory::Filter));
    /// assert_eq!(HuntCategory::of("BITE"), Some(HuntCategory::Effects));
    /// assert_eq!(HuntCategory::of("sampleTune"), Some(HuntCategory::Sample));
    /// assert_eq!(HuntCategory::of("arpRate"), None);
    /// ```
    pub fn of(id: &str) -> Option<Self> {
        let id = id.to_ascii_lowercase();
        let any = |keys: &[&str]| keys.iter().any(|k| id.contains(k));
        if any(&["filter"]) {
            Some(HuntCategory::Filter)
        } else if any(&["attack", "decay", "sustain", "release"]) {
            Some(HuntCategory::Envelope)
        } else if any(&["dist", "delay", "reverb", "bite"]) {
            Some(HuntCategory::Effects)
        } else if any(&["lfo"]) {
            Some(HuntCategory::Lfo)
        } else if any(&["sample", "tune"]) {
            Some(HuntCategory::Sample)
        } else {
            None
        }
    }

    /// Chance this category is touched in `mode`.
    pub fn probability(self, mode: HuntMode) -> f64 {
        let p = mode.probability();
        match (self, mode) {
            (HuntCategory::Envelope, HuntMode::Kill) => 1.0,
            (HuntCategory::Envelope, _) => p * 0.5,
            (HuntCategory::Sample, HuntMode::Kill) => 1.0,
            (HuntCategory::Sample, _) => 0.0,
            _ => p,
        }
    }
}

/// A collection of ranged parameters the Hunt can work on.
pub trait ParamSet {
    /// Number of parameters.
    fn param_count(&self) -> usize;
    /// Descriptor of parameter `index`.
    fn descriptor(&self, index: usize) -> &ParamDescriptor;
    /// Current plain value.
    fn value(&self, index: usize) -> f32;
    /// Replace the plain value.
    fn set_value(&mut self, index: usize, value: f32);
}

impl ParamSet for &ParamStore {
    fn param_count(&self) -> usize {
        Param::ALL.len()
    }

    fn descriptor(&self, index: usize) -> &ParamDescriptor {
        Param::ALL[index].descriptor()
    }

    fn value(&self, index: usize) -> f32 {
        self.get(Param::ALL[index])
    }

    fn set_value(&mut self, index: usize, value: f32) {
        self.set(Param::ALL[index], value);
    }
}

impl ParamSet for [(ParamDescriptor, f32)] {
    fn param_count(&self) -> usize {
        self.len()
    }

    fn descriptor(&self, index: usize) -> &ParamDescriptor {
        &self[index].0
    }

    fn value(&self, index: usize) -> f32 {
        self[index].1
    }

    fn set_value(&mut self, index: usize, value: f32) {
        self[index].1 = value;
    }
}

/// One mutated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct HuntChange {
    /// Parameter id.
    pub id: &'static str,
    /// Category it was hunted under.
    pub category: HuntCategory,
    /// Value before.
    pub from: f32,
    /// Value after.
    pub to: f32,
}

/// What a hunt touched.
#[derive(Debug, Clone, PartialEq)]
pub struct HuntReport {
    /// Mode used.
    pub mode: HuntMode,
    /// Mutated parameters in table order.
    pub changes: Vec<HuntChange>,
}

impl HuntReport {
    /// Ids of every mutated parameter.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changes.iter().map(|c| c.id)
    }

    /// Number of mutated parameters.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// True when nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Seeded randomizer.
#[derive(Debug, Clone)]
pub struct HuntEngine {
    rng: SmallRng,
    exclusions: Vec<String>,
}

impl Default for HuntEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HuntEngine {
    /// Seed from the system clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x4855_4e54);
        Self::with_seed(seed)
    }

    /// Reproducible engine.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Replace the exclusion list. Ids are matched exactly.
    #[must_use]
    pub fn with_exclusions<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Ids left alone.
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// Hunt over any parameter collection.
    pub fn hunt<P: ParamSet + ?Sized>(&mut self, params: &mut P, mode: HuntMode) -> HuntReport {
        let mut changes = Vec::new();
        for index in 0..params.param_count() {
            let desc = *params.descriptor(index);
            if self.exclusions.iter().any(|e| e == desc.id) {
                continue;
            }
            let Some(category) = HuntCategory::of(desc.id) else {
                continue;
            };
            let chance = category.probability(mode);
            if chance <= 0.0 || !self.rng.random_bool(chance.min(1.0)) {
                continue;
            }

            let from = params.value(index);
            let delta = (desc.max - desc.min) * mode.variation();
            let offset = if delta > 0.0 {
                self.rng.random_range(-delta..=delta)
            } else {
                0.0
            };
            let to = desc.quantize(from + offset);
            params.set_value(index, to);
            changes.push(HuntChange {
                id: desc.id,
                category,
                from,
                to,
            });
        }

        tracing::debug!(mode = ?mode, mutated = changes.len(), "hunt complete");
        HuntReport { mode, changes }
    }

    /// Hunt over the instrument's parameter store.
    pub fn hunt_store(&mut self, store: &ParamStore, mode: HuntMode) -> HuntReport {
        let mut target = store;
        self.hunt(&mut target, mode)
    }
}
