//! Static descriptions of host-visible parameters.
//!
//! A [`ParamDescriptor`] carries everything a host, preset file or the Hunt
//! randomizer needs to know about one parameter: a stable string id, a
//! display name, the plain range and default, an optional step for discrete
//! parameters, and the curve used to map to and from normalized [0, 1].
//!
//! ```rust
//! use howl_core::{ParamDescriptor, ParamScale, ParamUnit};
//!
//! const CUTOFF: ParamDescriptor =
//!     ParamDescriptor::new("filterCutoff", "Filter Cutoff", 20.0, 20000.0, 20000.0)
//!         .with_unit(ParamUnit::Hertz)
//!         .with_scale(ParamScale::Logarithmic);
//!
//! assert_eq!(CUTOFF.clamp(5.0), 20.0);
//! assert!((CUTOFF.denormalize(CUTOFF.normalize(1000.0)) - 1000.0).abs() < 0.1);
//! ```

/// Mapping curve between plain and normalized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// `(value - min) / (max - min)`.
    #[default]
    Linear,
    /// `ln(value / min) / ln(max / min)`. Requires `min > 0`.
    Logarithmic,
}

/// Display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamUnit {
    /// Dimensionless.
    #[default]
    None,
    /// Seconds.
    Seconds,
    /// Hertz.
    Hertz,
    /// Semitones.
    Semitones,
}

impl ParamUnit {
    /// Suffix appended when formatting a value.
    pub const fn suffix(self) -> &'static str {
        match self {
            ParamUnit::None => "",
            ParamUnit::Seconds => " s",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Semitones => " st",
        }
    }
}

/// Range, default and identity of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier used in presets and by the Hunt categorizer.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Lowest plain value.
    pub min: f32,
    /// Highest plain value.
    pub max: f32,
    /// Initial plain value.
    pub default: f32,
    /// Quantization step; 0 means continuous.
    pub step: f32,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Group label for host tree display.
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Continuous, linear, unitless parameter.
    pub const fn new(
        id: &'static str,
        name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            id,
            name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.0,
            scale: ParamScale::Linear,
            group: "",
        }
    }

    /// Integer-stepped choice parameter over `0..count`.
    pub const fn choice(id: &'static str, name: &'static str, count: u32, default: u32) -> Self {
        Self::new(id, name, 0.0, (count - 1) as f32, default as f32).with_step(1.0)
    }

    /// On/off switch.
    pub const fn toggle(id: &'static str, name: &'static str, default: bool) -> Self {
        Self::choice(id, name, 2, default as u32)
    }

    /// Set the quantization step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Set the display unit.
    pub const fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the normalization curve.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Set the group label.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Whether values snap to `step`.
    #[inline]
    pub fn is_discrete(&self) -> bool {
        self.step > 0.0
    }

    /// Clamp to `[min, max]`. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Clamp, then snap to the nearest step from `min` when discrete.
    #[inline]
    pub fn quantize(&self, value: f32) -> f32 {
        let v = self.clamp(value);
        if !self.is_discrete() {
            return v;
        }
        let steps = libm::roundf((v - self.min) / self.step);
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Plain value to [0, 1].
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let v = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (v - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return (v - self.min) / range;
                }
                libm::logf(v / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// [0, 1] to plain value, quantized when discrete.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let n = normalized.clamp(0.0, 1.0);
        let plain = match self.scale {
            ParamScale::Linear => self.min + n * (self.max - self.min),
            ParamScale::Logarithmic if self.min > 0.0 => {
                self.min * libm::powf(self.max / self.min, n)
            }
            ParamScale::Logarithmic => self.min + n * (self.max - self.min),
        };
        self.quantize(plain)
    }
}
