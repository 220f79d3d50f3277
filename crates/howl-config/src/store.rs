//! Lock-free parameter storage shared between control and audio threads.
//!
//! Values are stored as `f32` bit-cast into `AtomicU32`. Writers use
//! `Release`, readers `Acquire`; the audio thread takes one
//! [`snapshot`](ParamStore::snapshot) per block.

use std::sync::atomic::{AtomicU32, Ordering};

use howl_core::ParamDescriptor;

use crate::error::ConfigError;
use crate::param::{PARAM_COUNT, Param};

/// Plain values of every parameter, indexed by [`Param::index`].
pub type ParamValues = [f32; PARAM_COUNT];

/// Atomic store for the whole parameter layout.
///
/// ```rust
/// use howl_config::{Param, ParamStore};
///
/// let store = ParamStore::new();
/// store.set(Param::FilterType, 3.4);
/// assert_eq!(store.get(Param::FilterType), 3.0);
///
/// store.set(Param::Sustain, 7.0);
/// assert_eq!(store.get(Param::Sustain), 1.0);
/// ```
#[derive(Debug)]
pub struct ParamStore {
    values: [AtomicU32; PARAM_COUNT],
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore {
    /// A store holding every default.
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| {
                let default = Param::ALL[i].default_value();
                AtomicU32::new(default.to_bits())
            }),
        }
    }

    /// Current plain value.
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        f32::from_bits(self.values[param.index()].load(Ordering::Acquire))
    }

    /// Write a plain value, clamped and snapped to the parameter's step.
    #[inline]
    pub fn set(&self, param: Param, value: f32) {
        let value = param.descriptor().quantize(value);
        self.values[param.index()].store(value.to_bits(), Ordering::Release);
    }

    /// Current value in [0, 1].
    pub fn get_normalized(&self, param: Param) -> f32 {
        param.descriptor().normalize(self.get(param))
    }

    /// Write a value given in [0, 1].
    pub fn set_normalized(&self, param: Param, normalized: f32) {
        self.set(param, param.descriptor().denormalize(normalized));
    }

    /// Value by storage index.
    pub fn get_index(&self, index: usize) -> Option<f32> {
        Param::from_index(index).map(|p| self.get(p))
    }

    /// Write by storage index. Out-of-range indices are ignored.
    pub fn set_index(&self, index: usize, value: f32) {
        if let Some(param) = Param::from_index(index) {
            self.set(param, value);
        }
    }

    /// Write by string id.
    pub fn set_by_id(&self, id: &str, value: f32) -> Result<(), ConfigError> {
        let param = Param::from_id(id).ok_or_else(|| ConfigError::UnknownParam(id.to_string()))?;
        self.set(param, value);
        Ok(())
    }

    /// Parse and apply one `id=value` assignment.
    pub fn assign(&self, assignment: &str) -> Result<Param, ConfigError> {
        let invalid = || ConfigError::InvalidAssignment(assignment.to_string());
        let (id, value) = assignment.split_once('=').ok_or_else(invalid)?;
        let value: f32 = value.trim().parse().map_err(|_| invalid())?;
        let id = id.trim();
        let param = Param::from_id(id).ok_or_else(|| ConfigError::UnknownParam(id.to_string()))?;
        self.set(param, value);
        Ok(param)
    }

    /// Copy of every value.
    pub fn snapshot(&self) -> ParamValues {
        std::array::from_fn(|i| f32::from_bits(self.values[i].load(Ordering::Acquire)))
    }

    /// Restore every value from a snapshot.
    pub fn restore(&self, values: &ParamValues) {
        for (param, &value) in Param::ALL.iter().zip(values) {
            self.set(*param, value);
        }
    }

    /// Put every parameter back to its default.
    pub fn reset_to_defaults(&self) {
        for param in Param::ALL {
            self.set(param, param.default_value());
        }
    }

    /// `(param, descriptor, value)` for every parameter.
    pub fn iter(&self) -> impl Iterator<Item = (Param, &'static ParamDescriptor, f32)> + '_ {
        Param::ALL.iter().map(|&p| (p, p.descriptor(), self.get(p)))
    }
}
