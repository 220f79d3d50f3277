//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::param::Param;
use crate::store::ParamStore;

/// Rest marker in [`Preset::rhythm`].
pub const REST: i8 = -1;

/// Named set of parameter values.
///
/// Only the parameters listed in `params` are touched when a preset is
/// applied, so a preset can be partial.
///
/// # TOML Format
///
/// ```toml
/// name = "Night Run"
/// description = "Dark, long tail"
/// rhythm = [0, -1, 3, -1, 5, -1, 7, -1]
///
/// [params]
/// filterCutoff = 900.0
/// reverbMix = 0.45
/// arpEnabled = 1.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Step-sequencer grid: a scale degree 0-7 per step, or [`REST`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rhythm: Vec<i8>,

    /// Plain parameter values keyed by id.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rhythm: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add or replace one parameter value.
    pub fn with_param(mut self, id: impl Into<String>, value: f32) -> Self {
        self.params.insert(id.into(), value);
        self
    }

    /// Set the sequencer grid.
    pub fn with_rhythm(mut self, rhythm: impl Into<Vec<i8>>) -> Self {
        self.rhythm = rhythm.into();
        self
    }

    /// Capture every value currently in `store`.
    pub fn capture(store: &ParamStore, name: impl Into<String>) -> Self {
        let params = store
            .iter()
            .map(|(param, _, value)| (param.id().to_string(), value))
            .collect();
        Self {
            params,
            ..Self::new(name)
        }
    }

    /// Write every listed value into `store`.
    ///
    /// Fails on the first unknown id; values before it have been applied.
    pub fn apply(&self, store: &ParamStore) -> Result<(), ConfigError> {
        for (id, &value) in &self.params {
            store.set_by_id(id, value)?;
        }
        Ok(())
    }

    /// Like [`apply`](Self::apply) but unknown ids are skipped with a warning.
    ///
    /// Returns the number of values applied.
    pub fn apply_lenient(&self, store: &ParamStore) -> usize {
        let mut applied = 0;
        for (id, &value) in &self.params {
            match Param::from_id(id) {
                Some(param) => {
                    store.set(param, value);
                    applied += 1;
                }
                None => tracing::warn!(preset = %self.name, id = %id, "skipping unknown parameter"),
            }
        }
        applied
    }

    /// Stored value for `id`, if present.
    pub fn get(&self, id: &str) -> Option<f32> {
        self.params.get(id).copied()
    }

    /// Sequencer grid as optional degrees. Anything negative is a rest.
    pub fn rhythm_steps(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.rhythm
            .iter()
            .map(|&d| if d < 0 { None } else { Some(d as u8) })
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no values are stored.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_preset() {
        let preset = Preset::from_toml(
            r#"
            name = "Night Run"
            rhythm = [0, -1, 3]

            [params]
            filterCutoff = 900.0
            reverbMix = 0.45
            "#,
        )
        .unwrap();
        assert_eq!(preset.name, "Night Run");
        assert_eq!(preset.description, None);
        assert_eq!(preset.len(), 2);
        assert_eq!(preset.get("reverbMix"), Some(0.45));
        assert_eq!(
            preset.rhythm_steps().collect::<Vec<_>>(),
            [Some(0), None, Some(3)]
        );
    }

    #[test]
    fn missing_tables_default() {
        let preset = Preset::from_toml("name = \"bare\"").unwrap();
        assert!(preset.is_empty());
        assert!(preset.rhythm.is_empty());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            Preset::from_toml("name = "),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn capture_then_apply() {
        let store = ParamStore::new();
        store.set(Param::DelayMix, 0.6);
        store.set(Param::ChordMode, 2.0);
        let preset = Preset::capture(&store, "snap");
        assert_eq!(preset.len(), Param::ALL.len());

        let other = ParamStore::new();
        preset.apply(&other).unwrap();
        assert_eq!(other.snapshot(), store.snapshot());
    }

    #[test]
    fn strict_and_lenient_apply() {
        let preset = Preset::new("odd")
            .with_param("gain", 0.5)
            .with_param("wobble", 1.0);
        let store = ParamStore::new();
        assert!(matches!(
            preset.apply(&store),
            Err(ConfigError::UnknownParam(ref id)) if id == "wobble"
        ));

        let store = ParamStore::new();
        assert_eq!(preset.apply_lenient(&store), 1);
        assert_eq!(store.get(Param::Gain), 0.5);
    }

    #[test]
    fn applied_values_are_clamped() {
        let store = ParamStore::new();
        Preset::new("hot")
            .with_param("delayFeedback", 3.0)
            .apply(&store)
            .unwrap();
        assert_eq!(store.get(Param::DelayFeedback), 0.95);
    }
}
