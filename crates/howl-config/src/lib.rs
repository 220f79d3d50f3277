//! Parameters and presets for the Howling Wolves instrument.
//!
//! # Features
//!
//! - **Layout**: every host-visible [`Param`] with its range, default and step
//! - **Store**: lock-free [`ParamStore`] shared by control and audio threads
//! - **Hunt**: categorized randomization of a parameter set ([`HuntEngine`])
//! - **Presets**: TOML files of named parameter values ([`Preset`])
//!
//! # Example
//!
//! ```rust
//! use howl_config::{HuntEngine, HuntMode, Param, ParamStore, Preset};
//!
//! let store = ParamStore::new();
//! store.assign("reverbMix=0.4").unwrap();
//!
//! let report = HuntEngine::with_seed(1).hunt_store(&store, HuntMode::Chase);
//! assert!(report.ids().all(|id| id != "gain"));
//!
//! let preset = Preset::capture(&store, "after the hunt");
//! let toml = preset.to_toml().unwrap();
//! let restored = Preset::from_toml(&toml).unwrap();
//!
//! let fresh = ParamStore::new();
//! restored.apply(&fresh).unwrap();
//! assert_eq!(fresh.get(Param::ReverbMix), store.get(Param::ReverbMix));
//! ```

mod error;
mod param;
mod preset;
mod store;

/// Categorized stochastic parameter randomization.
pub mod hunt;

pub use error::ConfigError;
pub use hunt::{HuntCategory, HuntChange, HuntEngine, HuntMode, HuntReport, ParamSet};
pub use param::{PARAM_COUNT, Param, descriptors};
pub use preset::{Preset, REST};
pub use store::{ParamStore, ParamValues};

/// Re-export of the descriptor type used throughout the layout.
pub use howl_core::{ParamDescriptor, ParamScale, ParamUnit};
