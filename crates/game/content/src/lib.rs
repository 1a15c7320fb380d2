//! Data-driven battle content and loaders.
//!
//! This crate ships the built-in content as embedded data files:
//! - Skill effect descriptors (`data/effects.ron`)
//! - Roster presets (`data/rosters/*.ron`)
//! - Battle tuning (`data/config/battle.toml`)
//!
//! Every loader also accepts an external file so content can be swapped
//! without rebuilding. Loaders deserialize straight into battle-core types.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, EffectLoader, LoadResult, RosterLoader};
