//! Battle tuning loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

const BUILTIN: &str = include_str!("../../data/config/battle.toml");

/// Loader for [`BattleConfig`] from TOML files.
///
/// Missing keys fall back to the defaults in battle-core.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn builtin() -> LoadResult<BattleConfig> {
        Self::parse(BUILTIN, "builtin battle.toml")
    }

    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> LoadResult<BattleConfig> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", origin, e))
    }
}
