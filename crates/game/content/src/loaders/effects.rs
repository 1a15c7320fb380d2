//! Effect catalog loader.

use std::path::Path;

use battle_core::{EffectCatalog, SkillEffectDescriptor};

use crate::loaders::{LoadResult, read_file};

const BUILTIN: &str = include_str!("../../data/effects.ron");

/// Loader for the skill effect catalog from RON files.
///
/// RON format: `Vec<SkillEffectDescriptor>`. Duplicate skill ids are
/// rejected.
pub struct EffectLoader;

impl EffectLoader {
    /// Parses the catalog embedded in this crate.
    pub fn builtin() -> LoadResult<EffectCatalog> {
        Self::parse(BUILTIN, "builtin effects.ron")
    }

    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> LoadResult<EffectCatalog> {
        let descriptors: Vec<SkillEffectDescriptor> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON {}: {}", origin, e))?;

        EffectCatalog::from_descriptors(descriptors)
            .map_err(|e| anyhow::anyhow!("Invalid effect catalog {}: {}", origin, e))
    }
}
