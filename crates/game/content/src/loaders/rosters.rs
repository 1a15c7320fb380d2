//! Roster preset loader.

use std::path::Path;

use battle_core::{EffectCatalog, RosterSpec, SkillId};

use crate::loaders::{LoadResult, read_file};

const PRESETS: &[(&str, &str)] = &[
    ("skirmish", include_str!("../../data/rosters/skirmish.ron")),
    ("duel", include_str!("../../data/rosters/duel.ron")),
];

/// Loader for [`RosterSpec`]s from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Names of the presets embedded in this crate.
    pub fn presets() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }

    pub fn preset(name: &str) -> LoadResult<RosterSpec> {
        let (_, content) = PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown roster preset '{}'", name))?;
        Self::parse(content, name)
    }

    pub fn load(path: &Path) -> LoadResult<RosterSpec> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Skill ids used by `roster` that have no descriptor in `catalog`.
    ///
    /// Such casts are dropped at runtime; callers may want to warn early.
    pub fn uncovered_skills(roster: &RosterSpec, catalog: &EffectCatalog) -> Vec<SkillId> {
        let mut missing: Vec<SkillId> = roster
            .players
            .iter()
            .chain(&roster.enemies)
            .flat_map(|combatant| &combatant.skills)
            .map(|skill| skill.id.clone())
            .filter(|id| !catalog.contains(id))
            .collect();
        missing.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        missing.dedup();
        missing
    }

    fn parse(content: &str, origin: &str) -> LoadResult<RosterSpec> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON {}: {}", origin, e))
    }
}
