//! End-of-battle output records.

use super::{CombatantId, Side};

/// Terminal outcome from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Running per-combatant totals, accumulated as casts resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub damage_dealt: u32,
    pub healing_done: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantReport {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub final_health: u32,
    pub max_health: u32,
    pub damage_dealt: u32,
    pub healing_done: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience: u32,
    pub gold: u32,
}

/// Immutable record handed to the results screen when a battle ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    pub turn_count: u32,
    pub combatants: Vec<CombatantReport>,
    pub rewards: Rewards,
}

impl BattleSummary {
    pub fn report(&self, id: CombatantId) -> Option<&CombatantReport> {
        self.combatants.iter().find(|report| report.id == id)
    }

    pub fn total_damage(&self, side: Side) -> u32 {
        self.combatants
            .iter()
            .filter(|report| report.side == side)
            .map(|report| report.damage_dealt)
            .sum()
    }
}
