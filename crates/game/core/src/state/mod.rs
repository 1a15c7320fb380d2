//! Battle state owned exclusively by the engine.
//!
//! [`BattleState`] holds the phase machine, the turn bookkeeping and every
//! combatant record. Only commands driven through
//! [`crate::engine::BattleEngine`] mutate it; presentation code reads it
//! through snapshots.

mod combatant;
mod ids;
mod roster;
mod summary;

use std::collections::{BTreeMap, HashSet};

pub use combatant::{Combatant, CombatantStatus, SkillInstance, SkillKind};
pub use ids::{CombatantId, Side, SkillId};
pub use roster::{CombatantSpec, RosterSpec, SetupError, SkillSpec};
pub use summary::{BattleOutcome, BattleSummary, CombatantReport, Rewards, Tally};

use crate::action::CommandError;
use crate::config::BattleConfig;

/// Top-level battle phase.
///
/// `Battle` nests the acting side; `Victory`, `Defeat` and `Aborted` are
/// terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattlePhase {
    Preparation,
    Battle(Side),
    Victory,
    Defeat,
    Aborted,
}

impl BattlePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattlePhase::Preparation => "preparation",
            BattlePhase::Battle(Side::Player) => "player_turn",
            BattlePhase::Battle(Side::Enemy) => "enemy_turn",
            BattlePhase::Victory => "victory",
            BattlePhase::Defeat => "defeat",
            BattlePhase::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BattlePhase::Victory | BattlePhase::Defeat | BattlePhase::Aborted
        )
    }

    /// Side whose turn it is, if the battle is running.
    pub fn acting_side(&self) -> Option<Side> {
        match self {
            BattlePhase::Battle(side) => Some(*side),
            _ => None,
        }
    }
}

/// Actor and skill chosen so far in the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub actor: Option<CombatantId>,
    pub skill: Option<SkillId>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.actor = None;
        self.skill = None;
    }
}

/// A committed skill use waiting for its animation to finish.
///
/// Energy has already been paid; health, cooldown and turn changes happen
/// when the cast is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCast {
    pub caster: CombatantId,
    pub target: CombatantId,
    pub skill_id: SkillId,
    pub kind: SkillKind,
    pub power: u32,
    pub side: Side,
    pub turn: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Half-turn counter; 0 until the battle starts.
    pub number: u32,
    pub selection: Selection,
    /// At most one cast is in flight; the turn owner cannot change meanwhile.
    pub pending: Option<PendingCast>,
}

/// Complete state of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub phase: BattlePhase,
    pub turn: TurnState,
    pub combatants: Vec<Combatant>,
    pub tallies: BTreeMap<CombatantId, Tally>,
    /// Set exactly once, when a terminal outcome is reached.
    pub summary: Option<BattleSummary>,
}

impl BattleState {
    /// Builds the preparation-phase state from both rosters.
    pub fn prepare(roster: RosterSpec) -> Result<Self, SetupError> {
        let mut seen = HashSet::new();
        let mut combatants = Vec::with_capacity(roster.players.len() + roster.enemies.len());

        for (side, specs) in [(Side::Player, roster.players), (Side::Enemy, roster.enemies)] {
            if specs.len() > BattleConfig::MAX_COMBATANTS_PER_SIDE {
                return Err(SetupError::TooManyCombatants {
                    side,
                    count: specs.len(),
                });
            }

            for (index, spec) in specs.into_iter().enumerate() {
                if !seen.insert(spec.id) {
                    return Err(SetupError::DuplicateCombatant(spec.id));
                }
                // index < MAX_COMBATANTS_PER_SIDE, so the cast cannot truncate
                combatants.push(spec.into_combatant(side, index as u8)?);
            }
        }

        let tallies = combatants
            .iter()
            .map(|combatant| (combatant.id, Tally::default()))
            .collect();

        Ok(Self {
            phase: BattlePhase::Preparation,
            turn: TurnState::default(),
            combatants,
            tallies,
            summary: None,
        })
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|combatant| combatant.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants
            .iter_mut()
            .find(|combatant| combatant.id == id)
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants
            .iter()
            .filter(move |combatant| combatant.side == side)
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> + '_ {
        self.side(side).filter(|combatant| combatant.is_alive())
    }

    /// True when no combatant on `side` is alive (including an empty side).
    pub fn is_wiped_out(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    pub fn is_pending(&self) -> bool {
        self.turn.pending.is_some()
    }

    /// Skills `actor` could commit right now, ignoring whose turn it is.
    pub fn castable_skills(&self, actor: CombatantId) -> Vec<&SkillInstance> {
        match self.combatant(actor) {
            Some(combatant) if combatant.is_alive() => combatant.castable_skills().collect(),
            _ => Vec::new(),
        }
    }

    /// Combatants `actor` may target with `skill`.
    pub fn legal_targets(&self, actor: CombatantId, skill: &SkillId) -> Vec<CombatantId> {
        let Some(caster) = self.combatant(actor) else {
            return Vec::new();
        };
        let Some(instance) = caster.skill(skill) else {
            return Vec::new();
        };

        self.living(target_side(caster.side, instance.kind))
            .map(|combatant| combatant.id)
            .collect()
    }

    pub fn tally(&self, id: CombatantId) -> Tally {
        self.tallies.get(&id).copied().unwrap_or_default()
    }

    pub(crate) fn tally_mut(&mut self, id: CombatantId) -> &mut Tally {
        self.tallies.entry(id).or_default()
    }

    /// Verifies the vitals bounds of every combatant.
    pub fn check_invariants(&self) -> Result<(), CommandError> {
        for combatant in &self.combatants {
            if let Some(detail) = combatant.vitals_violation() {
                return Err(CommandError::InvariantViolated {
                    id: combatant.id,
                    detail,
                });
            }
        }
        Ok(())
    }
}

/// Side a skill of `kind` cast by a member of `caster_side` must target.
pub fn target_side(caster_side: Side, kind: SkillKind) -> Side {
    match kind {
        SkillKind::Damage => caster_side.opponent(),
        SkillKind::Heal => caster_side,
    }
}
