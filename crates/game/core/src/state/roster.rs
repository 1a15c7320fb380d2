//! Battle setup records.
//!
//! Rosters arrive as plain specs (usually deserialized from RON by the
//! content crate) and are turned into [`Combatant`]s during preparation.

use arrayvec::ArrayVec;

use super::{Combatant, CombatantId, Side, SkillId, SkillInstance, SkillKind};
use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSpec {
    pub id: SkillId,
    pub kind: SkillKind,
    pub power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub id: CombatantId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    /// Formation slot; assigned in declaration order when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<u8>,
    pub max_health: u32,
    /// Starting health; defaults to `max_health`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: u32,
    pub max_energy: u32,
    /// Starting energy; defaults to `max_energy`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy: Option<u32>,
    pub skills: Vec<SkillSpec>,
}

impl CombatantSpec {
    pub fn new(id: u32, name: impl Into<String>, max_health: u32, max_energy: u32) -> Self {
        Self {
            id: CombatantId(id),
            name: name.into(),
            tags: Vec::new(),
            slot: None,
            max_health,
            health: None,
            defense: 0,
            max_energy,
            energy: None,
            skills: Vec::new(),
        }
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_skill(mut self, skill: SkillSpec) -> Self {
        self.skills.push(skill);
        self
    }

    pub(crate) fn into_combatant(
        self,
        side: Side,
        default_slot: u8,
    ) -> Result<Combatant, SetupError> {
        if self.max_health == 0 {
            return Err(SetupError::ZeroMaxHealth(self.id));
        }

        let skill_count = self.skills.len();
        if skill_count > BattleConfig::MAX_SKILLS {
            return Err(SetupError::TooManySkills {
                id: self.id,
                count: skill_count,
            });
        }

        let skills: ArrayVec<SkillInstance, { BattleConfig::MAX_SKILLS }> =
            self.skills.into_iter().map(SkillSpec::instantiate).collect();

        // Starting vitals are clamped into range rather than rejected.
        let health = self.health.unwrap_or(self.max_health).min(self.max_health);
        let energy = self.energy.unwrap_or(self.max_energy).min(self.max_energy);

        Ok(Combatant {
            id: self.id,
            name: self.name,
            side,
            tags: self.tags,
            slot: self.slot.unwrap_or(default_slot),
            health,
            max_health: self.max_health,
            defense: self.defense,
            energy,
            max_energy: self.max_energy,
            skills,
        })
    }
}

impl SkillSpec {
    pub fn damage(id: impl Into<SkillId>, power: u32) -> Self {
        Self {
            id: id.into(),
            kind: SkillKind::Damage,
            power,
            energy_cost: 0,
            cooldown_turns: 0,
        }
    }

    pub fn heal(id: impl Into<SkillId>, power: u32) -> Self {
        Self {
            kind: SkillKind::Heal,
            ..Self::damage(id, power)
        }
    }

    pub fn with_cost(mut self, energy_cost: u32) -> Self {
        self.energy_cost = energy_cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown_turns: u32) -> Self {
        self.cooldown_turns = cooldown_turns;
        self
    }

    fn instantiate(self) -> SkillInstance {
        SkillInstance::new(self.id, self.kind, self.power)
            .with_cost(self.energy_cost)
            .with_cooldown(self.cooldown_turns)
    }
}

/// Both teams as declared before the battle starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterSpec {
    pub players: Vec<CombatantSpec>,
    pub enemies: Vec<CombatantSpec>,
}

impl RosterSpec {
    pub fn new(players: Vec<CombatantSpec>, enemies: Vec<CombatantSpec>) -> Self {
        Self { players, enemies }
    }
}

/// Errors raised while turning a roster into battle state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("combatant id {0} appears more than once")]
    DuplicateCombatant(CombatantId),

    #[error("combatant {0} has zero max health")]
    ZeroMaxHealth(CombatantId),

    #[error("combatant {id} declares {count} skills (max {max})", max = BattleConfig::MAX_SKILLS)]
    TooManySkills { id: CombatantId, count: usize },

    #[error("{side} side has {count} combatants (max {max})", max = BattleConfig::MAX_COMBATANTS_PER_SIDE)]
    TooManyCombatants { side: Side, count: usize },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            SetupError::DuplicateCombatant(_) => "SETUP_DUPLICATE_COMBATANT",
            SetupError::ZeroMaxHealth(_) => "SETUP_ZERO_MAX_HEALTH",
            SetupError::TooManySkills { .. } => "SETUP_TOO_MANY_SKILLS",
            SetupError::TooManyCombatants { .. } => "SETUP_TOO_MANY_COMBATANTS",
        }
    }
}
