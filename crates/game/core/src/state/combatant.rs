//! Combatant records owned by the battle state.

use arrayvec::ArrayVec;

use super::{CombatantId, Side, SkillId};
use crate::action::CommandError;
use crate::config::BattleConfig;

/// Numeric effect a skill has on its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillKind {
    /// Resolved through the damage formula against an opposing combatant.
    Damage,
    /// Restores health on an allied combatant (including the caster).
    Heal,
}

/// Derived life status.
///
/// `Stunned` is reserved for status effects; nothing in the resolver
/// produces it yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatantStatus {
    Alive,
    Dead,
    Stunned,
}

/// One skill slot on a combatant, with its live cooldown counter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInstance {
    pub skill_id: SkillId,
    pub kind: SkillKind,
    /// Damage or healing, depending on `kind`.
    pub power: u32,
    pub energy_cost: u32,
    pub cooldown_turns: u32,
    pub remaining_cooldown: u32,
}

impl SkillInstance {
    pub fn new(skill_id: impl Into<SkillId>, kind: SkillKind, power: u32) -> Self {
        Self {
            skill_id: skill_id.into(),
            kind,
            power,
            energy_cost: 0,
            cooldown_turns: 0,
            remaining_cooldown: 0,
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

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining_cooldown == 0
    }

    #[inline]
    pub fn is_affordable(&self, energy: u32) -> bool {
        energy >= self.energy_cost
    }

    pub fn start_cooldown(&mut self) {
        self.remaining_cooldown = self.cooldown_turns;
    }

    pub fn tick_cooldown(&mut self) {
        self.remaining_cooldown = self.remaining_cooldown.saturating_sub(1);
    }
}

/// Mutable combatant record.
///
/// # Invariants
///
/// - `health <= max_health`
/// - `energy <= max_energy`
///
/// Both are re-checked by the engine after every command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    /// Informational faction/role tags.
    pub tags: Vec<String>,
    /// Formation slot assigned during preparation.
    pub slot: u8,

    pub health: u32,
    pub max_health: u32,
    pub defense: u32,
    pub energy: u32,
    pub max_energy: u32,

    pub skills: ArrayVec<SkillInstance, { BattleConfig::MAX_SKILLS }>,
}

impl Combatant {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn status(&self) -> CombatantStatus {
        if self.is_alive() {
            CombatantStatus::Alive
        } else {
            CombatantStatus::Dead
        }
    }

    pub fn skill(&self, id: &SkillId) -> Option<&SkillInstance> {
        self.skills.iter().find(|skill| &skill.skill_id == id)
    }

    pub fn skill_mut(&mut self, id: &SkillId) -> Option<&mut SkillInstance> {
        self.skills.iter_mut().find(|skill| &skill.skill_id == id)
    }

    /// Validates that `id` can be cast right now: the skill exists, is off
    /// cooldown, and the combatant can pay for it.
    pub fn check_castable(&self, id: &SkillId) -> Result<&SkillInstance, CommandError> {
        let skill = self.skill(id).ok_or_else(|| CommandError::SkillNotFound {
            actor: self.id,
            skill: id.clone(),
        })?;

        if !skill.is_ready() {
            return Err(CommandError::OnCooldown {
                skill: id.clone(),
                remaining: skill.remaining_cooldown,
            });
        }

        if !skill.is_affordable(self.energy) {
            return Err(CommandError::InsufficientEnergy {
                skill: id.clone(),
                required: skill.energy_cost,
                available: self.energy,
            });
        }

        Ok(skill)
    }

    /// Skills that are off cooldown and affordable.
    pub fn castable_skills(&self) -> impl Iterator<Item = &SkillInstance> + '_ {
        self.skills
            .iter()
            .filter(|skill| skill.is_ready() && skill.is_affordable(self.energy))
    }

    pub fn spend_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_sub(amount);
    }

    pub fn regenerate_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
    }

    pub fn tick_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.tick_cooldown();
        }
    }

    /// Names the first violated vitals bound, if any.
    pub fn vitals_violation(&self) -> Option<&'static str> {
        if self.health > self.max_health {
            Some("health exceeds max_health")
        } else if self.energy > self.max_energy {
            Some("energy exceeds max_energy")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mage() -> Combatant {
        let mut skills = ArrayVec::new();
        skills.push(SkillInstance::new("fireball", SkillKind::Damage, 300).with_cost(40));
        skills.push(
            SkillInstance::new("meteor", SkillKind::Damage, 900)
                .with_cost(80)
                .with_cooldown(3),
        );
        Combatant {
            id: CombatantId(1),
            name: "Mage".into(),
            side: Side::Player,
            tags: vec!["caster".into()],
            slot: 0,
            health: 900,
            max_health: 900,
            defense: 40,
            energy: 50,
            max_energy: 100,
            skills,
        }
    }

    #[test]
    fn castable_requires_energy_and_cooldown() {
        let mut mage = mage();
        assert!(mage.check_castable(&"fireball".into()).is_ok());
        assert!(matches!(
            mage.check_castable(&"meteor".into()),
            Err(CommandError::InsufficientEnergy {
                required: 80,
                available: 50,
                ..
            })
        ));

        mage.energy = 100;
        mage.skill_mut(&"meteor".into()).unwrap().start_cooldown();
        assert!(matches!(
            mage.check_castable(&"meteor".into()),
            Err(CommandError::OnCooldown { remaining: 3, .. })
        ));
        assert!(matches!(
            mage.check_castable(&"heal".into()),
            Err(CommandError::SkillNotFound { .. })
        ));
    }

    #[test]
    fn energy_regen_caps_at_max() {
        let mut mage = mage();
        mage.regenerate_energy(500);
        assert_eq!(mage.energy, 100);
        mage.spend_energy(130);
        assert_eq!(mage.energy, 0);
    }

    #[test]
    fn cooldowns_floor_at_zero() {
        let mut mage = mage();
        mage.skill_mut(&"meteor".into()).unwrap().remaining_cooldown = 1;
        mage.tick_cooldowns();
        mage.tick_cooldowns();
        assert!(mage.skills.iter().all(|skill| skill.remaining_cooldown == 0));
    }

    #[test]
    fn status_is_derived_from_health() {
        let mut mage = mage();
        assert_eq!(mage.status(), CombatantStatus::Alive);
        mage.health = 0;
        assert_eq!(mage.status(), CombatantStatus::Dead);
    }
}
