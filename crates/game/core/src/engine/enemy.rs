//! Enemy decision-making.
//!
//! Deliberately simple: uniform choices with no threat weighting. All
//! randomness comes from the caller's [`RandomSource`].

use crate::rng::RandomSource;
use crate::state::{BattleState, CombatantId, Side, SkillId, target_side};

/// A fully specified enemy action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastChoice {
    pub actor: CombatantId,
    pub skill: SkillId,
    pub target: CombatantId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnemyPlan {
    Cast(CastChoice),
    /// Nobody can act; pass after the configured delay.
    Pass,
    /// A side is empty; run end detection instead of acting.
    Conclude,
}

/// Chooses the enemy side's action for the current half-turn.
///
/// Picks uniformly among living enemies that can cast something, then
/// among that enemy's castable skills, then among living legal targets.
pub fn plan_enemy_turn(state: &BattleState, rng: &mut dyn RandomSource) -> EnemyPlan {
    if state.is_wiped_out(Side::Enemy) || state.is_wiped_out(Side::Player) {
        return EnemyPlan::Conclude;
    }

    let ready: Vec<_> = state
        .living(Side::Enemy)
        .filter_map(|enemy| {
            let skills: Vec<_> = enemy
                .castable_skills()
                .filter(|skill| {
                    state
                        .living(target_side(Side::Enemy, skill.kind))
                        .next()
                        .is_some()
                })
                .collect();
            (!skills.is_empty()).then_some((enemy.id, skills))
        })
        .collect();

    if ready.is_empty() {
        return EnemyPlan::Pass;
    }

    let (actor, skills) = &ready[rng.pick(ready.len())];
    let skill = skills[rng.pick(skills.len())];
    let targets = state.legal_targets(*actor, &skill.skill_id);
    let target = targets[rng.pick(targets.len())];

    EnemyPlan::Cast(CastChoice {
        actor: *actor,
        skill: skill.skill_id.clone(),
        target,
    })
}
