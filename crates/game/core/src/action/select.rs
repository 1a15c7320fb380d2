use crate::config::BattleConfig;
use crate::state::{BattleState, CombatantId, SkillId};

use super::{BattleTransition, CommandError, require_actor, require_open_turn};

/// Chooses which combatant of the acting side will act.
///
/// Re-selecting replaces the previous actor and clears the chosen skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectActor {
    pub actor: CombatantId,
}

impl SelectActor {
    pub fn new(actor: CombatantId) -> Self {
        Self { actor }
    }
}

impl BattleTransition for SelectActor {
    type Output = ();

    const NAME: &'static str = "select_actor";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        let side = require_open_turn(state)?;
        require_actor(state, side, self.actor)?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        state.turn.selection.actor = Some(self.actor);
        state.turn.selection.skill = None;
        Ok(())
    }
}

/// Chooses a skill on the selected actor. Only ready, affordable skills
/// are accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectSkill {
    pub skill: SkillId,
}

impl SelectSkill {
    pub fn new(skill: impl Into<SkillId>) -> Self {
        Self {
            skill: skill.into(),
        }
    }
}

impl BattleTransition for SelectSkill {
    type Output = ();

    const NAME: &'static str = "select_skill";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        let side = require_open_turn(state)?;
        let actor_id = state
            .turn
            .selection
            .actor
            .ok_or(CommandError::NoActorSelected)?;
        let actor = require_actor(state, side, actor_id)?;
        actor.check_castable(&self.skill)?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        state.turn.selection.skill = Some(self.skill.clone());
        Ok(())
    }
}
