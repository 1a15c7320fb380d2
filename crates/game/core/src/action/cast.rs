use crate::combat::{apply_damage, apply_heal};
use crate::config::BattleConfig;
use crate::engine::{TurnStatus, end_half_turn};
use crate::state::{
    BattleState, CombatantId, CombatantStatus, PendingCast, SkillKind, target_side,
};

use super::{BattleTransition, CommandError, require_actor, require_open_turn};

/// Commits the selected actor and skill against `target`.
///
/// Energy is paid immediately; the numeric effect waits for
/// [`ResolveCast`]. Nothing else can change the turn while the returned
/// cast is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitCast {
    pub target: CombatantId,
}

impl CommitCast {
    pub fn new(target: CombatantId) -> Self {
        Self { target }
    }

    fn check(&self, state: &BattleState) -> Result<(), CommandError> {
        let side = require_open_turn(state)?;
        let actor_id = state
            .turn
            .selection
            .actor
            .ok_or(CommandError::NoActorSelected)?;
        let actor = require_actor(state, side, actor_id)?;
        let skill_id = state
            .turn
            .selection
            .skill
            .as_ref()
            .ok_or(CommandError::NoSkillSelected)?;
        let skill = actor.check_castable(skill_id)?;

        let target = state
            .combatant(self.target)
            .ok_or(CommandError::TargetNotFound(self.target))?;
        if target.side != target_side(side, skill.kind) {
            return Err(CommandError::InvalidTarget(self.target));
        }
        if !target.is_alive() {
            return Err(CommandError::TargetDead(self.target));
        }

        Ok(())
    }
}

impl BattleTransition for CommitCast {
    type Output = PendingCast;

    const NAME: &'static str = "commit_cast";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        self.check(state)
    }

    fn apply(
        &self,
        state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        let actor_id = state
            .turn
            .selection
            .actor
            .ok_or(CommandError::NoActorSelected)?;
        let skill_id = state
            .turn
            .selection
            .skill
            .clone()
            .ok_or(CommandError::NoSkillSelected)?;
        let turn = state.turn.number;

        let actor = state
            .combatant_mut(actor_id)
            .ok_or(CommandError::ActorNotFound(actor_id))?;
        let skill = actor.check_castable(&skill_id)?;
        let (kind, power, cost) = (skill.kind, skill.power, skill.energy_cost);
        actor.spend_energy(cost);

        let cast = PendingCast {
            caster: actor_id,
            target: self.target,
            skill_id,
            kind,
            power,
            side: actor.side,
            turn,
        };

        state.turn.selection.clear();
        state.turn.pending = Some(cast.clone());
        Ok(cast)
    }
}

/// What resolving a cast did to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastResolution {
    pub cast: PendingCast,
    /// Damage dealt or healing applied, as reported by the resolver.
    pub applied: u32,
    pub target_health: u32,
    pub target_status: CombatantStatus,
    pub status: TurnStatus,
}

/// Applies the pending cast once its animation has finished and ends the
/// half-turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveCast {
    pub cast: PendingCast,
}

impl ResolveCast {
    pub fn new(cast: PendingCast) -> Self {
        Self { cast }
    }
}

impl BattleTransition for ResolveCast {
    type Output = CastResolution;

    const NAME: &'static str = "resolve_cast";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        match &state.turn.pending {
            None => Err(CommandError::NoPendingCast),
            Some(pending) if *pending != self.cast => Err(CommandError::PendingMismatch),
            Some(_) => Ok(()),
        }
    }

    fn apply(
        &self,
        state: &mut BattleState,
        config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        let cast = state.turn.pending.take().ok_or(CommandError::NoPendingCast)?;

        let target = state
            .combatant_mut(cast.target)
            .ok_or(CommandError::TargetNotFound(cast.target))?;
        let applied = match cast.kind {
            SkillKind::Damage => apply_damage(target, cast.power, &config.damage),
            SkillKind::Heal => apply_heal(target, cast.power),
        };
        let (target_health, target_status) = (target.health, target.status());

        if let Some(skill) = state
            .combatant_mut(cast.caster)
            .and_then(|caster| caster.skill_mut(&cast.skill_id))
        {
            skill.start_cooldown();
        }

        let tally = state.tally_mut(cast.caster);
        match cast.kind {
            SkillKind::Damage => tally.damage_dealt = tally.damage_dealt.saturating_add(applied),
            SkillKind::Heal => tally.healing_done = tally.healing_done.saturating_add(applied),
        }

        let status = end_half_turn(state, config);

        Ok(CastResolution {
            cast,
            applied,
            target_health,
            target_status,
            status,
        })
    }
}
