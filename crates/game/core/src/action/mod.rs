//! Battle commands.
//!
//! Every state change is a command implementing [`BattleTransition`]. The
//! engine drives each one through `pre_validate → apply → post_validate`, so
//! illegal input is rejected before anything mutates and the vitals
//! invariants are re-checked afterwards.

mod cast;
mod error;
mod select;
mod start;
mod transition;
mod turn;

pub use cast::{CastResolution, CommitCast, ResolveCast};
pub use error::CommandError;
pub use select::{SelectActor, SelectSkill};
pub use start::StartBattle;
pub use transition::BattleTransition;
pub use turn::{AbortBattle, PassTurn};

use crate::state::{BattlePhase, BattleState, Combatant, CombatantId, Side};

/// Side whose turn it is, provided no cast is in flight.
pub(crate) fn require_open_turn(state: &BattleState) -> Result<Side, CommandError> {
    let side = state
        .phase
        .acting_side()
        .ok_or_else(|| CommandError::WrongPhase {
            expected: "battle",
            actual: state.phase.as_str(),
        })?;

    if state.is_pending() {
        return Err(CommandError::CastInFlight);
    }

    Ok(side)
}

/// A living combatant belonging to the acting side.
pub(crate) fn require_actor(
    state: &BattleState,
    side: Side,
    id: CombatantId,
) -> Result<&Combatant, CommandError> {
    let actor = state
        .combatant(id)
        .ok_or(CommandError::ActorNotFound(id))?;

    if actor.side != side {
        return Err(CommandError::NotActorsTurn { actor: id, side });
    }

    if !actor.is_alive() {
        return Err(CommandError::ActorDead(id));
    }

    Ok(actor)
}

pub(crate) fn wrong_phase(expected: &'static str, actual: BattlePhase) -> CommandError {
    CommandError::WrongPhase {
        expected,
        actual: actual.as_str(),
    }
}
