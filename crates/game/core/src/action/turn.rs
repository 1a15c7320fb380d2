use crate::config::BattleConfig;
use crate::engine::{TurnStatus, end_half_turn};
use crate::state::{BattlePhase, BattleState};

use super::{BattleTransition, CommandError, require_open_turn, wrong_phase};

/// Ends the acting side's half-turn without casting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassTurn;

impl BattleTransition for PassTurn {
    type Output = TurnStatus;

    const NAME: &'static str = "pass_turn";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        require_open_turn(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut BattleState,
        config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        state.turn.selection.clear();
        Ok(end_half_turn(state, config))
    }
}

/// Hard reset: abandons the battle without producing a summary.
///
/// Any pending cast is discarded. The energy it cost stays spent, which is
/// irrelevant once the battle is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbortBattle;

impl BattleTransition for AbortBattle {
    type Output = ();

    const NAME: &'static str = "abort_battle";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        if state.phase.is_terminal() {
            return Err(wrong_phase("preparation or battle", state.phase));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        state.phase = BattlePhase::Aborted;
        state.turn.pending = None;
        state.turn.selection.clear();
        Ok(())
    }
}
