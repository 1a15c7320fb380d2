use crate::config::BattleConfig;
use crate::engine::{TurnStatus, conclude_if_decided};
use crate::state::{BattlePhase, BattleState, Side};

use super::{BattleTransition, CommandError, wrong_phase};

/// Leaves preparation and hands the first turn to the player side.
///
/// A roster with an empty side ends immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartBattle;

impl BattleTransition for StartBattle {
    type Output = TurnStatus;

    const NAME: &'static str = "start_battle";

    fn pre_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        if state.phase != BattlePhase::Preparation {
            return Err(wrong_phase("preparation", state.phase));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut BattleState,
        config: &BattleConfig,
    ) -> Result<Self::Output, CommandError> {
        state.phase = BattlePhase::Battle(Side::Player);
        state.turn.number = 1;
        state.turn.selection.clear();
        Ok(conclude_if_decided(state, config))
    }
}
