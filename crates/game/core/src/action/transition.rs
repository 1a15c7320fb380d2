use crate::config::BattleConfig;
use crate::state::BattleState;

use super::CommandError;

/// Defines how a concrete command mutates battle state.
///
/// Validation hooks receive read-only state and must stay side-effect free.
pub trait BattleTransition {
    type Output;

    /// Stable command name used in logs and error reports.
    const NAME: &'static str;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        Ok(())
    }

    /// Applies the command by mutating the state directly. Implementations
    /// should assume that `pre_validate` has already run successfully.
    fn apply(
        &self,
        state: &mut BattleState,
        config: &BattleConfig,
    ) -> Result<Self::Output, CommandError>;

    /// Validates post-conditions using the state **after** mutation.
    ///
    /// Defaults to the vitals invariants shared by every command.
    fn post_validate(&self, state: &BattleState, _config: &BattleConfig) -> Result<(), CommandError> {
        state.check_invariants()
    }
}
