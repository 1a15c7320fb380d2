//! Command execution pipeline.
//!
//! [`BattleEngine`] is the authoritative reducer for [`BattleState`]. Every
//! command flows through `pre_validate → apply → post_validate`, and failures
//! carry the stage that produced them.

mod enemy;
mod turns;

pub use enemy::{CastChoice, EnemyPlan, plan_enemy_turn};
pub use turns::TurnStatus;
pub(crate) use turns::{conclude_if_decided, end_half_turn};

use crate::action::{
    AbortBattle, BattleTransition, CastResolution, CommandError, CommitCast, PassTurn,
    ResolveCast, SelectActor, SelectSkill, StartBattle,
};
use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, CombatantId, PendingCast, SkillId};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Error surfaced while executing a command through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{command} {inner}")]
pub struct ExecuteError {
    pub command: &'static str,
    pub inner: TransitionPhaseError<CommandError>,
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        self.inner.phase
    }

    pub fn error(&self) -> &CommandError {
        &self.inner.error
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.inner.error.severity()
    }

    fn error_code(&self) -> &'static str {
        self.inner.error.error_code()
    }
}

/// Battle engine that validates and applies commands against a state.
///
/// The engine borrows the state mutably. A failed `apply` or
/// `post_validate` may leave partial changes behind, so callers that need
/// atomicity run the engine on a working copy and commit on success.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    config: &'a BattleConfig,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, config: &'a BattleConfig) -> Self {
        Self { state, config }
    }

    /// Drives `transition` through the three-stage pipeline.
    pub fn execute<T>(&mut self, transition: &T) -> Result<T::Output, ExecuteError>
    where
        T: BattleTransition,
    {
        let fail = |phase, error| ExecuteError {
            command: T::NAME,
            inner: TransitionPhaseError::new(phase, error),
        };

        transition
            .pre_validate(self.state, self.config)
            .map_err(|error| fail(TransitionPhase::PreValidate, error))?;

        let output = transition
            .apply(self.state, self.config)
            .map_err(|error| fail(TransitionPhase::Apply, error))?;

        transition
            .post_validate(self.state, self.config)
            .map_err(|error| fail(TransitionPhase::PostValidate, error))?;

        Ok(output)
    }

    pub fn start(&mut self) -> Result<TurnStatus, ExecuteError> {
        self.execute(&StartBattle)
    }

    pub fn select_actor(&mut self, actor: CombatantId) -> Result<(), ExecuteError> {
        self.execute(&SelectActor::new(actor))
    }

    pub fn select_skill(&mut self, skill: impl Into<SkillId>) -> Result<(), ExecuteError> {
        self.execute(&SelectSkill::new(skill))
    }

    pub fn commit_cast(&mut self, target: CombatantId) -> Result<PendingCast, ExecuteError> {
        self.execute(&CommitCast::new(target))
    }

    pub fn resolve_cast(&mut self, cast: PendingCast) -> Result<CastResolution, ExecuteError> {
        self.execute(&ResolveCast::new(cast))
    }

    pub fn pass_turn(&mut self) -> Result<TurnStatus, ExecuteError> {
        self.execute(&PassTurn)
    }

    pub fn abort(&mut self) -> Result<(), ExecuteError> {
        self.execute(&AbortBattle)
    }
}

#[cfg(test)]
mod tests;
