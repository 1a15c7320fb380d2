//! Command validation errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, Side, SkillId};

/// Errors raised while validating or applying a battle command.
///
/// Most variants describe illegal input that a presentation layer is
/// expected to pre-filter; callers usually log and ignore them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("command requires {expected} phase, battle is in {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("a cast is already in flight")]
    CastInFlight,

    #[error("combatant {0} not found")]
    ActorNotFound(CombatantId),

    #[error("combatant {actor} does not act on the {side} turn")]
    NotActorsTurn { actor: CombatantId, side: Side },

    #[error("combatant {0} is dead")]
    ActorDead(CombatantId),

    #[error("no actor selected")]
    NoActorSelected,

    #[error("no skill selected")]
    NoSkillSelected,

    #[error("combatant {actor} has no skill '{skill}'")]
    SkillNotFound { actor: CombatantId, skill: SkillId },

    #[error("skill '{skill}' is on cooldown for {remaining} more turns")]
    OnCooldown { skill: SkillId, remaining: u32 },

    #[error("skill '{skill}' costs {required} energy, actor has {available}")]
    InsufficientEnergy {
        skill: SkillId,
        required: u32,
        available: u32,
    },

    #[error("target {0} not found")]
    TargetNotFound(CombatantId),

    #[error("combatant {0} is not a legal target for this skill")]
    InvalidTarget(CombatantId),

    #[error("target {0} is dead")]
    TargetDead(CombatantId),

    #[error("no cast is pending")]
    NoPendingCast,

    #[error("resolved cast does not match the pending cast")]
    PendingMismatch,

    #[error("invariant violated for combatant {id}: {detail}")]
    InvariantViolated {
        id: CombatantId,
        detail: &'static str,
    },
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            WrongPhase { .. } | CastInFlight | NotActorsTurn { .. } | ActorDead(_) => {
                ErrorSeverity::Recoverable
            }
            OnCooldown { .. } | InsufficientEnergy { .. } | TargetDead(_) => {
                ErrorSeverity::Recoverable
            }
            ActorNotFound(_) | NoActorSelected | NoSkillSelected | SkillNotFound { .. } => {
                ErrorSeverity::Validation
            }
            TargetNotFound(_) | InvalidTarget(_) => ErrorSeverity::Validation,
            NoPendingCast | PendingMismatch => ErrorSeverity::Internal,
            InvariantViolated { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            WrongPhase { .. } => "COMMAND_WRONG_PHASE",
            CastInFlight => "COMMAND_CAST_IN_FLIGHT",
            ActorNotFound(_) => "COMMAND_ACTOR_NOT_FOUND",
            NotActorsTurn { .. } => "COMMAND_NOT_ACTORS_TURN",
            ActorDead(_) => "COMMAND_ACTOR_DEAD",
            NoActorSelected => "COMMAND_NO_ACTOR_SELECTED",
            NoSkillSelected => "COMMAND_NO_SKILL_SELECTED",
            SkillNotFound { .. } => "COMMAND_SKILL_NOT_FOUND",
            OnCooldown { .. } => "COMMAND_ON_COOLDOWN",
            InsufficientEnergy { .. } => "COMMAND_INSUFFICIENT_ENERGY",
            TargetNotFound(_) => "COMMAND_TARGET_NOT_FOUND",
            InvalidTarget(_) => "COMMAND_INVALID_TARGET",
            TargetDead(_) => "COMMAND_TARGET_DEAD",
            NoPendingCast => "COMMAND_NO_PENDING_CAST",
            PendingMismatch => "COMMAND_PENDING_MISMATCH",
            InvariantViolated { .. } => "COMMAND_INVARIANT_VIOLATED",
        }
    }
}
