//! Event payloads.

use serde::{Deserialize, Serialize};

use battle_core::{BattleOutcome, CombatantId, CombatantStatus, Side, SkillId};

use super::Topic;
use crate::sequencer::{CompletionStatus, RequestId};

/// Named events emitted over a battle's lifetime.
///
/// Serialized with an `event` tag (`{"event":"battle_end","result":"victory","turnCount":1}`)
/// for analytics collectors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LifecycleEvent {
    BattleStart {
        players: usize,
        enemies: usize,
    },

    TurnStart {
        side: Side,
        turn: u32,
    },

    /// The sequencer began playing a cast request.
    AnimationStart {
        request_id: RequestId,
        skill_id: SkillId,
        caster_id: CombatantId,
        target_id: CombatantId,
    },

    /// The sequencer finished or abandoned a cast request.
    AnimationComplete {
        request_id: RequestId,
        skill_id: SkillId,
        caster_id: CombatantId,
        target_id: CombatantId,
        status: CompletionStatus,
    },

    CastResolved {
        skill_id: SkillId,
        caster_id: CombatantId,
        target_id: CombatantId,
        applied: u32,
        target_health: u32,
        target_status: CombatantStatus,
    },

    /// A committed cast had no effect descriptor and was skipped.
    CastDropped {
        skill_id: SkillId,
        caster_id: CombatantId,
        reason: String,
    },

    BattleEnd {
        result: BattleOutcome,
        turn_count: u32,
    },

    /// Hard reset; no summary follows.
    BattleAborted {
        turn: u32,
    },
}

impl LifecycleEvent {
    pub fn topic(&self) -> Topic {
        match self {
            LifecycleEvent::AnimationStart { .. } | LifecycleEvent::AnimationComplete { .. } => {
                Topic::Animation
            }
            _ => Topic::Battle,
        }
    }

    /// Stable event name, identical to the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::BattleStart { .. } => "battle_start",
            LifecycleEvent::TurnStart { .. } => "turn_start",
            LifecycleEvent::AnimationStart { .. } => "animation_start",
            LifecycleEvent::AnimationComplete { .. } => "animation_complete",
            LifecycleEvent::CastResolved { .. } => "cast_resolved",
            LifecycleEvent::CastDropped { .. } => "cast_dropped",
            LifecycleEvent::BattleEnd { .. } => "battle_end",
            LifecycleEvent::BattleAborted { .. } => "battle_aborted",
        }
    }
}
