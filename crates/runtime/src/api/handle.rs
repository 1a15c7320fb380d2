//! Cloneable façade for issuing commands to the battle runtime.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for the
//! player's commands, state queries and event streams.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{BattleState, CombatantId, SkillId};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, LifecycleEvent, Topic};
use crate::screen::{ScreenEffects, ScreenOverlay};
use crate::sequencer::AnimationSequencer;
use crate::workers::Command;

/// Client-facing handle to interact with a running battle.
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    sequencer: AnimationSequencer,
    screen: ScreenEffects,
}

impl BattleHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        sequencer: AnimationSequencer,
        screen: ScreenEffects,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            sequencer,
            screen,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Leaves preparation and hands the first half-turn to the players.
    ///
    /// Like every command below, resolves to `false` when the battle rules
    /// reject it. Rejections are logged and leave the state untouched.
    pub async fn start_battle(&self) -> Result<bool> {
        self.request(|reply| Command::StartBattle { reply }).await
    }

    pub async fn select_actor(&self, actor: CombatantId) -> Result<bool> {
        self.request(|reply| Command::SelectActor { actor, reply })
            .await
    }

    pub async fn select_skill(&self, skill: impl Into<SkillId>) -> Result<bool> {
        let skill = skill.into();
        self.request(|reply| Command::SelectSkill { skill, reply })
            .await
    }

    /// Commits the selected skill against `target` and queues its animation.
    ///
    /// Returns once the cast is committed; resolution follows when playback
    /// completes. Listen for `cast_resolved` on [`Topic::Battle`].
    pub async fn commit_cast(&self, target: CombatantId) -> Result<bool> {
        self.request(|reply| Command::CommitCast { target, reply })
            .await
    }

    /// Ends the player's half-turn without acting.
    pub async fn pass_turn(&self) -> Result<bool> {
        self.request(|reply| Command::PassTurn { reply }).await
    }

    /// Drops all queued and playing animations and aborts a running battle.
    pub async fn request_clear_queue(&self) -> Result<()> {
        self.request(|reply| Command::ClearQueue { reply }).await
    }

    /// Query the current battle state (read-only snapshot).
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Battle start/end, turn starts and cast outcomes
    /// - `Topic::Animation` - Animation start/complete
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<LifecycleEvent> {
        self.event_bus.subscribe(topic)
    }

    /// True while the sequencer is playing a cast.
    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn screen_overlay(&self) -> ScreenOverlay {
        self.screen.snapshot()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
