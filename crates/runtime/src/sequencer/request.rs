use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use battle_core::{CombatantId, SkillEffectDescriptor, SkillId};

/// Identifier of one cast request, unique per runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

pub(crate) type Continuation = Box<dyn FnOnce() + Send>;

/// One committed skill use, queued for animated playback.
///
/// Consumed by the sequencer; never reused.
pub struct CastRequest {
    pub id: RequestId,
    pub descriptor: Arc<SkillEffectDescriptor>,
    pub caster: CombatantId,
    pub target: CombatantId,
    pub declared_damage: Option<u32>,
    pub declared_healing: Option<u32>,
    pub(crate) on_complete: Option<Continuation>,
}

impl CastRequest {
    pub fn new(
        id: RequestId,
        descriptor: Arc<SkillEffectDescriptor>,
        caster: CombatantId,
        target: CombatantId,
    ) -> Self {
        Self {
            id,
            descriptor,
            caster,
            target,
            declared_damage: None,
            declared_healing: None,
            on_complete: None,
        }
    }

    pub fn with_damage(mut self, amount: u32) -> Self {
        self.declared_damage = Some(amount);
        self
    }

    pub fn with_healing(mut self, amount: u32) -> Self {
        self.declared_healing = Some(amount);
        self
    }

    /// Continuation invoked once the gating phases finish. Never invoked
    /// if the request is cancelled.
    pub fn on_complete(mut self, continuation: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(continuation));
        self
    }

    pub fn skill_id(&self) -> &SkillId {
        &self.descriptor.id
    }
}

impl fmt::Debug for CastRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastRequest")
            .field("id", &self.id)
            .field("skill", &self.descriptor.id)
            .field("caster", &self.caster)
            .field("target", &self.target)
            .field("declared_damage", &self.declared_damage)
            .field("declared_healing", &self.declared_healing)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// How a request left the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Completed,
    Cancelled,
}

/// Resolves when the request has been played or abandoned.
///
/// Returned by [`crate::AnimationSequencer::enqueue_and_await`]. A sequencer
/// that shuts down with the request still queued reports `Cancelled`.
#[derive(Debug)]
pub struct CastCompletion {
    rx: oneshot::Receiver<CompletionStatus>,
}

impl CastCompletion {
    pub(crate) fn new(rx: oneshot::Receiver<CompletionStatus>) -> Self {
        Self { rx }
    }
}

impl Future for CastCompletion {
    type Output = CompletionStatus;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(CompletionStatus::Cancelled))
    }
}

/// Broadcast for every request the sequencer retires, with or without a
/// continuation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationFinished {
    pub request_id: RequestId,
    pub skill_id: SkillId,
    pub caster: CombatantId,
    pub target: CombatantId,
    pub status: CompletionStatus,
}
