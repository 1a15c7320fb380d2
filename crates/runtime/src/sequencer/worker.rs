//! Playback task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use battle_core::{CombatantId, ParticleBurst, SkillEffectDescriptor};

use super::queue::{Queued, Shared};
use super::request::{CastRequest, CompletionStatus, RequestId};
use super::visual::{Callout, ScreenPoint, VisualError, VisualPort};
use crate::config::SequencerTimings;
use crate::events::LifecycleEvent;
use crate::screen::ScreenEffects;

/// Background task that plays queued requests one at a time.
pub(super) struct SequencerWorker {
    shared: Arc<Shared>,
    generation: watch::Receiver<u64>,
    stage: Stage,
}

impl SequencerWorker {
    pub(super) fn new(shared: Arc<Shared>, generation: watch::Receiver<u64>, stage: Stage) -> Self {
        Self {
            shared,
            generation,
            stage,
        }
    }

    pub(super) async fn run(mut self) {
        loop {
            match self.shared.next() {
                Some((queued, generation)) => self.play(queued, generation).await,
                None if self.shared.is_closed() => break,
                None => self.shared.wake.notified().await,
            }
        }
        debug!(target: "battle::sequencer", "worker stopped");
    }

    async fn play(&mut self, mut queued: Queued, generation: u64) {
        let cue = Cue::of(&queued.request);
        debug!(target: "battle::sequencer", request = %cue.request_id, skill = %cue.descriptor.id, "playing");
        self.shared.events.emit(LifecycleEvent::AnimationStart {
            request_id: cue.request_id,
            skill_id: cue.descriptor.id.clone(),
            caster_id: cue.caster,
            target_id: cue.target,
        });

        let stale = *self.generation.borrow_and_update() != generation;
        let played = !stale
            && tokio::select! {
                biased;
                _ = self.generation.changed() => false,
                () = self.stage.perform(&cue) => true,
            };

        let (status, continuation) = self.shared.settle(generation, played, &mut queued.request);
        match continuation {
            Some(continuation) => continuation(),
            None if status == CompletionStatus::Cancelled => {
                debug!(target: "battle::sequencer", request = %cue.request_id, "playback abandoned");
            }
            None => {}
        }

        self.shared.retire(queued, status, true);
    }
}

/// What playback reads from a request. The continuation stays behind with
/// the queue entry.
struct Cue {
    request_id: RequestId,
    descriptor: Arc<SkillEffectDescriptor>,
    caster: CombatantId,
    target: CombatantId,
    callout: Option<Callout>,
}

impl Cue {
    fn of(request: &CastRequest) -> Self {
        let callout = request
            .declared_damage
            .map(Callout::Damage)
            .or(request.declared_healing.map(Callout::Healing));

        Self {
            request_id: request.id,
            descriptor: Arc::clone(&request.descriptor),
            caster: request.caster,
            target: request.target,
            callout,
        }
    }
}

/// Turns a descriptor into timed calls on the visual port.
pub(super) struct Stage {
    visuals: Arc<dyn VisualPort>,
    screen: ScreenEffects,
    timings: SequencerTimings,
}

impl Stage {
    pub(super) fn new(
        visuals: Arc<dyn VisualPort>,
        screen: ScreenEffects,
        timings: SequencerTimings,
    ) -> Self {
        Self {
            visuals,
            screen,
            timings,
        }
    }

    async fn perform(&self, cue: &Cue) {
        let descriptor = &cue.descriptor;
        let from = self.locate(cue.caster);
        let to = self.locate(cue.target);

        if let (Some(spec), Some(at)) = (descriptor.caster.as_ref(), from)
            && spec.is_visible()
        {
            gate("caster", self.visuals.play_caster_effect(cue.caster, at, spec)).await;
        }

        if let (Some(spec), Some(from), Some(to)) = (descriptor.projectile.as_ref(), from, to) {
            gate("projectile", self.visuals.play_projectile(from, to, spec)).await;
        }

        if descriptor.screen_shake {
            self.screen.shake(self.timings.shake_duration);
        }
        if let Some(flash) = descriptor.screen_flash {
            self.screen
                .flash(flash.color, Duration::from_millis(u64::from(flash.duration_ms)));
        }

        if let Some(at) = to {
            tokio::join!(
                gate("impact", self.visuals.play_impact(at, &descriptor.impact)),
                gate(
                    "reaction",
                    self.visuals
                        .play_target_reaction(cue.target, at, &descriptor.reaction),
                ),
            );

            self.spawn_particles(at, &descriptor.particles);
            if let Some(callout) = cue.callout {
                self.visuals.show_callout(at, callout);
            }
        }

        if let Some(cue) = &descriptor.audio_cue {
            self.visuals.play_audio(cue);
        }

        tokio::time::sleep(self.timings.completion_grace).await;
    }

    fn locate(&self, id: CombatantId) -> Option<ScreenPoint> {
        let anchor = self.visuals.anchor(id);
        if anchor.is_none() {
            warn!(target: "battle::sequencer", combatant = %id, "no screen anchor; phases there resolve immediately");
        }
        anchor
    }

    fn spawn_particles(&self, at: ScreenPoint, bursts: &[ParticleBurst]) {
        if bursts.is_empty() {
            return;
        }

        let visuals = Arc::clone(&self.visuals);
        let bursts = bursts.to_vec();
        let stagger = self.timings.particle_stagger;
        tokio::spawn(async move {
            for (index, burst) in bursts.iter().enumerate() {
                if index > 0 {
                    tokio::time::sleep(stagger).await;
                }
                visuals.spawn_particles(at, burst);
            }
        });
    }
}

/// Awaits a gating phase; failures are logged and count as finished.
async fn gate<F>(phase: &'static str, playback: F)
where
    F: Future<Output = Result<(), VisualError>>,
{
    if let Err(error) = playback.await {
        warn!(target: "battle::sequencer", phase, %error, "visual phase failed; continuing");
    }
}
