#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use battle_core::{
    CasterSpec, CombatantId, ImpactSpec, ImpactVisual, ParticleBurst, ProjectileSpec,
    ReactionKind, ReactionSpec, SkillCategory, SkillEffectDescriptor,
};
use battle_runtime::{
    Callout, EventSink, LifecycleEvent, ScreenPoint, SequencerTimings, VisualError, VisualPort,
};

/// Sink that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(LifecycleEvent::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().iter().filter(|event| **event == name).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: LifecycleEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Visual port that sleeps for each phase's duration and logs every call.
#[derive(Default)]
pub struct RecordingVisuals {
    missing: HashSet<CombatantId>,
    failing: Option<&'static str>,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_anchor(mut self, id: CombatantId) -> Self {
        self.missing.insert(id);
        self
    }

    pub fn failing(mut self, phase: &'static str) -> Self {
        self.failing = Some(phase);
        self
    }

    pub fn log(&self) -> Arc<Mutex<Vec<&'static str>>> {
        Arc::clone(&self.log)
    }

    async fn play(&self, phase: &'static str, duration_ms: u32) -> Result<(), VisualError> {
        self.log.lock().unwrap().push(phase);
        if self.failing == Some(phase) {
            return Err(VisualError::Playback {
                phase,
                reason: "scripted failure".into(),
            });
        }
        tokio::time::sleep(Duration::from_millis(u64::from(duration_ms))).await;
        Ok(())
    }
}

#[async_trait]
impl VisualPort for RecordingVisuals {
    fn anchor(&self, id: CombatantId) -> Option<ScreenPoint> {
        (!self.missing.contains(&id)).then(|| ScreenPoint::new(id.0 as f32 * 100.0, 200.0))
    }

    async fn play_caster_effect(
        &self,
        _caster: CombatantId,
        _at: ScreenPoint,
        spec: &CasterSpec,
    ) -> Result<(), VisualError> {
        self.play("caster", spec.duration_ms).await
    }

    async fn play_projectile(
        &self,
        _from: ScreenPoint,
        _to: ScreenPoint,
        spec: &ProjectileSpec,
    ) -> Result<(), VisualError> {
        self.play("projectile", spec.travel_ms).await
    }

    async fn play_impact(&self, _at: ScreenPoint, spec: &ImpactSpec) -> Result<(), VisualError> {
        self.play("impact", spec.duration_ms).await
    }

    async fn play_target_reaction(
        &self,
        _target: CombatantId,
        _at: ScreenPoint,
        spec: &ReactionSpec,
    ) -> Result<(), VisualError> {
        self.play("reaction", spec.duration_ms).await
    }

    fn spawn_particles(&self, _at: ScreenPoint, _burst: &ParticleBurst) {
        self.log.lock().unwrap().push("particles");
    }

    fn show_callout(&self, _at: ScreenPoint, _callout: Callout) {
        self.log.lock().unwrap().push("callout");
    }

    fn play_audio(&self, _cue: &str) {
        self.log.lock().unwrap().push("audio");
    }
}

pub fn melee(id: &str, impact_ms: u32, reaction_ms: u32) -> SkillEffectDescriptor {
    SkillEffectDescriptor::new(
        id,
        SkillCategory::Attack,
        ImpactSpec {
            visual: ImpactVisual::Slash,
            size_px: 64,
            duration_ms: impact_ms,
        },
        ReactionSpec {
            kind: ReactionKind::Shake,
            duration_ms: reaction_ms,
        },
    )
}

/// Default timings without the grace delay, so elapsed time is exactly
/// the gating phases.
pub fn tight_timings() -> SequencerTimings {
    SequencerTimings {
        completion_grace: Duration::ZERO,
        ..SequencerTimings::default()
    }
}

/// Receives until `matches` accepts an event, failing after a generous
/// (virtual) timeout.
pub async fn wait_for(
    rx: &mut broadcast::Receiver<LifecycleEvent>,
    matches: impl Fn(&LifecycleEvent) -> bool,
) -> LifecycleEvent {
    tokio::time::timeout(Duration::from_secs(600), async {
        loop {
            match rx.recv().await {
                Ok(event) if matches(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("event did not arrive")
}
