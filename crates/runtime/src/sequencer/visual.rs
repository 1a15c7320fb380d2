//! Presentation capability used by the sequencer.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use battle_core::{
    BattleState, CasterSpec, CombatantId, ImpactSpec, ParticleBurst, ProjectileSpec, ReactionSpec,
    Side,
};

/// Position of a combatant's on-screen anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Floating number shown at the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Callout {
    Damage(u32),
    Healing(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum VisualError {
    #[error("no visual element for combatant {0}")]
    MissingElement(CombatantId),

    #[error("{phase} playback failed: {reason}")]
    Playback { phase: &'static str, reason: String },
}

/// Rendering backend driven by the sequencer.
///
/// Gating methods resolve when their visual has finished; the sequencer
/// waits on them. The remaining methods are fire-and-forget and must return
/// immediately. Implementations only read identity and position; they never
/// see or change vitals.
#[async_trait]
pub trait VisualPort: Send + Sync {
    /// Screen anchor of a combatant, or `None` if it is not on screen.
    fn anchor(&self, id: CombatantId) -> Option<ScreenPoint>;

    async fn play_caster_effect(
        &self,
        caster: CombatantId,
        at: ScreenPoint,
        spec: &CasterSpec,
    ) -> Result<(), VisualError>;

    async fn play_projectile(
        &self,
        from: ScreenPoint,
        to: ScreenPoint,
        spec: &ProjectileSpec,
    ) -> Result<(), VisualError>;

    async fn play_impact(&self, at: ScreenPoint, spec: &ImpactSpec) -> Result<(), VisualError>;

    async fn play_target_reaction(
        &self,
        target: CombatantId,
        at: ScreenPoint,
        spec: &ReactionSpec,
    ) -> Result<(), VisualError>;

    fn spawn_particles(&self, at: ScreenPoint, burst: &ParticleBurst);

    fn show_callout(&self, at: ScreenPoint, callout: Callout);

    fn play_audio(&self, cue: &str);
}

/// Headless backend that takes as long as the real visuals would.
///
/// Anchors are laid out in two facing columns by formation slot; gating
/// phases sleep on the tokio clock for their declared duration.
#[derive(Clone, Debug, Default)]
pub struct HeadlessVisuals {
    anchors: HashMap<CombatantId, ScreenPoint>,
}

impl HeadlessVisuals {
    const PLAYER_COLUMN: f32 = 240.0;
    const ENEMY_COLUMN: f32 = 1040.0;
    const TOP: f32 = 160.0;
    const ROW_SPACING: f32 = 150.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Places every combatant of `state` by side and slot.
    pub fn from_state(state: &BattleState) -> Self {
        let anchors = state
            .combatants
            .iter()
            .map(|combatant| {
                let x = match combatant.side {
                    Side::Player => Self::PLAYER_COLUMN,
                    Side::Enemy => Self::ENEMY_COLUMN,
                };
                let y = Self::TOP + f32::from(combatant.slot) * Self::ROW_SPACING;
                (combatant.id, ScreenPoint::new(x, y))
            })
            .collect();
        Self { anchors }
    }

    pub fn with_anchor(mut self, id: CombatantId, at: ScreenPoint) -> Self {
        self.anchors.insert(id, at);
        self
    }

    async fn hold(phase: &'static str, duration_ms: u32) {
        trace!(target: "battle::visuals", phase, duration_ms, "playing");
        tokio::time::sleep(Duration::from_millis(u64::from(duration_ms))).await;
    }
}

#[async_trait]
impl VisualPort for HeadlessVisuals {
    fn anchor(&self, id: CombatantId) -> Option<ScreenPoint> {
        self.anchors.get(&id).copied()
    }

    async fn play_caster_effect(
        &self,
        _caster: CombatantId,
        _at: ScreenPoint,
        spec: &CasterSpec,
    ) -> Result<(), VisualError> {
        Self::hold("caster", spec.duration_ms).await;
        Ok(())
    }

    async fn play_projectile(
        &self,
        _from: ScreenPoint,
        _to: ScreenPoint,
        spec: &ProjectileSpec,
    ) -> Result<(), VisualError> {
        Self::hold("projectile", spec.travel_ms).await;
        Ok(())
    }

    async fn play_impact(&self, _at: ScreenPoint, spec: &ImpactSpec) -> Result<(), VisualError> {
        Self::hold("impact", spec.duration_ms).await;
        Ok(())
    }

    async fn play_target_reaction(
        &self,
        _target: CombatantId,
        _at: ScreenPoint,
        spec: &ReactionSpec,
    ) -> Result<(), VisualError> {
        Self::hold("reaction", spec.duration_ms).await;
        Ok(())
    }

    fn spawn_particles(&self, at: ScreenPoint, burst: &ParticleBurst) {
        trace!(target: "battle::visuals", kind = %burst.kind, count = burst.count, ?at, "particles");
    }

    fn show_callout(&self, at: ScreenPoint, callout: Callout) {
        trace!(target: "battle::visuals", ?callout, ?at, "callout");
    }

    fn play_audio(&self, cue: &str) {
        trace!(target: "battle::visuals", cue, "audio");
    }
}

/// Backend where every phase finishes immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantVisuals;

#[async_trait]
impl VisualPort for InstantVisuals {
    fn anchor(&self, _id: CombatantId) -> Option<ScreenPoint> {
        Some(ScreenPoint::default())
    }

    async fn play_caster_effect(
        &self,
        _caster: CombatantId,
        _at: ScreenPoint,
        _spec: &CasterSpec,
    ) -> Result<(), VisualError> {
        Ok(())
    }

    async fn play_projectile(
        &self,
        _from: ScreenPoint,
        _to: ScreenPoint,
        _spec: &ProjectileSpec,
    ) -> Result<(), VisualError> {
        Ok(())
    }

    async fn play_impact(&self, _at: ScreenPoint, _spec: &ImpactSpec) -> Result<(), VisualError> {
        Ok(())
    }

    async fn play_target_reaction(
        &self,
        _target: CombatantId,
        _at: ScreenPoint,
        _spec: &ReactionSpec,
    ) -> Result<(), VisualError> {
        Ok(())
    }

    fn spawn_particles(&self, _at: ScreenPoint, _burst: &ParticleBurst) {}

    fn show_callout(&self, _at: ScreenPoint, _callout: Callout) {}

    fn play_audio(&self, _cue: &str) {}
}
