//! Transient full-screen overlays.
//!
//! [`ScreenEffects`] tracks a shake and a color flash. Each trigger
//! schedules its own auto-clear; a newer trigger of the same kind supersedes
//! the older timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use battle_core::Color;

/// What a renderer should overlay right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenOverlay {
    pub shaking: bool,
    pub flash: Option<Color>,
}

#[derive(Debug, Default)]
struct OverlayState {
    overlay: ScreenOverlay,
    shake_generation: u64,
    flash_generation: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ScreenEffects {
    state: Arc<Mutex<OverlayState>>,
}

impl ScreenEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime.
    pub fn shake(&self, duration: Duration) {
        let generation = {
            let mut state = lock(&self.state);
            state.shake_generation += 1;
            state.overlay.shaking = true;
            state.shake_generation
        };
        tracing::trace!(target: "battle::screen", ?duration, "shake");

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut state = lock(&state);
            if state.shake_generation == generation {
                state.overlay.shaking = false;
            }
        });
    }

    /// Must be called from within a tokio runtime.
    pub fn flash(&self, color: Color, duration: Duration) {
        let generation = {
            let mut state = lock(&self.state);
            state.flash_generation += 1;
            state.overlay.flash = Some(color);
            state.flash_generation
        };
        tracing::trace!(target: "battle::screen", ?color, ?duration, "flash");

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut state = lock(&state);
            if state.flash_generation == generation {
                state.overlay.flash = None;
            }
        });
    }

    pub fn snapshot(&self) -> ScreenOverlay {
        lock(&self.state).overlay
    }
}

fn lock(state: &Mutex<OverlayState>) -> MutexGuard<'_, OverlayState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
