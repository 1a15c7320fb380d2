//! Async orchestration for a turn-based battle.
//!
//! This crate wires the pure rules in `battle-core` to an animation
//! sequencer and a topic-based event bus. Consumers build a
//! [`BattleRuntime`], then drive the player's side through a
//! [`BattleHandle`] while the worker plays the enemy side.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides lifecycle events and the topic-based bus
//! - [`sequencer`] plays committed casts one at a time
//! - [`screen`] tracks shake and flash overlays
//! - [`providers`] holds injectable ids, randomness and result handoff
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod providers;
pub mod runtime;
pub mod screen;
pub mod sequencer;

mod workers;

pub use api::{BattleHandle, Result, RuntimeError};
pub use config::{RuntimeConfig, SequencerTimings};
pub use events::{EventBus, EventSink, FanoutSink, LifecycleEvent, Topic};
pub use providers::{IdGenerator, ResultsHandoff, SeededRandom, SequentialIds};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder};
pub use screen::{ScreenEffects, ScreenOverlay};
pub use sequencer::{
    AnimationFinished, AnimationSequencer, Callout, CastCompletion, CastRequest,
    CompletionStatus, HeadlessVisuals, InstantVisuals, RequestId, ScreenPoint, VisualError,
    VisualPort,
};
