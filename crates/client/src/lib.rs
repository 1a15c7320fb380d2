//! Headless battle client.
//!
//! Composition root for a single battle: loads content, builds a
//! [`battle_runtime::BattleRuntime`], and plays the player side with a
//! simple [`autopilot`] while the runtime drives the enemies.

pub mod autopilot;
pub mod config;
pub mod logging;
pub mod session;

pub use config::{ClientConfig, VisualMode};
pub use session::run_battle;
