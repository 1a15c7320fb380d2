//! Public runtime API surface.
//!
//! Types handed to consumers of the runtime crate, kept apart from the
//! workers that do the actual orchestration.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::BattleHandle;
