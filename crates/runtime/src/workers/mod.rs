//! Background workers that own authoritative battle state.

mod battle;

pub(crate) use battle::WorkerParts;
pub use battle::{BattleWorker, Command};
