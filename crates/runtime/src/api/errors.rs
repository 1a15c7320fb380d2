//! Unified error types surfaced by the runtime API.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::SetupError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a roster before building")]
    MissingRoster,

    #[error("invalid roster")]
    Setup(#[from] SetupError),
}
