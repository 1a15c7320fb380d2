//! Animation sequencer.
//!
//! Cast requests are played strictly one at a time in FIFO order. Each
//! request runs its phases in a fixed choreography:
//!
//! 1. caster flourish
//! 2. projectile (if any)
//! 3. screen shake / flash (fire-and-forget)
//! 4. impact and target reaction, concurrently
//! 5. particle bursts, staggered (fire-and-forget)
//! 6. numeric callout and audio cue (fire-and-forget)
//!
//! After a short grace delay the request's `on_complete` runs exactly once,
//! unless [`AnimationSequencer::clear_queue`] abandoned it first. Visual
//! failures never stall the queue: a phase that cannot play is logged and
//! treated as finished.

mod queue;
mod request;
mod visual;
mod worker;

pub use queue::AnimationSequencer;
pub use request::{AnimationFinished, CastCompletion, CastRequest, CompletionStatus, RequestId};
pub use visual::{Callout, HeadlessVisuals, InstantVisuals, ScreenPoint, VisualError, VisualPort};
