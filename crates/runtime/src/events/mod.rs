//! Outbound lifecycle events.
//!
//! The battle worker and the sequencer report what happened as named
//! [`LifecycleEvent`]s through an injected [`EventSink`]. The default sink is
//! the topic-based [`EventBus`], so consumers subscribe only to the topics
//! they need. Delivery is fire-and-forget.

mod bus;
mod sink;
mod types;

pub use bus::{EventBus, Topic};
pub use sink::{EventSink, FanoutSink};
pub use types::LifecycleEvent;
