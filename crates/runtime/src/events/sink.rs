use std::sync::Arc;

use super::LifecycleEvent;

/// Destination for lifecycle events.
///
/// Implementations must not block and must swallow their own failures;
/// emitters never wait for or react to delivery.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: LifecycleEvent);
}

/// Forwards every event to each inner sink in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: LifecycleEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
