use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, broadcast, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::request::{
    AnimationFinished, CastCompletion, CastRequest, CompletionStatus, Continuation,
};
use super::visual::VisualPort;
use super::worker::{SequencerWorker, Stage};
use crate::config::SequencerTimings;
use crate::events::{EventSink, LifecycleEvent};
use crate::screen::ScreenEffects;

pub(super) struct Queued {
    pub(super) request: CastRequest,
    done: Option<oneshot::Sender<CompletionStatus>>,
}

/// State shared between [`AnimationSequencer`] handles and the worker.
pub(super) struct Shared {
    queue: Mutex<VecDeque<Queued>>,
    playing: AtomicBool,
    closed: AtomicBool,
    /// Bumped by every clear; playback started under an older value is stale.
    generation: watch::Sender<u64>,
    pub(super) wake: Notify,
    finished: broadcast::Sender<AnimationFinished>,
    pub(super) events: Arc<dyn EventSink>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, VecDeque<Queued>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pops the head and marks playback as started, together with the
    /// generation it started under.
    pub(super) fn next(&self) -> Option<(Queued, u64)> {
        let mut queue = self.lock();
        let queued = queue.pop_front()?;
        self.playing.store(true, Ordering::SeqCst);
        Some((queued, *self.generation.borrow()))
    }

    /// Ends playback started under `generation`.
    ///
    /// Runs under the queue lock, like `clear_queue`, so a request either
    /// completes with its continuation or is cancelled, never both.
    pub(super) fn settle(
        &self,
        generation: u64,
        played: bool,
        request: &mut CastRequest,
    ) -> (CompletionStatus, Option<Continuation>) {
        let _queue = self.lock();
        self.playing.store(false, Ordering::SeqCst);

        if played && *self.generation.borrow() == generation {
            (CompletionStatus::Completed, request.on_complete.take())
        } else {
            (CompletionStatus::Cancelled, None)
        }
    }

    pub(super) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Signals the outcome of a request that leaves the sequencer.
    pub(super) fn retire(&self, queued: Queued, status: CompletionStatus, started: bool) {
        let Queued { request, done } = queued;
        let finished = AnimationFinished {
            request_id: request.id,
            skill_id: request.skill_id().clone(),
            caster: request.caster,
            target: request.target,
            status,
        };

        if started {
            self.events.emit(LifecycleEvent::AnimationComplete {
                request_id: finished.request_id,
                skill_id: finished.skill_id.clone(),
                caster_id: finished.caster,
                target_id: finished.target,
                status,
            });
        }
        if let Some(done) = done {
            // The awaiting side may have given up; nothing to do then.
            let _ = done.send(status);
        }
        let _ = self.finished.send(finished);
    }
}

/// Cloneable handle to the playback queue.
///
/// The FIFO itself is private; callers can only add requests, clear them,
/// and observe progress.
#[derive(Clone)]
pub struct AnimationSequencer {
    shared: Arc<Shared>,
}

impl AnimationSequencer {
    /// Starts the playback worker and returns a handle to it.
    pub fn spawn(
        visuals: Arc<dyn VisualPort>,
        screen: ScreenEffects,
        events: Arc<dyn EventSink>,
        timings: SequencerTimings,
    ) -> (Self, JoinHandle<()>) {
        let (generation, generation_rx) = watch::channel(0);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            playing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            generation,
            wake: Notify::new(),
            finished: broadcast::channel(64).0,
            events,
        });

        let worker = SequencerWorker::new(
            Arc::clone(&shared),
            generation_rx,
            Stage::new(visuals, screen, timings),
        );
        let join = tokio::spawn(worker.run());

        (Self { shared }, join)
    }

    /// Appends `request` to the queue. Playback starts on the worker once
    /// everything ahead of it has finished.
    pub fn enqueue(&self, request: CastRequest) {
        self.push(request, None);
    }

    /// Like [`enqueue`](Self::enqueue), returning a future that resolves
    /// when the request completes or is cancelled.
    pub fn enqueue_and_await(&self, request: CastRequest) -> CastCompletion {
        let (tx, rx) = oneshot::channel();
        self.push(request, Some(tx));
        CastCompletion::new(rx)
    }

    fn push(&self, request: CastRequest, done: Option<oneshot::Sender<CompletionStatus>>) {
        let queued = Queued { request, done };
        if self.shared.is_closed() {
            warn!(target: "battle::sequencer", request = %queued.request.id, "sequencer closed; request dropped");
            self.shared.retire(queued, CompletionStatus::Cancelled, false);
            return;
        }

        {
            let mut queue = self.shared.lock();
            debug!(
                target: "battle::sequencer",
                request = %queued.request.id,
                skill = %queued.request.skill_id(),
                ahead = queue.len(),
                "enqueued"
            );
            queue.push_back(queued);
        }
        self.shared.wake.notify_one();
    }

    /// Drops every queued request and abandons the one playing.
    ///
    /// None of their continuations will run; their completions resolve as
    /// `Cancelled`. Returns how many requests were dropped, including the
    /// one in flight.
    pub fn clear_queue(&self) -> usize {
        let (dropped, was_playing) = {
            let mut queue = self.shared.lock();
            self.shared.generation.send_modify(|generation| *generation += 1);
            let was_playing = self.shared.playing.swap(false, Ordering::SeqCst);
            (queue.drain(..).collect::<Vec<_>>(), was_playing)
        };

        let count = dropped.len() + usize::from(was_playing);
        for queued in dropped {
            self.shared.retire(queued, CompletionStatus::Cancelled, false);
        }
        info!(target: "battle::sequencer", dropped = count, "queue cleared");
        count
    }

    /// True while a request's phases are running.
    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst)
    }

    /// Number of requests waiting behind the one playing.
    pub fn pending(&self) -> usize {
        self.shared.lock().len()
    }

    /// Notifier for every retired request.
    pub fn subscribe_finished(&self) -> broadcast::Receiver<AnimationFinished> {
        self.shared.finished.subscribe()
    }

    /// Clears the queue and stops the worker once it is idle.
    pub fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        self.clear_queue();
        self.shared.wake.notify_one();
    }
}
