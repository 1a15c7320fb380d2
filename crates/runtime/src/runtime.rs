//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker and the animation sequencer, wires up
//! command and event channels, and exposes a builder-based API for clients.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use battle_core::{BattleConfig, BattleState, EffectCatalog, RandomSource, RosterSpec};

use crate::api::{BattleHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, EventSink, FanoutSink};
use crate::providers::{IdGenerator, ResultsHandoff, SeededRandom, SequentialIds};
use crate::screen::ScreenEffects;
use crate::sequencer::{AnimationSequencer, HeadlessVisuals, VisualPort};
use crate::workers::{BattleWorker, Command, WorkerParts};

/// One running battle.
///
/// [`BattleRuntime`] owns the background tasks; [`BattleHandle`] is the
/// cloneable façade clients talk to.
pub struct BattleRuntime {
    handle: BattleHandle,
    sequencer: AnimationSequencer,
    battle_worker: JoinHandle<()>,
    sequencer_worker: JoinHandle<()>,
}

impl BattleRuntime {
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this battle
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Cancels outstanding playback and waits for both workers to stop.
    ///
    /// The battle worker stops once every [`BattleHandle`] clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        self.sequencer.shutdown();
        drop(self.handle);

        self.battle_worker.await.map_err(RuntimeError::WorkerJoin)?;
        self.sequencer_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`BattleRuntime`].
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    battle_config: BattleConfig,
    roster: Option<RosterSpec>,
    state: Option<BattleState>,
    catalog: Arc<EffectCatalog>,
    visuals: Option<Arc<dyn VisualPort>>,
    event_sink: Option<Arc<dyn EventSink>>,
    ids: Option<Arc<dyn IdGenerator>>,
    random: Option<Box<dyn RandomSource + Send>>,
    results: Option<Arc<dyn ResultsHandoff>>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battle_config: BattleConfig::default(),
            roster: None,
            state: None,
            catalog: Arc::new(EffectCatalog::new()),
            visuals: None,
            event_sink: None,
            ids: None,
            random: None,
            results: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn battle_config(mut self, battle_config: BattleConfig) -> Self {
        self.battle_config = battle_config;
        self
    }

    /// Both sides of the battle, laid out during `build`.
    pub fn roster(mut self, roster: RosterSpec) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Resume from an existing state instead of a roster.
    pub fn initial_state(mut self, state: BattleState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn catalog(mut self, catalog: impl Into<Arc<EffectCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Rendering backend (default: [`HeadlessVisuals`] laid out from the roster).
    pub fn visuals(mut self, visuals: impl VisualPort + 'static) -> Self {
        self.visuals = Some(Arc::new(visuals));
        self
    }

    /// Extra receiver for lifecycle events, alongside the event bus.
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Randomness for enemy decisions (default: seeded from entropy).
    pub fn random(mut self, random: impl RandomSource + Send + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Shorthand for a [`SeededRandom`] with `seed`.
    pub fn seed(self, seed: u64) -> Self {
        self.random(SeededRandom::new(seed))
    }

    /// Receiver of the summary when the battle ends.
    pub fn results(mut self, results: impl ResultsHandoff + 'static) -> Self {
        self.results = Some(Arc::new(results));
        self
    }

    /// Build the runtime and spawn its workers.
    pub async fn build(self) -> Result<BattleRuntime> {
        let state = match (self.state, self.roster) {
            (Some(state), _) => state,
            (None, Some(roster)) => BattleState::prepare(roster)?,
            (None, None) => return Err(RuntimeError::MissingRoster),
        };

        if self.catalog.is_empty() {
            warn!("effect catalog is empty; every cast will be dropped");
        }

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let events: Arc<dyn EventSink> = match self.event_sink {
            Some(extra) => {
                let bus: Arc<dyn EventSink> = Arc::new(event_bus.clone());
                Arc::new(FanoutSink::new(vec![bus, extra]))
            }
            None => Arc::new(event_bus.clone()),
        };

        let visuals = self
            .visuals
            .unwrap_or_else(|| Arc::new(HeadlessVisuals::from_state(&state)));
        let screen = ScreenEffects::new();
        let (sequencer, sequencer_worker) = AnimationSequencer::spawn(
            visuals,
            screen.clone(),
            Arc::clone(&events),
            self.config.timings,
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = BattleHandle::new(command_tx, event_bus, sequencer.clone(), screen);

        let parts = WorkerParts {
            config: self.battle_config,
            catalog: self.catalog,
            sequencer: sequencer.clone(),
            ids: self
                .ids
                .unwrap_or_else(|| Arc::new(SequentialIds::new())),
            rng: self
                .random
                .unwrap_or_else(|| Box::new(SeededRandom::from_entropy())),
            events,
            results: self.results,
            timings: self.config.timings,
        };
        let worker = BattleWorker::new(state, parts, command_rx);
        let battle_worker = tokio::spawn(worker.run());

        Ok(BattleRuntime {
            handle,
            sequencer,
            battle_worker,
            sequencer_worker,
        })
    }
}
