//! Battle worker that owns the authoritative [`BattleState`].
//!
//! Receives commands from [`crate::BattleHandle`], executes them through
//! [`BattleEngine`], drives the enemy side, and hands committed casts to the
//! [`AnimationSequencer`]. A cast is resolved only after its animation
//! completes, so the state never runs ahead of what the player has seen.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Sleep, sleep};
use tracing::{debug, info, warn};

use battle_core::{
    AbortBattle, BattleConfig, BattleEngine, BattlePhase, BattleState, BattleSummary, BattleTransition,
    CombatantId, CommitCast, EffectCatalog, EnemyPlan, ExecuteError, GameError, PassTurn,
    PendingCast, RandomSource, ResolveCast, SelectActor, SelectSkill, Side, SkillId, SkillKind,
    StartBattle, TurnStatus, damage_amount, plan_enemy_turn,
};

use crate::config::SequencerTimings;
use crate::events::{EventSink, LifecycleEvent};
use crate::providers::{IdGenerator, ResultsHandoff};
use crate::sequencer::{AnimationSequencer, CastCompletion, CastRequest, CompletionStatus};

const TARGET: &str = "battle::worker";

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Replies carry whether the rules accepted the command.
    StartBattle {
        reply: oneshot::Sender<bool>,
    },
    SelectActor {
        actor: CombatantId,
        reply: oneshot::Sender<bool>,
    },
    SelectSkill {
        skill: SkillId,
        reply: oneshot::Sender<bool>,
    },
    CommitCast {
        target: CombatantId,
        reply: oneshot::Sender<bool>,
    },
    PassTurn {
        reply: oneshot::Sender<bool>,
    },
    /// Cancel all playback and abort the battle.
    ClearQueue {
        reply: oneshot::Sender<()>,
    },
    /// Query the current battle state (read-only).
    QueryState {
        reply: oneshot::Sender<BattleState>,
    },
}

/// What the worker is waiting on besides commands.
enum InFlight {
    Idle,
    Cast {
        cast: PendingCast,
        completion: CastCompletion,
    },
    /// Enemy side had nothing to do on `turn`; pass when the delay elapses.
    Pass { turn: u32, delay: Pin<Box<Sleep>> },
}

enum Settled {
    Cast(PendingCast, CompletionStatus),
    Pass { turn: u32 },
}

async fn settle(in_flight: &mut InFlight) -> Settled {
    match in_flight {
        InFlight::Idle => std::future::pending().await,
        InFlight::Cast { cast, completion } => {
            let status = completion.await;
            Settled::Cast(cast.clone(), status)
        }
        InFlight::Pass { turn, delay } => {
            delay.as_mut().await;
            Settled::Pass { turn: *turn }
        }
    }
}

/// Collaborators handed to the worker by the runtime builder.
pub(crate) struct WorkerParts {
    pub config: BattleConfig,
    pub catalog: Arc<EffectCatalog>,
    pub sequencer: AnimationSequencer,
    pub ids: Arc<dyn IdGenerator>,
    pub rng: Box<dyn RandomSource + Send>,
    pub events: Arc<dyn EventSink>,
    pub results: Option<Arc<dyn ResultsHandoff>>,
    pub timings: SequencerTimings,
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    state: BattleState,
    config: BattleConfig,
    catalog: Arc<EffectCatalog>,
    sequencer: AnimationSequencer,
    ids: Arc<dyn IdGenerator>,
    rng: Box<dyn RandomSource + Send>,
    events: Arc<dyn EventSink>,
    results: Option<Arc<dyn ResultsHandoff>>,
    timings: SequencerTimings,
    command_rx: mpsc::Receiver<Command>,
    in_flight: InFlight,
}

impl BattleWorker {
    pub(crate) fn new(
        state: BattleState,
        parts: WorkerParts,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        info!(
            target: TARGET,
            players = state.side(Side::Player).count(),
            enemies = state.side(Side::Enemy).count(),
            skills = parts.catalog.len(),
            "BattleWorker initialized"
        );

        Self {
            state,
            config: parts.config,
            catalog: parts.catalog,
            sequencer: parts.sequencer,
            ids: parts.ids,
            rng: parts.rng,
            events: parts.events,
            results: parts.results,
            timings: parts.timings,
            command_rx,
            in_flight: InFlight::Idle,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                settled = settle(&mut self.in_flight) => {
                    self.in_flight = InFlight::Idle;
                    self.on_settled(settled);
                }
            }
        }
        debug!(target: TARGET, "BattleWorker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::StartBattle { reply } => {
                let accepted = self.start().is_ok();
                respond(reply, accepted, "StartBattle");
            }
            Command::SelectActor { actor, reply } => {
                let accepted = self.player_turn("SelectActor")
                    && self
                        .execute(&SelectActor::new(actor))
                        .inspect_err(log_rejection)
                        .is_ok();
                respond(reply, accepted, "SelectActor");
            }
            Command::SelectSkill { skill, reply } => {
                let accepted = self.player_turn("SelectSkill")
                    && self
                        .execute(&SelectSkill::new(skill))
                        .inspect_err(log_rejection)
                        .is_ok();
                respond(reply, accepted, "SelectSkill");
            }
            Command::CommitCast { target, reply } => {
                let accepted = self.player_turn("CommitCast") && self.commit(target).is_ok();
                respond(reply, accepted, "CommitCast");
            }
            Command::PassTurn { reply } => {
                let accepted = self.player_turn("PassTurn") && self.pass_turn().is_ok();
                respond(reply, accepted, "PassTurn");
            }
            Command::ClearQueue { reply } => {
                self.clear_queue();
                respond(reply, (), "ClearQueue");
            }
            Command::QueryState { reply } => {
                respond(reply, self.state.clone(), "QueryState");
            }
        }
    }

    fn on_settled(&mut self, settled: Settled) {
        match settled {
            Settled::Cast(cast, CompletionStatus::Completed) => self.resolve(cast),
            Settled::Cast(cast, CompletionStatus::Cancelled) => {
                debug!(target: TARGET, skill = %cast.skill_id, caster = %cast.caster, "cast animation cancelled; not resolving");
            }
            Settled::Pass { turn } => {
                let still_due = self.state.phase == BattlePhase::Battle(Side::Enemy)
                    && self.state.turn.number == turn;
                if still_due {
                    let _ = self.pass_turn();
                } else {
                    debug!(target: TARGET, turn, "stale enemy pass; ignored");
                }
            }
        }
    }

    /// Handle commands act for the player side only; the enemy side is
    /// driven by the worker itself.
    fn player_turn(&self, command: &'static str) -> bool {
        let open = self.state.phase == BattlePhase::Battle(Side::Player);
        if !open {
            debug!(target: TARGET, command, phase = self.state.phase.as_str(), "not the player's turn; ignored");
        }
        open
    }

    /// Runs `transition` on a working copy and commits it on success.
    fn execute<T: BattleTransition>(
        &mut self,
        transition: &T,
    ) -> Result<T::Output, ExecuteError> {
        let mut working = self.state.clone();
        let output = BattleEngine::new(&mut working, &self.config).execute(transition)?;
        self.state = working;
        Ok(output)
    }

    /// Runs `transition` on a throwaway copy.
    fn dry_run<T: BattleTransition>(&self, transition: &T) -> Result<T::Output, ExecuteError> {
        let mut working = self.state.clone();
        BattleEngine::new(&mut working, &self.config).execute(transition)
    }

    fn start(&mut self) -> Result<(), ExecuteError> {
        let status = self.execute(&StartBattle).inspect_err(log_rejection)?;

        let players = self.state.side(Side::Player).count();
        let enemies = self.state.side(Side::Enemy).count();
        info!(target: TARGET, players, enemies, "battle started");
        self.events
            .emit(LifecycleEvent::BattleStart { players, enemies });

        self.after_status(status);
        Ok(())
    }

    /// Commits a cast for the current selection and queues its animation.
    ///
    /// A skill without an effect descriptor is dropped before any energy is
    /// spent, and the half-turn passes.
    fn commit(&mut self, target: CombatantId) -> Result<(), ExecuteError> {
        let command = CommitCast::new(target);
        let preview = self.dry_run(&command).inspect_err(log_rejection)?;

        let descriptor = match self.catalog.lookup(&preview.skill_id) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                warn!(target: TARGET, skill = %preview.skill_id, caster = %preview.caster, %error, "cast dropped");
                self.events.emit(LifecycleEvent::CastDropped {
                    skill_id: preview.skill_id,
                    caster_id: preview.caster,
                    reason: error.to_string(),
                });
                return self.pass_turn();
            }
        };

        let cast = self.execute(&command).inspect_err(log_rejection)?;
        let request = CastRequest::new(self.ids.next_id(), descriptor, cast.caster, cast.target);
        let request = self.declare(request, &cast);

        debug!(target: TARGET, request = %request.id, skill = %cast.skill_id, caster = %cast.caster, target_id = %cast.target, "cast committed");
        let completion = self.sequencer.enqueue_and_await(request);
        self.in_flight = InFlight::Cast { cast, completion };
        Ok(())
    }

    /// Attaches the expected damage or healing for the callout.
    fn declare(&self, request: CastRequest, cast: &PendingCast) -> CastRequest {
        match cast.kind {
            SkillKind::Damage => {
                let defense = self
                    .state
                    .combatant(cast.target)
                    .map_or(0, |target| target.defense);
                request.with_damage(damage_amount(cast.power, defense, &self.config.damage))
            }
            SkillKind::Heal => request.with_healing(cast.power),
        }
    }

    fn resolve(&mut self, cast: PendingCast) {
        let Ok(resolution) = self.execute(&ResolveCast::new(cast)).inspect_err(log_rejection) else {
            return;
        };

        let cast = &resolution.cast;
        debug!(
            target: TARGET,
            skill = %cast.skill_id,
            target_id = %cast.target,
            applied = resolution.applied,
            health = resolution.target_health,
            "cast resolved"
        );
        self.events.emit(LifecycleEvent::CastResolved {
            skill_id: cast.skill_id.clone(),
            caster_id: cast.caster,
            target_id: cast.target,
            applied: resolution.applied,
            target_health: resolution.target_health,
            target_status: resolution.target_status,
        });

        self.after_status(resolution.status);
    }

    fn pass_turn(&mut self) -> Result<(), ExecuteError> {
        let status = self.execute(&PassTurn).inspect_err(log_rejection)?;
        self.after_status(status);
        Ok(())
    }

    fn after_status(&mut self, status: TurnStatus) {
        match status {
            TurnStatus::Continue { side, turn } => {
                debug!(target: TARGET, %side, turn, "turn start");
                self.events.emit(LifecycleEvent::TurnStart { side, turn });
                if side == Side::Enemy {
                    self.take_enemy_turn();
                }
            }
            TurnStatus::Ended(summary) => self.finish(summary),
        }
    }

    fn take_enemy_turn(&mut self) {
        match plan_enemy_turn(&self.state, self.rng.as_mut()) {
            EnemyPlan::Cast(choice) => {
                debug!(target: TARGET, actor = %choice.actor, skill = %choice.skill, target_id = %choice.target, "enemy acts");
                let acted = self
                    .execute(&SelectActor::new(choice.actor))
                    .and_then(|()| self.execute(&SelectSkill::new(choice.skill)))
                    .and_then(|()| self.commit(choice.target));
                if let Err(error) = acted {
                    warn!(target: TARGET, %error, "enemy action rejected; passing");
                    let _ = self.pass_turn();
                }
            }
            EnemyPlan::Pass => {
                debug!(target: TARGET, "no enemy can act; passing after delay");
                self.in_flight = InFlight::Pass {
                    turn: self.state.turn.number,
                    delay: Box::pin(sleep(self.timings.enemy_pass_delay)),
                };
            }
            EnemyPlan::Conclude => {
                let _ = self.pass_turn();
            }
        }
    }

    fn finish(&mut self, summary: BattleSummary) {
        info!(
            target: TARGET,
            outcome = %summary.outcome,
            turns = summary.turn_count,
            experience = summary.rewards.experience,
            gold = summary.rewards.gold,
            "battle ended"
        );
        self.events.emit(LifecycleEvent::BattleEnd {
            result: summary.outcome,
            turn_count: summary.turn_count,
        });
        if let Some(results) = &self.results {
            results.on_battle_end(summary);
        }
    }

    /// Hard reset: drops all playback and aborts a battle still running.
    fn clear_queue(&mut self) {
        let dropped = self.sequencer.clear_queue();
        self.in_flight = InFlight::Idle;

        if self.state.phase.is_terminal() {
            debug!(target: TARGET, dropped, "queue cleared after battle end");
            return;
        }

        let turn = self.state.turn.number;
        if self.execute(&AbortBattle).inspect_err(log_rejection).is_ok() {
            info!(target: TARGET, dropped, turn, "battle aborted");
            self.events.emit(LifecycleEvent::BattleAborted { turn });
        }
    }
}

fn log_rejection(error: &ExecuteError) {
    let severity = error.severity();
    if severity.is_internal() {
        warn!(target: TARGET, code = error.error_code(), severity = severity.as_str(), %error, "command failed");
    } else {
        debug!(target: TARGET, code = error.error_code(), severity = severity.as_str(), %error, "command rejected");
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: TARGET, command, "reply channel closed (caller dropped)");
    }
}
