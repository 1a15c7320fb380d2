//! One battle from content loading to summary.

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use battle_content::{ConfigLoader, EffectLoader, RosterLoader};
use battle_core::{BattlePhase, BattleState, BattleSummary, Side};
use battle_runtime::{
    BattleHandle, BattleRuntime, InstantVisuals, LifecycleEvent, RuntimeConfig, Topic,
};

use crate::autopilot::choose_move;
use crate::config::{ClientConfig, VisualMode};

/// Plays a full battle with the autopilot on the player side.
///
/// Returns the summary, or `None` if the battle was aborted because the
/// player turn limit ran out.
pub async fn run_battle(
    config: &ClientConfig,
    runtime_config: RuntimeConfig,
) -> Result<Option<BattleSummary>> {
    let roster = match &config.roster_path {
        Some(path) => RosterLoader::load(path)?,
        None => RosterLoader::preset(&config.preset)?,
    };
    let catalog = match &config.effects_path {
        Some(path) => EffectLoader::load(path)?,
        None => EffectLoader::builtin()?,
    };
    let battle_config = match &config.battle_config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::builtin()?,
    };

    for skill in RosterLoader::uncovered_skills(&roster, &catalog) {
        warn!(%skill, "skill has no effect descriptor; its casts will be dropped");
    }

    let mut builder = BattleRuntime::builder()
        .config(runtime_config)
        .battle_config(battle_config)
        .roster(roster)
        .catalog(catalog);
    if config.visuals == VisualMode::Instant {
        builder = builder.visuals(InstantVisuals);
    }
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }

    let runtime = builder.build().await.context("failed to build battle runtime")?;
    let handle = runtime.handle();
    let mut battle = handle.subscribe(Topic::Battle);

    if !handle.start_battle().await? {
        bail!("battle refused to start");
    }

    let mut player_turns = 0;
    let finished = loop {
        let state = handle.query_state().await?;
        if state.phase.is_terminal() {
            break state;
        }

        if state.phase == BattlePhase::Battle(Side::Player) && !state.is_pending() {
            player_turns += 1;
            if player_turns > config.max_player_turns {
                warn!(limit = config.max_player_turns, "player turn limit reached; aborting");
                handle.request_clear_queue().await?;
                continue;
            }
            play_turn(&handle, &state).await?;
        }

        next_turn(&mut battle).await?;
    };

    drop(handle);
    runtime.shutdown().await?;
    Ok(finished.summary)
}

async fn play_turn(handle: &BattleHandle, state: &BattleState) -> Result<()> {
    if let Some(chosen) = choose_move(state) {
        debug!(actor = %chosen.actor, skill = %chosen.skill, target = %chosen.target, "autopilot move");
        let committed = handle.select_actor(chosen.actor).await?
            && handle.select_skill(chosen.skill).await?
            && handle.commit_cast(chosen.target).await?;
        if committed {
            return Ok(());
        }
        warn!("autopilot move rejected; passing");
    }

    if !handle.pass_turn().await? {
        bail!("player turn could neither act nor pass");
    }
    Ok(())
}

/// Waits for the next player turn or the end of the battle, logging what
/// happens in between.
async fn next_turn(battle: &mut broadcast::Receiver<LifecycleEvent>) -> Result<()> {
    loop {
        let event = match battle.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                debug!(missed, "event receiver lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => bail!("battle event stream closed"),
        };

        info!(event = event.name(), payload = %serde_json::to_string(&event)?, "battle event");
        match event {
            LifecycleEvent::TurnStart {
                side: Side::Player, ..
            }
            | LifecycleEvent::BattleEnd { .. }
            | LifecycleEvent::BattleAborted { .. } => return Ok(()),
            _ => {}
        }
    }
}
