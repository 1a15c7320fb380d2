mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{Instant, sleep};

use battle_content::{EffectLoader, RosterLoader};
use battle_core::{
    BattleOutcome, BattlePhase, BattleState, BattleSummary, CombatantId, CombatantSpec,
    RosterSpec, Side, SkillSpec,
};
use battle_runtime::{
    BattleHandle, BattleRuntime, BattleRuntimeBuilder, InstantVisuals, LifecycleEvent,
    RuntimeConfig, Topic,
};

use common::{RecordingSink, wait_for};

const KNIGHT: CombatantId = CombatantId(1);
const RAT: CombatantId = CombatantId(101);

fn knight_vs_rat() -> RosterSpec {
    RosterSpec::new(
        vec![
            CombatantSpec::new(1, "Aldric", 1000, 100)
                .with_defense(100)
                .with_skill(SkillSpec::damage("slash", 500).with_cost(10))
                .with_skill(SkillSpec::damage("mystery", 50)),
        ],
        vec![
            CombatantSpec::new(101, "Rat", 100, 50)
                .with_skill(SkillSpec::damage("bite", 40).with_cost(5)),
        ],
    )
}

struct Harness {
    runtime: BattleRuntime,
    handle: BattleHandle,
    sink: Arc<RecordingSink>,
    summaries: Arc<Mutex<Vec<BattleSummary>>>,
}

fn builder(roster: RosterSpec) -> (BattleRuntimeBuilder, Arc<RecordingSink>, Arc<Mutex<Vec<BattleSummary>>>) {
    let sink = Arc::new(RecordingSink::default());
    let summaries = Arc::new(Mutex::new(Vec::new()));
    let handoff = Arc::clone(&summaries);

    let builder = BattleRuntime::builder()
        .config(RuntimeConfig::default())
        .roster(roster)
        .catalog(EffectLoader::builtin().expect("builtin effects load"))
        .event_sink(sink.clone())
        .seed(7)
        .results(move |summary: BattleSummary| handoff.lock().unwrap().push(summary));

    (builder, sink, summaries)
}

async fn harness(builder: BattleRuntimeBuilder, sink: Arc<RecordingSink>, summaries: Arc<Mutex<Vec<BattleSummary>>>) -> Harness {
    let runtime = builder.build().await.expect("runtime builds");
    let handle = runtime.handle();
    Harness {
        runtime,
        handle,
        sink,
        summaries,
    }
}

async fn instant(roster: RosterSpec) -> Harness {
    let (builder, sink, summaries) = builder(roster);
    harness(builder.visuals(InstantVisuals), sink, summaries).await
}

async fn cast(handle: &BattleHandle, actor: CombatantId, skill: &str, target: CombatantId) -> bool {
    handle.select_actor(actor).await.unwrap()
        && handle.select_skill(skill).await.unwrap()
        && handle.commit_cast(target).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn one_hit_victory_reports_once() {
    let Harness {
        runtime,
        handle,
        sink,
        summaries,
    } = instant(knight_vs_rat()).await;
    let mut battle = handle.subscribe(Topic::Battle);

    assert!(handle.start_battle().await.unwrap());
    assert!(cast(&handle, KNIGHT, "slash", RAT).await);

    let end = wait_for(&mut battle, |event| matches!(event, LifecycleEvent::BattleEnd { .. })).await;
    assert_eq!(
        serde_json::to_value(&end).unwrap(),
        serde_json::json!({"event": "battle_end", "result": "victory", "turnCount": 1})
    );

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.phase, BattlePhase::Victory);
    let summary = state.summary.expect("summary stored on victory");
    assert_eq!(summary.outcome, BattleOutcome::Victory);
    assert_eq!(summary.rewards.experience, 40);
    assert_eq!(summary.rewards.gold, 65);
    assert_eq!(summary.report(RAT).map(|report| report.final_health), Some(0));

    assert_eq!(
        sink.names(),
        vec![
            "battle_start",
            "turn_start",
            "animation_start",
            "animation_complete",
            "cast_resolved",
            "battle_end",
        ]
    );

    // Nothing more is accepted once the battle is over.
    assert!(!handle.select_actor(KNIGHT).await.unwrap());
    sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.count("battle_end"), 1);
    assert_eq!(summaries.lock().unwrap().len(), 1);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn illegal_input_leaves_state_untouched() {
    let harness = instant(knight_vs_rat()).await;
    let handle = &harness.handle;

    assert!(!handle.select_actor(KNIGHT).await.unwrap(), "still preparing");
    assert!(handle.start_battle().await.unwrap());
    let before = handle.query_state().await.unwrap();

    assert!(!handle.start_battle().await.unwrap());
    assert!(!handle.select_actor(RAT).await.unwrap(), "enemy on player turn");
    assert!(!handle.select_skill("slash").await.unwrap(), "no actor selected");
    assert!(!handle.commit_cast(RAT).await.unwrap(), "nothing selected");
    assert!(!handle.select_actor(CombatantId(999)).await.unwrap());

    assert_eq!(handle.query_state().await.unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn unaffordable_skill_is_not_selectable() {
    let roster = RosterSpec::new(
        vec![
            CombatantSpec::new(1, "Aldric", 1000, 100)
                .with_energy(5)
                .with_skill(SkillSpec::damage("slash", 500).with_cost(10)),
        ],
        vec![CombatantSpec::new(101, "Rat", 100, 50)],
    );
    let harness = instant(roster).await;
    let handle = &harness.handle;

    assert!(handle.start_battle().await.unwrap());
    assert!(handle.select_actor(KNIGHT).await.unwrap());
    assert!(!handle.select_skill("slash").await.unwrap());

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.combatant(KNIGHT).unwrap().energy, 5);
    assert_eq!(state.turn.selection.skill, None);
}

#[tokio::test(start_paused = true)]
async fn skill_without_descriptor_is_dropped_and_turn_passes() {
    let harness = instant(knight_vs_rat()).await;
    let handle = &harness.handle;
    let mut battle = handle.subscribe(Topic::Battle);

    assert!(handle.start_battle().await.unwrap());
    assert!(cast(handle, KNIGHT, "mystery", RAT).await);

    let dropped = wait_for(&mut battle, |event| {
        matches!(event, LifecycleEvent::CastDropped { .. })
    })
    .await;
    match dropped {
        LifecycleEvent::CastDropped { skill_id, caster_id, .. } => {
            assert_eq!(skill_id.as_str(), "mystery");
            assert_eq!(caster_id, KNIGHT);
        }
        other => panic!("unexpected {other:?}"),
    }

    let next = wait_for(&mut battle, |event| {
        matches!(event, LifecycleEvent::TurnStart { .. })
    })
    .await;
    assert_eq!(next, LifecycleEvent::TurnStart { side: Side::Enemy, turn: 2 });

    // The rat bites back and the turn returns to the player.
    let back = wait_for(&mut battle, |event| {
        matches!(event, LifecycleEvent::TurnStart { side: Side::Player, .. })
    })
    .await;
    assert_eq!(back, LifecycleEvent::TurnStart { side: Side::Player, turn: 3 });

    let state = handle.query_state().await.unwrap();
    let knight = state.combatant(KNIGHT).unwrap();
    assert_eq!(knight.energy, knight.max_energy);
    assert!(knight.health < knight.max_health);
    assert_eq!(harness.sink.count("cast_resolved"), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_queue_aborts_without_resolving() {
    let (builder, sink, summaries) = builder(knight_vs_rat());
    let harness = harness(builder, sink, summaries).await;
    let handle = &harness.handle;

    assert!(handle.start_battle().await.unwrap());
    assert!(cast(handle, KNIGHT, "slash", RAT).await);

    sleep(Duration::from_millis(50)).await;
    assert!(handle.is_playing());
    handle.request_clear_queue().await.unwrap();
    assert!(!handle.is_playing());

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.phase, BattlePhase::Aborted);
    assert_eq!(state.turn.pending, None);
    assert_eq!(state.summary, None);
    assert_eq!(state.combatant(RAT).unwrap().health, 100);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.query_state().await.unwrap(), state);
    assert_eq!(harness.sink.count("cast_resolved"), 0);
    assert_eq!(harness.sink.count("battle_aborted"), 1);
    assert_eq!(harness.sink.count("battle_end"), 0);
    assert!(harness.summaries.lock().unwrap().is_empty());
}

/// The rat's only skill costs more energy than it will ever have.
fn knight_vs_exhausted_rat() -> RosterSpec {
    RosterSpec::new(
        vec![
            CombatantSpec::new(1, "Aldric", 1000, 100)
                .with_skill(SkillSpec::damage("slash", 500).with_cost(10)),
        ],
        vec![
            CombatantSpec::new(101, "Rat", 100, 50)
                .with_skill(SkillSpec::damage("bite", 40).with_cost(1000)),
        ],
    )
}

fn is_later_player_turn(event: &LifecycleEvent) -> bool {
    matches!(event, LifecycleEvent::TurnStart { side: Side::Player, turn } if *turn > 1)
}

#[tokio::test(start_paused = true)]
async fn idle_enemy_passes_after_the_delay() {
    let harness = instant(knight_vs_exhausted_rat()).await;
    let handle = &harness.handle;
    let mut battle = handle.subscribe(Topic::Battle);

    assert!(handle.start_battle().await.unwrap());
    let passed_at = Instant::now();
    assert!(handle.pass_turn().await.unwrap());

    let back = wait_for(&mut battle, is_later_player_turn).await;
    assert_eq!(back, LifecycleEvent::TurnStart { side: Side::Player, turn: 3 });
    assert!(passed_at.elapsed() >= RuntimeConfig::default().timings.enemy_pass_delay);
    assert_eq!(harness.sink.count("animation_start"), 0);
}

#[tokio::test(start_paused = true)]
async fn player_commands_are_refused_during_the_enemy_turn() {
    let harness = instant(knight_vs_exhausted_rat()).await;
    let handle = &harness.handle;
    let mut battle = handle.subscribe(Topic::Battle);

    assert!(handle.start_battle().await.unwrap());
    assert!(handle.pass_turn().await.unwrap());

    let enemy_turn = handle.query_state().await.unwrap();
    assert_eq!(enemy_turn.phase, BattlePhase::Battle(Side::Enemy));
    assert!(!handle.pass_turn().await.unwrap());
    assert!(!handle.select_actor(KNIGHT).await.unwrap());
    assert!(!handle.select_actor(RAT).await.unwrap());
    assert!(!handle.commit_cast(KNIGHT).await.unwrap());
    assert_eq!(handle.query_state().await.unwrap(), enemy_turn);

    wait_for(&mut battle, is_later_player_turn).await;

    // Well past the enemy delay, the player still holds turn 3.
    sleep(Duration::from_secs(5)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.phase, BattlePhase::Battle(Side::Player));
    assert_eq!(state.turn.number, 3);
    assert_eq!(harness.sink.count("turn_start"), 3);
}

/// Picks the first castable (actor, skill, target) for the player side.
fn first_legal_cast(state: &BattleState) -> Option<(CombatantId, String, CombatantId)> {
    state.living(Side::Player).find_map(|actor| {
        state.castable_skills(actor.id).into_iter().find_map(|skill| {
            let target = *state.legal_targets(actor.id, &skill.skill_id).first()?;
            Some((actor.id, skill.skill_id.as_str().to_owned(), target))
        })
    })
}

#[tokio::test(start_paused = true)]
async fn autopiloted_skirmish_terminates() {
    let roster = RosterLoader::preset("skirmish").expect("skirmish preset");
    let harness = instant(roster).await;
    let handle = &harness.handle;
    let mut battle = handle.subscribe(Topic::Battle);

    assert!(handle.start_battle().await.unwrap());
    let mut player_turns = 0;
    let end = loop {
        let state = handle.query_state().await.unwrap();
        if state.phase.is_terminal() {
            break state;
        }
        if state.phase == BattlePhase::Battle(Side::Player) && state.turn.pending.is_none() {
            player_turns += 1;
            assert!(player_turns < 500, "battle did not terminate");
            match first_legal_cast(&state) {
                Some((actor, skill, target)) => assert!(cast(handle, actor, &skill, target).await),
                None => assert!(handle.pass_turn().await.unwrap()),
            }
        }
        wait_for(&mut battle, |event| {
            matches!(
                event,
                LifecycleEvent::TurnStart { side: Side::Player, .. }
                    | LifecycleEvent::BattleEnd { .. }
            )
        })
        .await;
    };

    let summary = end.summary.expect("terminal battle has a summary");
    assert!(matches!(end.phase, BattlePhase::Victory | BattlePhase::Defeat));
    assert_eq!(summary.turn_count, end.turn.number);
    assert_eq!(harness.summaries.lock().unwrap().as_slice(), &[summary]);
    assert_eq!(harness.sink.count("battle_end"), 1);
}
