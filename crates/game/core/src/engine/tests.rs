use super::*;
use crate::rng::{PcgRandom, RandomSource};
use crate::state::{
    BattleOutcome, BattlePhase, CombatantSpec, CombatantStatus, RosterSpec, Side, SkillKind,
    SkillSpec,
};

/// Replays a fixed list of values, then repeats the last one.
struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRandom {
    fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.cursor.min(self.values.len() - 1)];
        self.cursor += 1;
        value
    }
}

const KNIGHT: CombatantId = CombatantId(1);
const CLERIC: CombatantId = CombatantId(2);
const OGRE: CombatantId = CombatantId(10);
const IMP: CombatantId = CombatantId(11);

fn roster() -> RosterSpec {
    RosterSpec::new(
        vec![
            CombatantSpec::new(1, "Knight", 1000, 100)
                .with_energy(50)
                .with_defense(40)
                .with_skill(SkillSpec::damage("slash", 300).with_cost(20))
                .with_skill(SkillSpec::damage("bash", 200).with_cost(10).with_cooldown(3))
                .with_skill(SkillSpec::damage("cleave", 500).with_cost(80)),
            CombatantSpec::new(2, "Cleric", 800, 100)
                .with_health(500)
                .with_skill(SkillSpec::heal("mend", 400).with_cost(30)),
        ],
        vec![
            CombatantSpec::new(10, "Ogre", 2000, 60)
                .with_defense(100)
                .with_skill(SkillSpec::damage("club", 250).with_cost(30)),
            CombatantSpec::new(11, "Imp", 300, 40)
                .with_skill(SkillSpec::damage("spark", 120).with_cost(10)),
        ],
    )
}

fn started() -> (BattleState, BattleConfig) {
    let config = BattleConfig::default();
    let mut state = BattleState::prepare(roster()).unwrap();
    BattleEngine::new(&mut state, &config).start().unwrap();
    (state, config)
}

fn cast(
    state: &mut BattleState,
    config: &BattleConfig,
    actor: CombatantId,
    skill: &str,
    target: CombatantId,
) -> CastResolution {
    let mut engine = BattleEngine::new(state, config);
    engine.select_actor(actor).unwrap();
    engine.select_skill(skill).unwrap();
    let pending = engine.commit_cast(target).unwrap();
    engine.resolve_cast(pending).unwrap()
}

#[test]
fn start_hands_first_turn_to_players() {
    let (state, _) = started();

    assert_eq!(state.phase, BattlePhase::Battle(Side::Player));
    assert_eq!(state.turn.number, 1);
    assert!(state.summary.is_none());
}

#[test]
fn start_twice_is_rejected() {
    let (mut state, config) = started();
    let err = BattleEngine::new(&mut state, &config).start().unwrap_err();

    assert_eq!(err.phase(), TransitionPhase::PreValidate);
    assert!(matches!(err.error(), CommandError::WrongPhase { .. }));
    assert_eq!(err.command, "start_battle");
}

#[test]
fn start_with_empty_enemy_side_is_an_immediate_victory() {
    let config = BattleConfig::default();
    let mut roster = roster();
    roster.enemies.clear();
    let mut state = BattleState::prepare(roster).unwrap();

    let status = BattleEngine::new(&mut state, &config).start().unwrap();

    assert_eq!(state.phase, BattlePhase::Victory);
    assert_eq!(status.summary().unwrap().turn_count, 1);
}

#[test]
fn selecting_an_enemy_on_the_player_turn_is_rejected() {
    let (mut state, config) = started();
    let before = state.clone();

    let err = BattleEngine::new(&mut state, &config)
        .select_actor(OGRE)
        .unwrap_err();

    assert!(matches!(err.error(), CommandError::NotActorsTurn { .. }));
    assert_eq!(state, before);
}

#[test]
fn selecting_a_dead_actor_is_rejected() {
    let (mut state, config) = started();
    state.combatant_mut(CLERIC).unwrap().health = 0;

    let err = BattleEngine::new(&mut state, &config)
        .select_actor(CLERIC)
        .unwrap_err();

    assert_eq!(err.error(), &CommandError::ActorDead(CLERIC));
}

#[test]
fn unaffordable_skill_cannot_be_selected_or_committed() {
    let (mut state, config) = started();
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(KNIGHT).unwrap();

    let err = engine.select_skill("cleave").unwrap_err();
    assert!(matches!(
        err.error(),
        CommandError::InsufficientEnergy {
            required: 80,
            available: 50,
            ..
        }
    ));
    assert_eq!(err.severity(), ErrorSeverity::Recoverable);

    let err = engine.commit_cast(OGRE).unwrap_err();
    assert_eq!(err.error(), &CommandError::NoSkillSelected);
    assert_eq!(state.combatant(KNIGHT).unwrap().energy, 50);
    assert!(!state.is_pending());
}

#[test]
fn commit_pays_energy_up_front_and_blocks_the_turn() {
    let (mut state, config) = started();
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(KNIGHT).unwrap();
    engine.select_skill("slash").unwrap();
    let pending = engine.commit_cast(OGRE).unwrap();

    assert_eq!(pending.caster, KNIGHT);
    assert_eq!(pending.kind, SkillKind::Damage);
    assert_eq!(pending.turn, 1);

    for err in [
        engine.select_actor(CLERIC).unwrap_err(),
        engine.pass_turn().unwrap_err(),
        engine.commit_cast(OGRE).unwrap_err(),
    ] {
        assert_eq!(err.error(), &CommandError::CastInFlight);
    }

    assert_eq!(state.combatant(KNIGHT).unwrap().energy, 30);
    assert_eq!(state.combatant(OGRE).unwrap().health, 2000);
    assert_eq!(state.phase, BattlePhase::Battle(Side::Player));
    assert!(state.turn.selection.actor.is_none());
}

#[test]
fn resolve_applies_damage_then_runs_housekeeping() {
    let (mut state, config) = started();
    let resolution = cast(&mut state, &config, KNIGHT, "slash", OGRE);

    assert_eq!(resolution.applied, 250);
    assert_eq!(resolution.target_health, 1750);
    assert_eq!(resolution.target_status, CombatantStatus::Alive);
    assert_eq!(
        resolution.status,
        TurnStatus::Continue {
            side: Side::Enemy,
            turn: 2
        }
    );
    assert_eq!(state.phase, BattlePhase::Battle(Side::Enemy));
    // 50 - 20 spent + 10 regenerated
    assert_eq!(state.combatant(KNIGHT).unwrap().energy, 40);
    // Regeneration is capped at max.
    assert_eq!(state.combatant(CLERIC).unwrap().energy, 100);
    assert_eq!(state.tally(KNIGHT).damage_dealt, 250);
    assert!(!state.is_pending());
}

#[test]
fn cooldown_counts_down_once_per_half_turn() {
    let (mut state, config) = started();
    cast(&mut state, &config, KNIGHT, "bash", OGRE);
    assert_eq!(
        state
            .combatant(KNIGHT)
            .unwrap()
            .skill(&"bash".into())
            .unwrap()
            .remaining_cooldown,
        2
    );

    BattleEngine::new(&mut state, &config).pass_turn().unwrap();

    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(KNIGHT).unwrap();
    let err = engine.select_skill("bash").unwrap_err();
    assert!(matches!(
        err.error(),
        CommandError::OnCooldown { remaining: 1, .. }
    ));
    assert!(state.turn.selection.skill.is_none());
}

#[test]
fn heals_target_allies_and_clamp_at_max() {
    let (mut state, config) = started();
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(CLERIC).unwrap();
    engine.select_skill("mend").unwrap();

    let err = engine.commit_cast(OGRE).unwrap_err();
    assert_eq!(err.error(), &CommandError::InvalidTarget(OGRE));
    assert_eq!(err.severity(), ErrorSeverity::Validation);

    let pending = engine.commit_cast(CLERIC).unwrap();
    let resolution = engine.resolve_cast(pending).unwrap();

    assert_eq!(resolution.applied, 400);
    assert_eq!(state.combatant(CLERIC).unwrap().health, 800);
    assert_eq!(state.tally(CLERIC).healing_done, 400);
}

#[test]
fn dead_targets_are_rejected() {
    let (mut state, config) = started();
    state.combatant_mut(IMP).unwrap().health = 0;
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(KNIGHT).unwrap();
    engine.select_skill("slash").unwrap();

    let err = engine.commit_cast(IMP).unwrap_err();
    assert_eq!(err.error(), &CommandError::TargetDead(IMP));
}

#[test]
fn resolving_a_stale_cast_is_rejected() {
    let (mut state, config) = started();
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(KNIGHT).unwrap();
    engine.select_skill("slash").unwrap();
    let mut pending = engine.commit_cast(OGRE).unwrap();
    pending.power = 9999;

    let err = engine.resolve_cast(pending).unwrap_err();
    assert_eq!(err.error(), &CommandError::PendingMismatch);
    assert!(err.severity().is_internal());
}

#[test]
fn killing_the_last_enemy_ends_in_victory_on_turn_one() {
    let config = BattleConfig::default();
    let roster = RosterSpec::new(
        vec![
            CombatantSpec::new(1, "Hero", 500, 50)
                .with_skill(SkillSpec::damage("smite", 1000).with_cost(10)),
        ],
        vec![CombatantSpec::new(10, "Rat", 100, 10)],
    );
    let mut state = BattleState::prepare(roster).unwrap();
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.start().unwrap();
    engine.select_actor(KNIGHT).unwrap();
    engine.select_skill("smite").unwrap();
    let pending = engine.commit_cast(OGRE).unwrap();
    let resolution = engine.resolve_cast(pending).unwrap();

    let summary = resolution.status.summary().unwrap();
    assert_eq!(summary.outcome, BattleOutcome::Victory);
    assert_eq!(summary.turn_count, 1);
    assert_eq!(summary.report(OGRE).unwrap().final_health, 0);
    assert_eq!(summary.report(KNIGHT).unwrap().damage_dealt, 1000);
    assert_eq!(summary.rewards.experience, 40);
    assert_eq!(summary.rewards.gold, 65);
    assert_eq!(state.phase, BattlePhase::Victory);
    assert_eq!(state.summary.as_ref(), Some(summary));

    let err = BattleEngine::new(&mut state, &config).pass_turn().unwrap_err();
    assert!(matches!(err.error(), CommandError::WrongPhase { .. }));
}

#[test]
fn abort_is_terminal_and_produces_no_summary() {
    let (mut state, config) = started();
    let mut engine = BattleEngine::new(&mut state, &config);
    engine.select_actor(KNIGHT).unwrap();
    engine.select_skill("slash").unwrap();
    engine.commit_cast(OGRE).unwrap();
    engine.abort().unwrap();

    assert!(engine.abort().is_err());
    assert_eq!(state.phase, BattlePhase::Aborted);
    assert!(state.summary.is_none());
    assert!(!state.is_pending());
}

#[test]
fn enemy_plan_uses_the_random_source_for_every_choice() {
    let (mut state, config) = started();
    BattleEngine::new(&mut state, &config).pass_turn().unwrap();

    // Second enemy, then second living player. A single-skill pick draws nothing.
    let mut rng = ScriptedRandom::new(&[1, 1]);
    let plan = plan_enemy_turn(&state, &mut rng);

    assert_eq!(
        plan,
        EnemyPlan::Cast(CastChoice {
            actor: IMP,
            skill: "spark".into(),
            target: CLERIC,
        })
    );
}

#[test]
fn enemy_plan_passes_when_nobody_can_pay() {
    let (mut state, config) = started();
    BattleEngine::new(&mut state, &config).pass_turn().unwrap();
    for id in [OGRE, IMP] {
        state.combatant_mut(id).unwrap().energy = 0;
    }

    assert_eq!(
        plan_enemy_turn(&state, &mut PcgRandom::new(7)),
        EnemyPlan::Pass
    );
}

#[test]
fn enemy_plan_concludes_when_a_side_is_empty() {
    let (mut state, _) = started();
    for id in [KNIGHT, CLERIC] {
        state.combatant_mut(id).unwrap().health = 0;
    }

    assert_eq!(
        plan_enemy_turn(&state, &mut PcgRandom::new(7)),
        EnemyPlan::Conclude
    );
}

#[test]
fn autopiloted_battle_terminates() {
    let config = BattleConfig::default();
    let mut state = BattleState::prepare(roster()).unwrap();
    let mut rng = PcgRandom::new(0xBA77_1E);
    let mut engine = BattleEngine::new(&mut state, &config);
    let mut status = engine.start().unwrap();

    for _ in 0..500 {
        let TurnStatus::Continue { side, .. } = status else {
            break;
        };
        let plan = match side {
            Side::Enemy => plan_enemy_turn(&*engine.state, &mut rng),
            // Players mirror the enemy logic from their own side.
            Side::Player => first_castable(&*engine.state),
        };
        status = match plan {
            EnemyPlan::Cast(choice) => {
                engine.select_actor(choice.actor).unwrap();
                engine.select_skill(choice.skill).unwrap();
                let pending = engine.commit_cast(choice.target).unwrap();
                engine.resolve_cast(pending).unwrap().status
            }
            EnemyPlan::Pass => engine.pass_turn().unwrap(),
            EnemyPlan::Conclude => unreachable!("end detection runs after every half-turn"),
        };
    }

    assert!(status.is_over());
    assert!(state.phase.is_terminal());
    assert!(state.check_invariants().is_ok());
}

fn first_castable(state: &BattleState) -> EnemyPlan {
    state
        .living(Side::Player)
        .find_map(|player| {
            player.castable_skills().find_map(|skill| {
                let target = *state.legal_targets(player.id, &skill.skill_id).first()?;
                Some(EnemyPlan::Cast(CastChoice {
                    actor: player.id,
                    skill: skill.skill_id.clone(),
                    target,
                }))
            })
        })
        .unwrap_or(EnemyPlan::Pass)
}
