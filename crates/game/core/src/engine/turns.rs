//! Half-turn bookkeeping, end detection and summary construction.

use crate::config::BattleConfig;
use crate::state::{
    BattleOutcome, BattlePhase, BattleState, BattleSummary, CombatantReport, Rewards, Side,
};

/// Where the battle stands after a command that can end a half-turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// `side` acts next, on half-turn `turn`.
    Continue { side: Side, turn: u32 },
    Ended(BattleSummary),
}

impl TurnStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, TurnStatus::Ended(_))
    }

    pub fn summary(&self) -> Option<&BattleSummary> {
        match self {
            TurnStatus::Ended(summary) => Some(summary),
            TurnStatus::Continue { .. } => None,
        }
    }
}

/// Housekeeping, end detection, then hand the turn to the other side.
pub(crate) fn end_half_turn(state: &mut BattleState, config: &BattleConfig) -> TurnStatus {
    for combatant in &mut state.combatants {
        combatant.regenerate_energy(config.energy_regen_per_turn);
        combatant.tick_cooldowns();
    }

    if let Some(status) = decide(state, config) {
        return status;
    }

    let next = state
        .phase
        .acting_side()
        .map_or(Side::Player, |side| side.opponent());
    state.phase = BattlePhase::Battle(next);
    state.turn.number = state.turn.number.saturating_add(1);
    state.turn.selection.clear();

    TurnStatus::Continue {
        side: next,
        turn: state.turn.number,
    }
}

/// End detection without housekeeping or a side switch.
pub(crate) fn conclude_if_decided(state: &mut BattleState, config: &BattleConfig) -> TurnStatus {
    decide(state, config).unwrap_or(TurnStatus::Continue {
        side: state.phase.acting_side().unwrap_or(Side::Player),
        turn: state.turn.number,
    })
}

fn decide(state: &mut BattleState, config: &BattleConfig) -> Option<TurnStatus> {
    // Both sides down counts as a defeat.
    let outcome = if state.is_wiped_out(Side::Player) {
        BattleOutcome::Defeat
    } else if state.is_wiped_out(Side::Enemy) {
        BattleOutcome::Victory
    } else {
        return None;
    };

    let summary = build_summary(state, outcome, config);
    state.phase = match outcome {
        BattleOutcome::Victory => BattlePhase::Victory,
        BattleOutcome::Defeat => BattlePhase::Defeat,
    };
    state.turn.selection.clear();
    state.summary = Some(summary.clone());
    Some(TurnStatus::Ended(summary))
}

fn build_summary(state: &BattleState, outcome: BattleOutcome, config: &BattleConfig) -> BattleSummary {
    let combatants = state
        .combatants
        .iter()
        .map(|combatant| {
            let tally = state.tally(combatant.id);
            CombatantReport {
                id: combatant.id,
                name: combatant.name.clone(),
                side: combatant.side,
                final_health: combatant.health,
                max_health: combatant.max_health,
                damage_dealt: tally.damage_dealt,
                healing_done: tally.healing_done,
            }
        })
        .collect();

    let table = &config.rewards;
    let defeated = state
        .side(Side::Enemy)
        .filter(|combatant| !combatant.is_alive())
        .count() as u32;
    let bonus = match outcome {
        BattleOutcome::Victory => table.victory_bonus_gold,
        BattleOutcome::Defeat => 0,
    };

    BattleSummary {
        outcome,
        turn_count: state.turn.number,
        combatants,
        rewards: Rewards {
            experience: defeated.saturating_mul(table.experience_per_enemy),
            gold: defeated
                .saturating_mul(table.gold_per_enemy)
                .saturating_add(bonus),
        },
    }
}
