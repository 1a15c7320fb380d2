//! Player-side decisions for unattended battles.

use battle_core::{BattleState, Combatant, CombatantId, Side, SkillId, SkillInstance, SkillKind};

/// One fully specified player action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerMove {
    pub actor: CombatantId,
    pub skill: SkillId,
    pub target: CombatantId,
}

/// Heals the most wounded ally once someone drops below half health;
/// otherwise hits the weakest enemy with the strongest castable attack.
///
/// Returns `None` when no player can cast anything useful.
pub fn choose_move(state: &BattleState) -> Option<PlayerMove> {
    heal_move(state).or_else(|| attack_move(state))
}

fn heal_move(state: &BattleState) -> Option<PlayerMove> {
    let wounded = state
        .living(Side::Player)
        .filter(|ally| u64::from(ally.health) * 2 < u64::from(ally.max_health))
        .min_by_key(|ally| health_permille(ally))?;

    state.living(Side::Player).find_map(|healer| {
        strongest(healer, SkillKind::Heal).map(|skill| PlayerMove {
            actor: healer.id,
            skill: skill.skill_id.clone(),
            target: wounded.id,
        })
    })
}

fn attack_move(state: &BattleState) -> Option<PlayerMove> {
    let target = state.living(Side::Enemy).min_by_key(|enemy| enemy.health)?;

    state
        .living(Side::Player)
        .filter_map(|attacker| strongest(attacker, SkillKind::Damage).map(|skill| (attacker, skill)))
        .max_by_key(|(_, skill)| skill.power)
        .map(|(attacker, skill)| PlayerMove {
            actor: attacker.id,
            skill: skill.skill_id.clone(),
            target: target.id,
        })
}

fn strongest(combatant: &Combatant, kind: SkillKind) -> Option<&SkillInstance> {
    combatant
        .castable_skills()
        .filter(|skill| skill.kind == kind)
        .max_by_key(|skill| skill.power)
}

fn health_permille(combatant: &Combatant) -> u64 {
    u64::from(combatant.health) * 1000 / u64::from(combatant.max_health.max(1))
}

#[cfg(test)]
mod tests {
    use battle_core::{CombatantSpec, RosterSpec, SkillSpec};

    use super::*;

    fn party() -> BattleState {
        BattleState::prepare(RosterSpec::new(
            vec![
                CombatantSpec::new(1, "Aldric", 1000, 100)
                    .with_skill(SkillSpec::damage("slash", 300))
                    .with_skill(SkillSpec::damage("cleave", 500).with_cost(200)),
                CombatantSpec::new(2, "Tam", 600, 100)
                    .with_skill(SkillSpec::heal("mend", 250))
                    .with_skill(SkillSpec::damage("smite", 120)),
            ],
            vec![
                CombatantSpec::new(101, "Wolf", 800, 50),
                CombatantSpec::new(102, "Imp", 300, 50),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn attacks_weakest_enemy_with_strongest_affordable_skill() {
        let state = party();

        let chosen = choose_move(&state).unwrap();
        assert_eq!(
            chosen,
            PlayerMove {
                actor: CombatantId(1),
                skill: SkillId::new("slash"),
                target: CombatantId(102),
            }
        );
    }

    #[test]
    fn heals_when_an_ally_is_below_half() {
        let mut state = party();
        state.combatant_mut(CombatantId(1)).unwrap().health = 300;

        let chosen = choose_move(&state).unwrap();
        assert_eq!(chosen.actor, CombatantId(2));
        assert_eq!(chosen.skill, SkillId::new("mend"));
        assert_eq!(chosen.target, CombatantId(1));
    }

    #[test]
    fn nothing_to_do_without_castable_skills() {
        let state = BattleState::prepare(RosterSpec::new(
            vec![CombatantSpec::new(1, "Aldric", 1000, 0).with_skill(SkillSpec::damage("slash", 300).with_cost(10))],
            vec![CombatantSpec::new(101, "Wolf", 800, 50)],
        ))
        .unwrap();

        assert_eq!(choose_move(&state), None);
    }
}
