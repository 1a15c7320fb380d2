/// Battle tuning parameters and compile-time limits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Energy every combatant regains at the end of each half-turn.
    pub energy_regen_per_turn: u32,
    pub damage: DamageParams,
    pub rewards: RewardTable,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_SKILLS: usize = 8;
    pub const MAX_COMBATANTS_PER_SIDE: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ENERGY_REGEN: u32 = 10;

    pub fn new() -> Self {
        Self {
            energy_regen_per_turn: Self::DEFAULT_ENERGY_REGEN,
            damage: DamageParams::default(),
            rewards: RewardTable::default(),
        }
    }

    pub fn with_energy_regen(mut self, energy_regen_per_turn: u32) -> Self {
        self.energy_regen_per_turn = energy_regen_per_turn;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance parameters for the damage formula.
///
/// `applied = max(minimum, power - defense / defense_divisor)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    pub defense_divisor: u32,
    pub minimum: u32,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            defense_divisor: 2,
            minimum: 1,
        }
    }
}

/// Reward payload parameters used when a battle summary is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardTable {
    /// Experience granted per defeated enemy, win or lose.
    pub experience_per_enemy: u32,
    /// Gold granted per defeated enemy, win or lose.
    pub gold_per_enemy: u32,
    /// Extra gold granted only on victory.
    pub victory_bonus_gold: u32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            experience_per_enemy: 40,
            gold_per_enemy: 15,
            victory_bonus_gold: 50,
        }
    }
}
