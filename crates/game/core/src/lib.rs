//! Deterministic battle rules shared by the runtime and content crates.
//!
//! `battle-core` defines the canonical combat rules (combatants, skills,
//! damage/heal resolution, turn alternation) and exposes pure APIs with no
//! async or I/O. All state mutation flows through [`engine::BattleEngine`],
//! which drives every command through the same validate/apply/validate
//! pipeline. Skill visuals are described here as plain data
//! ([`effect::SkillEffectDescriptor`]) and played elsewhere.
pub mod action;
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod rng;
pub mod state;

pub use action::{
    AbortBattle, BattleTransition, CastResolution, CommandError, CommitCast, PassTurn,
    ResolveCast, SelectActor, SelectSkill, StartBattle,
};
pub use combat::{apply_damage, apply_heal, damage_amount};
pub use config::{BattleConfig, DamageParams, RewardTable};
pub use effect::{
    CasterFlourish, CasterSpec, CatalogError, Color, EffectCatalog, ImpactSpec, ImpactVisual,
    ParticleBurst, ParticleKind, ProjectileSpec, ProjectileVisual, ReactionKind, ReactionSpec,
    ScreenFlash, SkillCategory, SkillEffectDescriptor,
};
pub use engine::{
    BattleEngine, CastChoice, EnemyPlan, ExecuteError, TransitionPhase, TransitionPhaseError,
    TurnStatus, plan_enemy_turn,
};
pub use error::{ErrorSeverity, GameError};
pub use rng::RandomSource;
pub use state::{
    BattleOutcome, BattlePhase, BattleState, BattleSummary, Combatant, CombatantId,
    CombatantReport, CombatantSpec, CombatantStatus, PendingCast, Rewards, RosterSpec,
    Selection, SetupError, Side, SkillId, SkillInstance, SkillKind, SkillSpec, Tally, TurnState,
};
