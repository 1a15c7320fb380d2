//! Damage and heal application.
//!
//! Side effects are confined to the single target record; the resolver
//! knows nothing about turns, queues or animation.

use crate::config::DamageParams;
use crate::state::Combatant;

/// Damage a hit of `power` deals against `defense`.
///
/// # Formula
///
/// ```text
/// reduced = power - defense / defense_divisor   (saturating, rounds down)
/// applied = max(reduced, minimum)
/// ```
///
/// The minimum (1 by default) guarantees forward progress against high
/// defense.
pub fn damage_amount(power: u32, defense: u32, params: &DamageParams) -> u32 {
    let reduction = defense / params.defense_divisor.max(1);
    power.saturating_sub(reduction).max(params.minimum)
}

/// Applies a hit to `target` and returns the applied amount.
///
/// Health is clamped to `[0, max_health]`; overkill is not carried over.
pub fn apply_damage(target: &mut Combatant, power: u32, params: &DamageParams) -> u32 {
    let applied = damage_amount(power, target.defense, params);
    target.health = target.health.saturating_sub(applied).min(target.max_health);
    applied
}

/// Heals `target` by `power` and returns `power`.
///
/// Health never exceeds `max_health`. Unlike damage there is no minimum.
pub fn apply_heal(target: &mut Combatant, power: u32) -> u32 {
    target.health = target.health.saturating_add(power).min(target.max_health);
    power
}
