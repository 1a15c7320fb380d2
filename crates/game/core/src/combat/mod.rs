//! Numeric resolution of skill effects.

mod resolver;

pub use resolver::{apply_damage, apply_heal, damage_amount};
