//! Declarative skill visuals.
//!
//! A [`SkillEffectDescriptor`] says *what* a skill looks like: caster
//! flourish, optional projectile, impact, target reaction, particles and
//! screen overlays. Descriptors are immutable catalog entries shared by
//! reference; the runtime sequencer turns them into timed phases.

mod catalog;
mod descriptor;

pub use catalog::{CatalogError, EffectCatalog};
pub use descriptor::{
    CasterFlourish, CasterSpec, Color, ImpactSpec, ImpactVisual, ParticleBurst, ParticleKind,
    ProjectileSpec, ProjectileVisual, ReactionKind, ReactionSpec, ScreenFlash, SkillCategory,
    SkillEffectDescriptor,
};
