use bitflags::bitflags;

use crate::state::SkillId;

/// Broad visual family of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillCategory {
    Attack,
    Heal,
    Buff,
    Debuff,
    Special,
}

/// 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(220, 40, 40);
    pub const GOLD: Self = Self::rgb(255, 200, 60);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

bitflags! {
    /// Which flourishes the caster phase plays. Empty means no caster phase.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CasterFlourish: u8 {
        const SCALE = 0b0000_0001;
        const ROTATE = 0b0000_0010;
        const GLOW = 0b0000_0100;
    }
}

/// Caster phase: scale pulse and/or rotation and/or glow.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CasterSpec {
    pub flourish: CasterFlourish,
    /// Peak scale in percent (100 = unchanged).
    #[cfg_attr(feature = "serde", serde(default = "CasterSpec::default_scale"))]
    pub scale_percent: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation_deg: i16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub glow: Option<Color>,
    pub duration_ms: u32,
}

impl CasterSpec {
    pub const fn new(flourish: CasterFlourish, duration_ms: u32) -> Self {
        Self {
            flourish,
            scale_percent: 100,
            rotation_deg: 0,
            glow: None,
            duration_ms,
        }
    }

    #[cfg(feature = "serde")]
    fn default_scale() -> u16 {
        100
    }

    /// True if the descriptor declares a visible caster sub-effect.
    pub fn is_visible(&self) -> bool {
        !self.flourish.is_empty() && self.duration_ms > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectileVisual {
    Arrow,
    Orb,
    Fireball,
    Bolt,
    Shard,
}

/// Projectile phase: travels from caster anchor to target anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileSpec {
    pub visual: ProjectileVisual,
    /// Travel time in milliseconds.
    pub travel_ms: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trail: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactVisual {
    Slash,
    Burst,
    Explosion,
    Sparkle,
    Ripple,
}

/// Impact phase, played at the target's anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactSpec {
    pub visual: ImpactVisual,
    pub size_px: u16,
    pub duration_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionKind {
    Shake,
    Float,
    Highlight,
}

/// Target reaction phase; overlaps the impact phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionSpec {
    pub kind: ReactionKind,
    pub duration_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticleKind {
    Sparks,
    Embers,
    Frost,
    Motes,
    Leaves,
    Smoke,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleBurst {
    pub kind: ParticleKind,
    pub count: u16,
    pub duration_ms: u32,
    pub spread_px: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenFlash {
    pub color: Color,
    pub duration_ms: u32,
}

/// Catalog entry describing every visual sub-phase of one skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillEffectDescriptor {
    pub id: SkillId,
    pub category: SkillCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub caster: Option<CasterSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub projectile: Option<ProjectileSpec>,
    pub impact: ImpactSpec,
    pub reaction: ReactionSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub particles: Vec<ParticleBurst>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub screen_shake: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub screen_flash: Option<ScreenFlash>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub audio_cue: Option<String>,
}

impl SkillEffectDescriptor {
    /// Creates a melee/instant descriptor with only the mandatory phases.
    pub fn new(
        id: impl Into<SkillId>,
        category: SkillCategory,
        impact: ImpactSpec,
        reaction: ReactionSpec,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            caster: None,
            projectile: None,
            impact,
            reaction,
            particles: Vec::new(),
            screen_shake: false,
            screen_flash: None,
            audio_cue: None,
        }
    }

    pub fn with_caster(mut self, caster: CasterSpec) -> Self {
        self.caster = Some(caster);
        self
    }

    pub fn with_projectile(mut self, projectile: ProjectileSpec) -> Self {
        self.projectile = Some(projectile);
        self
    }

    pub fn with_particles(mut self, burst: ParticleBurst) -> Self {
        self.particles.push(burst);
        self
    }

    pub fn with_screen_shake(mut self) -> Self {
        self.screen_shake = true;
        self
    }

    pub fn with_screen_flash(mut self, flash: ScreenFlash) -> Self {
        self.screen_flash = Some(flash);
        self
    }

    pub fn with_audio_cue(mut self, cue: impl Into<String>) -> Self {
        self.audio_cue = Some(cue.into());
        self
    }

    /// Time the gating phases take when every visual resolves on schedule:
    /// caster, then projectile, then the longer of impact and reaction.
    pub fn gating_ms(&self) -> u32 {
        let caster = self
            .caster
            .as_ref()
            .filter(|spec| spec.is_visible())
            .map_or(0, |spec| spec.duration_ms);
        let projectile = self.projectile.as_ref().map_or(0, |spec| spec.travel_ms);
        caster + projectile + self.impact.duration_ms.max(self.reaction.duration_ms)
    }
}
