//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which visual backend the battle runs against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualMode {
    /// Phases take their declared time.
    #[default]
    Headless,
    /// Phases finish immediately.
    Instant,
}

impl FromStr for VisualMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "headless" => Ok(VisualMode::Headless),
            "instant" => Ok(VisualMode::Instant),
            other => Err(format!("unknown visual mode '{other}'")),
        }
    }
}

/// Content and battle selection for one client run.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub preset: String,
    pub roster_path: Option<PathBuf>,
    pub effects_path: Option<PathBuf>,
    pub battle_config_path: Option<PathBuf>,
    pub visuals: VisualMode,
    pub seed: Option<u64>,
    /// Upper bound on player half-turns before the client gives up.
    pub max_player_turns: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            preset: "skirmish".to_owned(),
            roster_path: None,
            effects_path: None,
            battle_config_path: None,
            visuals: VisualMode::default(),
            seed: None,
            max_player_turns: 200,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_PRESET` - Built-in roster preset (default: skirmish)
    /// - `BATTLE_ROSTER` - Path to a RON roster; overrides the preset
    /// - `BATTLE_EFFECTS` - Path to a RON effect catalog (default: built-in)
    /// - `BATTLE_CONFIG` - Path to a TOML battle config (default: built-in)
    /// - `BATTLE_VISUALS` - `headless` or `instant` (default: headless)
    /// - `BATTLE_SEED` - Seed for enemy decisions (default: entropy)
    /// - `BATTLE_MAX_TURNS` - Player half-turn limit (default: 200)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(preset) = env::var("BATTLE_PRESET") {
            config.preset = preset;
        }
        config.roster_path = env::var("BATTLE_ROSTER").ok().map(PathBuf::from);
        config.effects_path = env::var("BATTLE_EFFECTS").ok().map(PathBuf::from);
        config.battle_config_path = env::var("BATTLE_CONFIG").ok().map(PathBuf::from);

        if let Some(visuals) = read_env::<VisualMode>("BATTLE_VISUALS") {
            config.visuals = visuals;
        }
        config.seed = read_env::<u64>("BATTLE_SEED");
        if let Some(limit) = read_env::<u32>("BATTLE_MAX_TURNS") {
            config.max_player_turns = limit.max(1);
        }

        config
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_mode_parses_case_insensitively() {
        assert_eq!("Instant".parse::<VisualMode>(), Ok(VisualMode::Instant));
        assert_eq!(" headless ".parse::<VisualMode>(), Ok(VisualMode::Headless));
        assert!("fancy".parse::<VisualMode>().is_err());
    }
}
