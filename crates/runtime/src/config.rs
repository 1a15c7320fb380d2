//! Runtime configuration and environment loading.
use std::env;
use std::time::Duration;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub timings: SequencerTimings,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            timings: SequencerTimings::default(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `BATTLE_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `BATTLE_COMPLETION_GRACE_MS` - Delay before a cast completes (default: 150)
    /// - `BATTLE_PARTICLE_STAGGER_MS` - Offset between particle bursts (default: 80)
    /// - `BATTLE_ENEMY_PASS_DELAY_MS` - Pause before an idle enemy side passes (default: 600)
    /// - `BATTLE_SHAKE_MS` - Screen shake duration (default: 400)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("BATTLE_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("BATTLE_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        let timings = &mut config.timings;
        if let Some(ms) = read_env::<u64>("BATTLE_COMPLETION_GRACE_MS") {
            timings.completion_grace = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("BATTLE_PARTICLE_STAGGER_MS") {
            timings.particle_stagger = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("BATTLE_ENEMY_PASS_DELAY_MS") {
            timings.enemy_pass_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("BATTLE_SHAKE_MS") {
            timings.shake_duration = Duration::from_millis(ms);
        }

        config
    }
}

/// Fixed delays used by the animation sequencer and the battle worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerTimings {
    /// Pause after the gating phases so callouts and particles register.
    pub completion_grace: Duration,
    pub particle_stagger: Duration,
    pub enemy_pass_delay: Duration,
    pub shake_duration: Duration,
}

impl Default for SequencerTimings {
    fn default() -> Self {
        Self {
            completion_grace: Duration::from_millis(150),
            particle_stagger: Duration::from_millis(80),
            enemy_pass_delay: Duration::from_millis(600),
            shake_duration: Duration::from_millis(400),
        }
    }
}

impl SequencerTimings {
    /// No artificial delays at all.
    pub const fn instant() -> Self {
        Self {
            completion_grace: Duration::ZERO,
            particle_stagger: Duration::ZERO,
            enemy_pass_delay: Duration::ZERO,
            shake_duration: Duration::ZERO,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
