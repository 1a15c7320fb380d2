//! Headless battle client binary.
//!
//! Loads `.env`, reads `BATTLE_*` configuration, plays one battle with the
//! autopilot and prints the summary as JSON on stdout.
//!
//! ```bash
//! BATTLE_PRESET=duel BATTLE_VISUALS=instant cargo run -p battle-client
//! ```

use anyhow::Result;

use battle_client::{ClientConfig, logging, run_battle};
use battle_runtime::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::setup_logging()?;

    let runtime_config = RuntimeConfig::from_env();
    let config = ClientConfig::from_env();

    tracing::info!(
        preset = %config.preset,
        visuals = ?config.visuals,
        seed = ?config.seed,
        "starting battle"
    );

    match run_battle(&config, runtime_config).await? {
        Some(summary) => {
            tracing::info!(outcome = %summary.outcome, turns = summary.turn_count, "battle finished");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => tracing::warn!("battle aborted without an outcome"),
    }

    Ok(())
}
