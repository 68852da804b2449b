//! Fleet simulator binary
//!
//! Thin bootstrap: build the fleet from defaults (optionally overridden by
//! `METERSIM_COUNT` and `METERSIM_BASE_PORT`), start it, run until Ctrl-C,
//! stop it.

use anyhow::Context;
use metersim::{FleetConfig, FleetManager};

fn config_from_env() -> anyhow::Result<FleetConfig> {
    let mut config = FleetConfig::default();
    if let Ok(count) = std::env::var("METERSIM_COUNT") {
        config.meter_count = count
            .parse()
            .with_context(|| format!("invalid METERSIM_COUNT: {}", count))?;
    }
    if let Ok(port) = std::env::var("METERSIM_BASE_PORT") {
        config.base_port = port
            .parse()
            .with_context(|| format!("invalid METERSIM_BASE_PORT: {}", port))?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config_from_env()?;
    let fleet = FleetManager::new(config)?;
    let outcomes = fleet.start_all().await;
    let started = outcomes.iter().filter(|o| o.result.is_ok()).count();
    if started == 0 {
        fleet.stop_all().await;
        anyhow::bail!("no meter instance could be started");
    }

    log::info!("Press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    fleet.stop_all().await;
    Ok(())
}
