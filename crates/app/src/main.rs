//! ChannelSync - integrated channel sync worker
//!
//! `channelsync` runs the cron scheduler until interrupted.
//! `channelsync --once` dispatches one round of jobs and exits.

use anyhow::Context;
use channelsync_app::{error_label, init_tracing, AppContext};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = channelsync_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => warn!(error = %e, "Could not load .env file"),
    }

    let run_once = std::env::args().skip(1).any(|arg| arg == "--once");
    let scheduler_enabled = config.scheduler.enabled;

    let ctx = AppContext::new(config).await.inspect_err(|err| {
        error!(error = %err, label = error_label(err), "Failed to initialise application context");
    })?;

    if run_once {
        let submitted = ctx.run_once().await?;
        info!(submitted, "Single sync round finished");
        return Ok(());
    }

    if !scheduler_enabled {
        warn!("Scheduler disabled; nothing to do. Use --once for a single round");
        return Ok(());
    }

    ctx.start_scheduler().await?;
    info!("ChannelSync running; press Ctrl+C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("Shutdown requested");

    ctx.shutdown().await?;
    info!("ChannelSync stopped");
    Ok(())
}
