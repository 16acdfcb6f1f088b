//! EpiWatch bot — daily TV airing digests for Telegram groups.
//!
//! Bootstraps config, registry and scheduler, then hands control to the
//! teloxide dispatcher until ctrl-c. Configuration failures exit non-zero
//! before anything is spawned; everything after startup degrades instead
//! of crashing.

use std::sync::Arc;

use teloxide::prelude::*;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use epiwatch_core::EpiwatchConfig;
use epiwatch_registry::{RegistryService, RegistryStore};
use epiwatch_scheduler::{CronSchedule, ScheduleTrigger};
use epiwatch_telegram::{AppContext, TelegramAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epiwatch=info".into()),
        )
        .init();

    // config: explicit path via EPIWATCH_CONFIG, else ./epiwatch.toml;
    // env vars override either way.
    let config_path = std::env::var("EPIWATCH_CONFIG").ok();
    let config = match EpiwatchConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let schedule = match CronSchedule::parse(&config.schedule_time) {
        Ok(schedule) => schedule,
        Err(e) => {
            error!(pattern = %config.schedule_time, "invalid SCHEDULE_TIME: {e}");
            std::process::exit(1);
        }
    };

    let registry = RegistryService::open(RegistryStore::new(&config.storage_path));
    let bot = Bot::new(&config.bot_token);

    match bot.get_me().await {
        Ok(me) => info!(
            username = me.user.username.as_deref().unwrap_or(""),
            id = me.user.id.0,
            "bot initialized"
        ),
        Err(e) => {
            error!("failed to initialize bot: {e}");
            std::process::exit(1);
        }
    }

    let ctx = Arc::new(AppContext { config, registry });

    let (tick_tx, tick_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(ScheduleTrigger::new(schedule, tick_tx).run(shutdown_rx));
    info!(pattern = %ctx.config.schedule_time, "daily digest scheduled");

    let adapter = TelegramAdapter::new(Arc::clone(&ctx));
    let dispatcher = tokio::spawn(adapter.run(bot, Some(tick_rx)));

    tokio::signal::ctrl_c().await?;
    info!("shutting down, saving registry");
    let _ = shutdown_tx.send(true);
    ctx.registry.save();
    dispatcher.abort();

    Ok(())
}
