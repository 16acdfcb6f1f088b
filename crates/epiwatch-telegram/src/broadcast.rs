//! Scheduled digest runs — turns scheduler ticks into fan-out deliveries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use teloxide::Bot;
use tokio::sync::mpsc;
use tracing::{info, warn};

use epiwatch_delivery::{deliver_all, render_digest};
use epiwatch_scraper::{extract, HttpPageSource};

use crate::context::AppContext;
use crate::send::TelegramTransport;

/// Background task that receives cron ticks and runs one extraction +
/// fan-out per tick. Spawned once in `adapter.rs`; runs for the lifetime
/// of the Telegram connection. A failed run only affects that tick.
pub async fn run_scheduled_delivery(
    bot: Bot,
    ctx: Arc<AppContext>,
    mut tick_rx: mpsc::Receiver<DateTime<Utc>>,
) {
    while let Some(fired_at) = tick_rx.recv().await {
        info!(fired_at = %fired_at.to_rfc3339(), "scheduled digest run starting");

        // Registry snapshot taken once per run: chats authorized after
        // this point wait for the next tick.
        let destinations = ctx.registry.snapshot();
        if destinations.is_empty() {
            info!("no authorized chats, skipping digest run");
            continue;
        }

        let source = HttpPageSource::new(&ctx.config.source_url);
        let extraction = extract(&source).await;
        if extraction.is_degraded() {
            warn!("extraction degraded, delivering sentinel digest");
        }
        let message = render_digest(extraction.snapshot(), ctx.config.footer.as_deref());

        let transport = TelegramTransport::new(bot.clone());
        let report = deliver_all(&transport, extraction.snapshot(), &message, &destinations).await;
        if report.failed() > 0 {
            warn!(
                failed = report.failed(),
                total = report.len(),
                "some destinations failed this digest run"
            );
        }
    }

    info!("scheduled delivery task exiting (channel closed)");
}
