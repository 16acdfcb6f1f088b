//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event
//! loop until the process exits. Long polling — no public URL required.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

use crate::context::AppContext;
use crate::handler::handle_message;

pub struct TelegramAdapter {
    ctx: Arc<AppContext>,
}

impl TelegramAdapter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Never returns — runs for the lifetime of the process. If `tick_rx`
    /// is `Some`, the scheduled digest delivery task is spawned alongside.
    pub async fn run(self, bot: Bot, tick_rx: Option<mpsc::Receiver<DateTime<Utc>>>) {
        if let Some(rx) = tick_rx {
            let bot2 = bot.clone();
            let ctx2 = Arc::clone(&self.ctx);
            tokio::spawn(crate::broadcast::run_scheduled_delivery(bot2, ctx2, rx));
        }

        info!("Telegram: starting long-polling dispatcher");

        let handler = Update::filter_message().endpoint(handle_message);

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![self.ctx])
            .default_handler(|_upd| async {})
            .build()
            .dispatch()
            .await;
    }
}
