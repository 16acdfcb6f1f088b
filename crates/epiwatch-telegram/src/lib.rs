//! `epiwatch-telegram` — the Telegram face of the bot.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` for the command surface
//! (`/start`, `/settopic`, `/update`), implements the delivery
//! [`epiwatch_delivery::Transport`] on top of `sendMessage`/`sendPhoto`,
//! and hosts the background task that turns scheduler ticks into fan-out
//! runs.

pub mod adapter;
pub mod broadcast;
pub mod context;
pub mod handler;
pub mod send;

pub use adapter::TelegramAdapter;
pub use context::AppContext;
pub use send::TelegramTransport;
