//! Command handler registered in the teloxide Dispatcher.
//!
//! Three commands, straight from the product surface:
//! - `/start` — authorization handshake (bot must be an administrator)
//! - `/settopic [id]` — re-route updates to a forum topic
//! - `/update` — one-shot digest for this chat only
//!
//! Everything else is ignored. `NotAuthorized` is a normal result here,
//! translated into a user notice.

use std::sync::Arc;

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use tracing::{info, warn};

use epiwatch_core::{ChatIdentity, Destination};
use epiwatch_delivery::{deliver_one, render_digest, DeliveryOutcome};
use epiwatch_registry::RegistryError;
use epiwatch_scraper::{extract, HttpPageSource};

use crate::context::AppContext;
use crate::send::TelegramTransport;

pub async fn handle_message(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> ResponseResult<()> {
    // Ignore messages from other bots.
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    match command_of(text) {
        "/start" => handle_start(&bot, &msg, &ctx).await,
        "/settopic" => handle_settopic(&bot, &msg, &ctx, text).await,
        "/update" => handle_update(&bot, &msg, &ctx).await,
        _ => Ok(()),
    }
}

/// First token of the message with any `@BotName` suffix stripped.
fn command_of(text: &str) -> &str {
    let first = text.split_whitespace().next().unwrap_or("");
    first.split('@').next().unwrap_or("")
}

/// Reply within the same topic the command arrived in.
async fn reply(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<()> {
    let mut request = bot.send_message(msg.chat.id, text);
    if let Some(thread) = msg.thread_id {
        request = request.message_thread_id(thread);
    }
    request.await?;
    Ok(())
}

async fn handle_start(bot: &Bot, msg: &Message, ctx: &AppContext) -> ResponseResult<()> {
    if msg.chat.is_private() {
        return reply(
            bot,
            msg,
            "Please add me to a group and make me an administrator to enable daily updates.",
        )
        .await;
    }

    let me = bot.get_me().await?;
    let member = match bot.get_chat_member(msg.chat.id, me.user.id).await {
        Ok(member) => member,
        Err(e) => {
            warn!(chat = %msg.chat.id, error = %e, "admin status check failed");
            return reply(
                bot,
                msg,
                "An error occurred while checking permissions. Please ensure the bot \
                 is an administrator and try again.",
            )
            .await;
        }
    };

    if !member.is_administrator() {
        warn!(chat = %msg.chat.id, "bot is not an administrator in this chat");
        return reply(
            bot,
            msg,
            "Please make me an administrator to enable daily updates.",
        )
        .await;
    }

    let thread = msg.thread_id.map(|t| t.0 .0 as i64);
    let topic = thread.or(ctx.config.default_topic_id);
    ctx.registry
        .authorize(ChatIdentity::Int(msg.chat.id.0), topic);
    info!(chat = %msg.chat.id, topic = ?topic, "chat authorized via /start");

    let notice = match (thread, ctx.config.default_topic_id) {
        (Some(id), _) => {
            format!("Bot is now active and will send updates to this topic (ID: {id})!")
        }
        (None, Some(id)) => format!(
            "Bot is now active and will send updates to the configured default topic (ID: {id})!"
        ),
        (None, None) => {
            "Bot is now active and will send updates to the general section!".to_string()
        }
    };
    reply(bot, msg, &notice).await
}

async fn handle_settopic(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    text: &str,
) -> ResponseResult<()> {
    let chat = ChatIdentity::Int(msg.chat.id.0);

    // Explicit argument beats the current thread; neither means general.
    let topic = text
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<i64>().ok())
        .or_else(|| msg.thread_id.map(|t| t.0 .0 as i64));

    match ctx.registry.set_topic(&chat, topic) {
        Ok(()) => {
            let notice = match topic {
                Some(id) => format!("Bot will now send updates to topic ID: {id}"),
                None => "Bot will now send updates to the general section".to_string(),
            };
            reply(bot, msg, &notice).await
        }
        Err(RegistryError::NotAuthorized { .. }) => {
            reply(
                bot,
                msg,
                "This group is not authorized. Please use /start to authorize the bot first.",
            )
            .await
        }
        Err(e) => {
            warn!(chat = %chat, error = %e, "settopic failed");
            Ok(())
        }
    }
}

async fn handle_update(bot: &Bot, msg: &Message, ctx: &AppContext) -> ResponseResult<()> {
    let chat = ChatIdentity::Int(msg.chat.id.0);

    if !ctx.registry.is_authorized(&chat) {
        return reply(
            bot,
            msg,
            "This group is not authorized. Please use /start to authorize the bot first.",
        )
        .await;
    }

    reply(bot, msg, "Fetching today's TV shows...").await?;

    let source = HttpPageSource::new(&ctx.config.source_url);
    let extraction = extract(&source).await;
    let message = render_digest(extraction.snapshot(), ctx.config.footer.as_deref());

    let dest = Destination {
        topic_id: ctx.registry.topic_of(&chat),
        chat: chat.clone(),
    };
    let transport = TelegramTransport::new(bot.clone());
    let outcome = deliver_one(&transport, extraction.snapshot(), &message, &dest).await;

    if let DeliveryOutcome::Failed(reason) = outcome {
        warn!(chat = %chat, %reason, "manual update delivery failed");
        return reply(
            bot,
            msg,
            "An error occurred while fetching TV shows. Please try again later.",
        )
        .await;
    }
    info!(chat = %chat, "manual update delivered");
    Ok(())
}
