//! Delivery primitives on top of the Telegram API.
//!
//! Messages are sent with `ParseMode::Html` (the digest embeds `<b>` tags)
//! and routed to the destination's topic when one is stored. Errors map
//! into [`TransportError`] so the delivery engine can degrade per
//! destination; nothing is retried here.

use async_trait::async_trait;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode, Recipient, ThreadId};
use url::Url;

use epiwatch_core::ChatIdentity;
use epiwatch_delivery::{Transport, TransportError};

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Map a registry identity onto a Telegram recipient.
///
/// Integer identities (and numeric strings from old storage files) are
/// chat IDs; anything else is treated as a channel username.
pub(crate) fn recipient(chat: &ChatIdentity) -> Recipient {
    match chat {
        ChatIdentity::Int(id) => Recipient::Id(ChatId(*id)),
        ChatIdentity::Str(s) => match s.parse::<i64>() {
            Ok(id) => Recipient::Id(ChatId(id)),
            Err(_) => Recipient::ChannelUsername(s.clone()),
        },
    }
}

pub(crate) fn thread_id(topic_id: i64) -> ThreadId {
    ThreadId(MessageId(topic_id as i32))
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat: &ChatIdentity,
        topic_id: Option<i64>,
        body: &str,
    ) -> Result<(), TransportError> {
        let mut request = self
            .bot
            .send_message(recipient(chat), body)
            .parse_mode(ParseMode::Html);
        if let Some(topic) = topic_id {
            request = request.message_thread_id(thread_id(topic));
        }
        request
            .await
            .map_err(|e| TransportError::Text(e.to_string()))?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat: &ChatIdentity,
        topic_id: Option<i64>,
        image_url: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        let url = Url::parse(image_url)
            .map_err(|e| TransportError::Image(format!("bad image url {image_url:?}: {e}")))?;

        let mut request = self
            .bot
            .send_photo(recipient(chat), InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(topic) = topic_id {
            request = request.message_thread_id(thread_id(topic));
        }
        request
            .await
            .map_err(|e| TransportError::Image(e.to_string()))?;
        Ok(())
    }
}
