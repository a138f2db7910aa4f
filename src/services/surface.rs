//! Message surface that edits the sent card through the HTTP API.
use crate::profile::{MessageSurface, MessageUpdate, SurfaceError};
use crate::ui::{page_embed, page_selector};
use async_trait::async_trait;
use serenity::builder::EditMessage;
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;

pub struct SerenityMessage {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl SerenityMessage {
    pub fn new(http: Arc<Http>, channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            http,
            channel_id,
            message_id,
        }
    }
}

#[async_trait]
impl MessageSurface for SerenityMessage {
    async fn edit(&self, update: MessageUpdate) -> Result<(), SurfaceError> {
        let mut builder = EditMessage::new().components(page_selector(&update.selector));
        if let Some(payload) = &update.payload {
            builder = builder.embed(page_embed(payload));
        }
        self.channel_id
            .edit_message(&self.http, self.message_id, builder)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::debug!(target="ui.edit", message_id=self.message_id.get(), error=?e, "edit_message failed");
                SurfaceError::Edit(e.to_string())
            })
    }
}
