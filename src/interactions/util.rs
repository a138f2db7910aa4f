//! Shared interaction utility helpers (single defer + ephemeral follow-up).
use serenity::builder::CreateInteractionResponseFollowup;
use serenity::model::application::ComponentInteraction;
use serenity::prelude::Context;

/// Acknowledge a component interaction (non-ephemeral) ignoring duplicate/late errors.
pub async fn defer_component(ctx: &Context, c: &ComponentInteraction) {
    if let Err(e) = c.defer(&ctx.http).await {
        tracing::debug!(target="ui.defer", cid=%c.data.custom_id, error=?e, "defer failed (already acknowledged?)");
    }
}

/// Send a private note to whoever clicked, after the interaction was deferred.
pub async fn ephemeral_followup(ctx: &Context, c: &ComponentInteraction, tag: &str, text: &str) {
    let builder = CreateInteractionResponseFollowup::new()
        .content(text)
        .ephemeral(true);
    if let Err(e) = c.create_followup(&ctx.http, builder).await {
        tracing::error!(target="ui.followup", cid=%c.data.custom_id, tag=%tag, error=?e, "create_followup failed");
    }
}
