//! Routes profile card selections to the live card that owns the message.
use super::ids::selected_page;
use super::util::{defer_component, ephemeral_followup};
use crate::AppState;
use crate::profile::InteractionOutcome;
use serenity::model::application::ComponentInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

pub const EXPIRED_MESSAGE: &str = "This profile card has expired. Run the command again.";

#[tracing::instrument(level="debug", skip(ctx, component, app_state), fields(user_id = component.user.id.get(), message_id = component.message.id.get()))]
pub async fn handle(ctx: &Context, component: &ComponentInteraction, app_state: Arc<AppState>) {
    let Some(page) = selected_page(&component.data.kind) else {
        tracing::debug!(target="userinfo.select", cid=%component.data.custom_id, "not a page selection");
        return;
    };
    defer_component(ctx, component).await;
    match app_state
        .cards
        .dispatch(component.message.id, component.user.id, page)
        .await
    {
        Some(InteractionOutcome::Rendered(_)) => {}
        Some(InteractionOutcome::Denied(text)) => {
            ephemeral_followup(ctx, component, "denied", &text).await;
        }
        Some(InteractionOutcome::Expired) | None => {
            ephemeral_followup(ctx, component, "expired", EXPIRED_MESSAGE).await;
        }
    }
}
