//! This module implements the `userinfo` command in both prefix and slash formats.
//! It opens an interactive profile card for a member of the current server.

use crate::AppState;
use crate::profile::{CardRequest, InteractiveComponent};
use crate::services::SerenityMessage;
use crate::services::directory::to_utc;
use crate::ui::style::error_embed;
use crate::ui::{page_embed, page_selector};
use chrono::Utc;
use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditInteractionResponse,
};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{error, warn};

const GUILD_ONLY: &str = "This command can only be used in a server.";

pub fn register() -> CreateCommand {
    CreateCommand::new("userinfo")
        .description("Show a member's profile card.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "The member to look up (defaults to you).",
            )
            .required(false),
        )
}

/// The entry point for the slash command `/userinfo`.
pub async fn run_slash(ctx: &Context, command: &CommandInteraction) {
    let Some(guild_id) = command.guild_id else {
        let builder = CreateInteractionResponseMessage::new()
            .content(GUILD_ONLY)
            .ephemeral(true);
        command
            .create_response(&ctx.http, CreateInteractionResponse::Message(builder))
            .await
            .ok();
        return;
    };
    let Some(app_state) = AppState::from_ctx(ctx).await else {
        error!(target = "userinfo.command", "AppState missing from context");
        return;
    };
    if let Err(e) = command.defer(&ctx.http).await {
        warn!(target = "userinfo.command", error = ?e, "failed to defer slash interaction");
        return;
    }

    let target = command
        .data
        .options
        .first()
        .and_then(|opt| opt.value.as_user_id())
        .unwrap_or(command.user.id);
    let request = CardRequest {
        guild_id,
        requester: command.user.id,
        target,
        reference_time: to_utc(command.id.created_at()).unwrap_or_else(Utc::now),
    };

    let component = match InteractiveComponent::open(app_state.card_deps(ctx), request).await {
        Ok(component) => component,
        Err(e) => {
            warn!(target = "userinfo.command", target_id = target.get(), error = %e, "member lookup failed");
            let builder = EditInteractionResponse::new().embed(not_found_embed());
            command.edit_response(&ctx.http, builder).await.ok();
            return;
        }
    };

    let home = component.home_payload().await;
    let builder = EditInteractionResponse::new()
        .embed(page_embed(&home))
        .components(page_selector(&component.selector()));
    match command.edit_response(&ctx.http, builder).await {
        Ok(message) => launch(ctx, &app_state, component, &message).await,
        Err(e) => error!(target = "userinfo.command", error = ?e, "failed to send profile card"),
    }
}

/// The entry point for the prefix command `userinfo [@user | id]`.
pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(guild_id) = msg.guild_id else {
        msg.reply(&ctx.http, GUILD_ONLY).await.ok();
        return;
    };
    let Some(app_state) = AppState::from_ctx(ctx).await else {
        error!(target = "userinfo.command", "AppState missing from context");
        return;
    };

    let request = CardRequest {
        guild_id,
        requester: msg.author.id,
        target: prefix_target(msg, &args),
        reference_time: to_utc(msg.timestamp).unwrap_or_else(Utc::now),
    };
    let component = match InteractiveComponent::open(app_state.card_deps(ctx), request).await {
        Ok(component) => component,
        Err(e) => {
            warn!(target = "userinfo.command", target_id = request.target.get(), error = %e, "member lookup failed");
            let builder = CreateMessage::new()
                .embed(not_found_embed())
                .reference_message(msg);
            msg.channel_id.send_message(&ctx.http, builder).await.ok();
            return;
        }
    };

    let home = component.home_payload().await;
    let builder = CreateMessage::new()
        .embed(page_embed(&home))
        .components(page_selector(&component.selector()))
        .reference_message(msg);
    match msg.channel_id.send_message(&ctx.http, builder).await {
        Ok(message) => launch(ctx, &app_state, component, &message).await,
        Err(e) => error!(target = "userinfo.command", error = ?e, "failed to send profile card"),
    }
}

/// Attach the sent message to the card and hand it to the card manager.
async fn launch(
    ctx: &Context,
    app_state: &Arc<AppState>,
    mut component: InteractiveComponent,
    message: &Message,
) {
    component.attach_message(Arc::new(SerenityMessage::new(
        ctx.http.clone(),
        message.channel_id,
        message.id,
    )));
    app_state.cards.register(message.id, component).await;
}

/// First mention, then a raw id argument, then the author.
fn prefix_target(msg: &Message, args: &[&str]) -> UserId {
    msg.mentions
        .iter()
        .map(|u| u.id)
        .next()
        .or_else(|| parse_user_arg(args.first().copied()?))
        .unwrap_or(msg.author.id)
}

/// Accepts `123`, `<@123>` and `<@!123>`.
pub fn parse_user_arg(arg: &str) -> Option<UserId> {
    let raw = arg
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches('!'))
        .unwrap_or(arg);
    match raw.parse::<u64>() {
        Ok(id) if id != 0 => Some(UserId::new(id)),
        _ => None,
    }
}

fn not_found_embed() -> serenity::builder::CreateEmbed {
    error_embed(
        "Member Not Found",
        "I couldn't find that member in this server.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_args_parse() {
        assert_eq!(parse_user_arg("42"), Some(UserId::new(42)));
        assert_eq!(parse_user_arg("<@42>"), Some(UserId::new(42)));
        assert_eq!(parse_user_arg("<@!42>"), Some(UserId::new(42)));
        assert_eq!(parse_user_arg("<@&42>"), None);
        assert_eq!(parse_user_arg("0"), None);
        assert_eq!(parse_user_arg("bob"), None);
    }
}
