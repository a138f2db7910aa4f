use crate::{AppState, commands, interactions};
use serenity::all::{ChunkGuildFilter, GuildMemberUpdateEvent};
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::application::{Command as SlashCommand, Interaction};
use serenity::model::guild::{Guild, Member};
use serenity::model::{channel::Message, gateway::Ready, id::GuildId};
use serenity::prelude::EventHandler;
use std::str::FromStr;

enum Command {
    UserInfo,
    Unknown,
}

impl FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "userinfo" | "ui" | "whois" => Ok(Command::UserInfo),
            _ => Ok(Command::Unknown),
        }
    }
}

pub struct Handler {
    /// Guild-scoped command registration when set, global otherwise.
    pub guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            tracing::error!(target = "handler", "AppState missing from context");
            return;
        };
        match &interaction {
            Interaction::Command(command) => match command.data.name.as_str() {
                "userinfo" => commands::userinfo::run_slash(&ctx, command).await,
                other => tracing::debug!(target = "handler", command = %other, "unknown command"),
            },
            Interaction::Component(component) => {
                if interactions::ids::family(&component.data.custom_id) == "userinfo" {
                    interactions::userinfo_handler::handle(&ctx, component, app_state).await
                }
            }
            _ => {}
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.guild_id.is_none() {
            return;
        }
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            return;
        };
        let Some(command_body) = msg.content.strip_prefix(app_state.prefix.as_str()) else {
            return;
        };
        let mut args = command_body.split_whitespace();
        let Some(command_str) = args.next() else {
            return;
        };
        let command = Command::from_str(command_str).unwrap_or(Command::Unknown);
        let args_vec: Vec<&str> = args.collect();
        match command {
            Command::UserInfo => commands::userinfo::run_prefix(&ctx, &msg, args_vec).await,
            Command::Unknown => {}
        }
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        // Large guilds arrive with a partial member list; join ranks need all of it.
        if (guild.members.len() as u64) < guild.member_count {
            tracing::debug!(target = "handler", guild_id = guild.id.get(), cached = guild.members.len(), member_count = guild.member_count, "requesting member chunks");
            ctx.shard
                .chunk_guild(guild.id, None, false, ChunkGuildFilter::None, None);
        }
    }

    async fn guild_member_update(
        &self,
        ctx: Context,
        old_if_available: Option<Member>,
        _new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        // Without the previous state there is nothing to record.
        let Some(old) = old_if_available else {
            return;
        };
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            return;
        };
        app_state
            .history
            .observe_change(
                event.guild_id,
                event.user.id,
                &old.user.name,
                &event.user.name,
                old.nick.as_deref(),
                event.nick.as_deref(),
            )
            .await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(target = "handler", user = %ready.user.name, "connected and ready");
        let commands_to_register = vec![commands::userinfo::register()];
        let result = match self.guild_id {
            Some(guild_id) => guild_id
                .set_commands(&ctx.http, commands_to_register)
                .await
                .map(|_| ()),
            None => SlashCommand::set_global_commands(&ctx.http, commands_to_register)
                .await
                .map(|_| ()),
        };
        match result {
            Ok(()) => tracing::info!(target = "handler", "registered application commands"),
            Err(e) => tracing::error!(target = "handler", error = ?e, "command registration failed"),
        }
    }
}
