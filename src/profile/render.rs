//! Page payload construction.
use super::directory::{Directory, NameHistory};
use super::page::PageId;
use super::snapshot::{MemberJoin, MemberSnapshot, PresenceSnapshot};
use super::truncate::format_bounded;
use crate::constants::ROLE_DISPLAY_BUDGET;
use chrono::{DateTime, Utc};
use regex::Regex;
use serenity::model::id::{GuildId, UserId};
use std::sync::{Arc, LazyLock};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Host-agnostic embed description. Converted into a serenity `CreateEmbed` at the edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePayload {
    pub title: String,
    pub description: Option<String>,
    pub colour: u32,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl PagePayload {
    fn titled(title: String, colour: u32) -> Self {
        Self {
            title,
            colour,
            ..Default::default()
        }
    }

    fn field(&mut self, name: &str, value: String, inline: bool) {
        self.fields.push(EmbedField {
            name: name.to_string(),
            value,
            inline,
        });
    }

    pub fn field_named(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub struct PageRenderer {
    directory: Arc<dyn Directory>,
    history: Arc<dyn NameHistory>,
    guild_id: GuildId,
    show_presence: bool,
    /// Stand-in join time for members without one, taken from the invoking message.
    reference_time: DateTime<Utc>,
}

impl PageRenderer {
    pub fn new(
        directory: Arc<dyn Directory>,
        history: Arc<dyn NameHistory>,
        guild_id: GuildId,
        show_presence: bool,
        reference_time: DateTime<Utc>,
    ) -> Self {
        Self {
            directory,
            history,
            guild_id,
            show_presence,
            reference_time,
        }
    }

    /// Re-read the member; on failure keep rendering from `fallback`.
    pub async fn current(&self, fallback: &MemberSnapshot) -> MemberSnapshot {
        match self
            .directory
            .member_snapshot(self.guild_id, fallback.user_id)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(target = "profile.render", user_id = fallback.user_id.get(), error = %e, "snapshot refresh failed; using last known");
                fallback.clone()
            }
        }
    }

    /// Render any page other than the memoized Home from fresh data.
    pub async fn render(&self, page: PageId, target: &MemberSnapshot) -> PagePayload {
        match page {
            PageId::Home => self.home(target).await,
            PageId::Avatar => avatar_page(target),
            PageId::GuildAvatar => guild_avatar_page(target),
            PageId::Banner => self.banner(target).await,
            PageId::Roles => roles_page(target),
        }
    }

    #[instrument(level = "debug", skip(self, target), fields(user_id = target.user_id.get()))]
    pub async fn home(&self, target: &MemberSnapshot) -> PagePayload {
        let (names, members) = tokio::join!(
            self.history.names(self.guild_id, target.user_id),
            self.directory.list_guild_members(self.guild_id)
        );
        let names = names
            .inspect_err(|e| warn!(target = "profile.render", error = %e, "name history lookup failed"))
            .unwrap_or_default();
        let rank = match members {
            Ok(members) => Some(join_rank(
                &members,
                target.user_id,
                target.joined_at,
                self.reference_time,
            )),
            Err(e) => {
                warn!(target = "profile.render", error = %e, "member listing failed");
                None
            }
        };

        let mut description = if self.show_presence {
            target.presence.as_ref().map(presence_block).unwrap_or_default()
        } else {
            String::new()
        };
        if target.mutual_guilds > 1 {
            description.push_str(&format!("**Shared Servers: {}**", target.mutual_guilds));
        } else {
            description.push_str(&format!("**Shared Server: {}**", target.mutual_guilds));
        }

        let mut embed = PagePayload::titled(title_for(target), target.colour);
        embed.description = Some(description);
        embed.thumbnail = Some(target.display_avatar_url.clone());

        embed.field("Joined Discord on:", timestamp_pair(Some(target.created_at)), true);
        embed.field("Joined this Server on:", timestamp_pair(target.joined_at), true);
        if let Some(usernames) = names.usernames.filter(|n| !n.is_empty()) {
            embed.field("Previous Names:", filter_invites(&usernames.join(", ")), false);
        }
        if let Some(nicknames) = names.nicknames.filter(|n| !n.is_empty()) {
            embed.field("Previous Nicknames:", filter_invites(&nicknames.join(", ")), false);
        }
        if let Some(channel) = target.voice_channel {
            embed.field(
                "Current Voice Channel:",
                format!("<#{0}> ID: {0}", channel),
                false,
            );
        }
        if !target.badges.is_empty() {
            let name = if target.badges.len() > 1 { "Badges:" } else { "Badge:" };
            embed.field(name, target.badges.join("\n"), false);
        }
        if !target.special_badges.is_empty() {
            let name = if target.special_badges.len() > 1 {
                "Special Badges:"
            } else {
                "Special Badge:"
            };
            embed.field(name, target.special_badges.join("\n"), false);
        }

        embed.footer = Some(match rank {
            Some(rank) => format!("Member #{} | User ID: {}", rank, target.user_id),
            None => format!("User ID: {}", target.user_id),
        });
        embed
    }

    #[instrument(level = "debug", skip(self, target), fields(user_id = target.user_id.get()))]
    pub async fn banner(&self, target: &MemberSnapshot) -> PagePayload {
        let mut embed = PagePayload::titled(
            format!("{}'s Banner", target.display_name),
            target.colour,
        );
        match self.directory.fetch_user_profile(target.user_id).await {
            Ok(profile) => match profile.banner_url {
                Some(url) => embed.image = Some(url),
                None => {
                    embed.description =
                        Some(format!("{} does not have a banner.", target.mention()))
                }
            },
            Err(e) => {
                warn!(target = "profile.render", error = %e, "banner fetch failed; omitting image");
            }
        }
        embed
    }
}

pub fn avatar_page(target: &MemberSnapshot) -> PagePayload {
    let mut embed = PagePayload::titled(format!("{}'s Avatar", target.display_name), target.colour);
    embed.image = Some(
        target
            .avatar_url
            .clone()
            .unwrap_or_else(|| target.default_avatar_url.clone()),
    );
    embed
}

pub fn guild_avatar_page(target: &MemberSnapshot) -> PagePayload {
    let mut embed = PagePayload::titled(
        format!("{}'s Guild Avatar", target.display_name),
        target.colour,
    );
    match &target.guild_avatar_url {
        Some(url) => embed.image = Some(url.clone()),
        None => {
            embed.description = Some(format!(
                "{} does not have a guild specific avatar.",
                target.mention()
            ))
        }
    }
    embed
}

pub fn roles_page(target: &MemberSnapshot) -> PagePayload {
    let mut embed = PagePayload::titled(format!("{}'s Roles", target.display_name), target.colour);
    embed.description = Some(
        format_bounded(&target.roles, ROLE_DISPLAY_BUDGET)
            .into_text()
            .unwrap_or_else(|| {
                format!(
                    "{} does not have any roles in this server.",
                    target.mention()
                )
            }),
    );
    embed
}

fn title_for(target: &MemberSnapshot) -> String {
    match &target.nickname {
        Some(nick) => format!("{} ~ {}", target.username, nick),
        None => target.display_name.clone(),
    }
}

fn timestamp_pair(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => {
            let secs = at.timestamp();
            format!("<t:{secs}>\n( <t:{secs}:R> )\n")
        }
        None => "Unknown\n( ? )\n".to_string(),
    }
}

fn presence_block(presence: &PresenceSnapshot) -> String {
    let devices = presence
        .devices
        .iter()
        .map(|(device, status)| format!("{} {}", status.emoji(), device.label()))
        .collect::<Vec<_>>()
        .join(" ");
    match &presence.activity {
        Some(activity) => format!("{activity}\n**Devices:** {devices}\n\n"),
        None if devices.is_empty() => String::new(),
        None => format!("{devices}\n\n"),
    }
}

/// 1-based position of `target` when members are ordered by join time. Members without a join
/// time sort as if they joined at `reference`. Ties keep listing order.
///
/// The listing may be partial (large guilds are not fully cached). A target missing from it is
/// placed by `target_joined_at`: one past the number of listed members who joined earlier.
pub fn join_rank(
    members: &[MemberJoin],
    target: UserId,
    target_joined_at: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
) -> usize {
    let key = |joined_at: Option<DateTime<Utc>>| joined_at.unwrap_or(reference);
    let mut ordered: Vec<&MemberJoin> = members.iter().collect();
    ordered.sort_by_key(|m| key(m.joined_at));
    if let Some(idx) = ordered.iter().position(|m| m.user_id == target) {
        return idx + 1;
    }
    let target_key = key(target_joined_at);
    1 + members
        .iter()
        .filter(|m| key(m.joined_at) < target_key)
        .count()
}

static INVITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?(?:discord\.(?:gg|io|me|li)|discord(?:app)?\.com/invite)/\S+")
        .expect("invite pattern is valid")
});

/// Replace Discord invite links so names cannot be used to advertise servers.
pub fn filter_invites(text: &str) -> String {
    INVITE_RE.replace_all(text, "[SANITIZED INVITE]").into_owned()
}
