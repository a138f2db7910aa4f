//! Member directory backed by the serenity cache, with HTTP fallbacks.
use crate::profile::snapshot::{Device, Status};
use crate::profile::{
    Directory, DirectoryError, MemberJoin, MemberSnapshot, PresenceSnapshot, UserProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    ActivityType, Cache, Guild, Http, Member, OnlineStatus, Presence, Role, Timestamp,
    UserPublicFlags,
};
use serenity::model::id::{GuildId, UserId};
use serenity::prelude::Context;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Members fetched per page when the guild is not cached.
const HTTP_MEMBER_PAGE: u64 = 1000;

const STANDARD_BADGES: &[(UserPublicFlags, &str)] = &[
    (UserPublicFlags::DISCORD_EMPLOYEE, "🛠️ Discord Staff"),
    (UserPublicFlags::PARTNERED_SERVER_OWNER, "🤝 Partnered Server Owner"),
    (UserPublicFlags::HYPESQUAD_EVENTS, "🎉 HypeSquad Events"),
    (UserPublicFlags::BUG_HUNTER_LEVEL_1, "🐛 Bug Hunter"),
    (UserPublicFlags::BUG_HUNTER_LEVEL_2, "🐞 Bug Hunter Level 2"),
    (UserPublicFlags::HOUSE_BRAVERY, "🟣 HypeSquad Bravery"),
    (UserPublicFlags::HOUSE_BRILLIANCE, "🟠 HypeSquad Brilliance"),
    (UserPublicFlags::HOUSE_BALANCE, "🟢 HypeSquad Balance"),
    (UserPublicFlags::EARLY_SUPPORTER, "⭐ Early Supporter"),
    (UserPublicFlags::VERIFIED_BOT, "✅ Verified Bot"),
    (UserPublicFlags::EARLY_VERIFIED_BOT_DEVELOPER, "🧪 Early Verified Bot Developer"),
    (UserPublicFlags::DISCORD_CERTIFIED_MODERATOR, "🛡️ Moderator Programs Alumni"),
    (UserPublicFlags::ACTIVE_DEVELOPER, "💻 Active Developer"),
];

pub struct SerenityDirectory {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl SerenityDirectory {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        Self { cache, http }
    }

    pub fn from_ctx(ctx: &Context) -> Self {
        Self::new(ctx.cache.clone(), ctx.http.clone())
    }

    fn mutual_guilds(&self, user_id: UserId) -> usize {
        self.cache
            .guilds()
            .into_iter()
            .filter(|id| {
                self.cache
                    .guild(*id)
                    .is_some_and(|g| g.members.contains_key(&user_id))
            })
            .count()
    }

    fn cached_snapshot(&self, guild_id: GuildId, user_id: UserId) -> Option<MemberSnapshot> {
        let mutual = self.mutual_guilds(user_id);
        let guild = self.cache.guild(guild_id)?;
        let member = guild.members.get(&user_id)?;
        Some(snapshot_from(Some(&*guild), member, mutual))
    }

    /// Every member of `guild_id`, fetched in pages keyed on the last user id seen.
    async fn page_members(&self, guild_id: GuildId) -> Result<Vec<MemberJoin>, DirectoryError> {
        let mut all = Vec::new();
        let mut after: Option<UserId> = None;
        loop {
            let page = guild_id
                .members(&self.http, Some(HTTP_MEMBER_PAGE), after)
                .await?;
            let more = page.len() as u64 == HTTP_MEMBER_PAGE;
            after = page.last().map(|m| m.user.id);
            all.extend(joins_from(page.iter()));
            if !more || after.is_none() {
                break;
            }
        }
        Ok(all)
    }
}

#[async_trait]
impl Directory for SerenityDirectory {
    #[instrument(level = "debug", skip_all, fields(guild_id = guild_id.get(), user_id = user_id.get()))]
    async fn member_snapshot(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<MemberSnapshot, DirectoryError> {
        if let Some(snapshot) = self.cached_snapshot(guild_id, user_id) {
            return Ok(snapshot);
        }
        debug!(target = "directory", "member not cached; fetching");
        let member = guild_id.member(&self.http, user_id).await?;
        let mutual = self.mutual_guilds(user_id).max(1);
        let guild = self.cache.guild(guild_id);
        Ok(snapshot_from(guild.as_deref(), &member, mutual))
    }

    #[instrument(level = "debug", skip_all, fields(user_id = user_id.get()))]
    async fn fetch_user_profile(&self, user_id: UserId) -> Result<UserProfile, DirectoryError> {
        let user = self.http.get_user(user_id).await?;
        Ok(UserProfile {
            user_id,
            avatar_url: user.avatar_url(),
            banner_url: user.banner_url(),
        })
    }

    #[instrument(level = "debug", skip_all, fields(guild_id = guild_id.get()))]
    async fn list_guild_members(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<MemberJoin>, DirectoryError> {
        let cached = self
            .cache
            .guild(guild_id)
            .map(|g| (g.member_count, joins_from(g.members.values())));
        let partial = match cached {
            Some((count, members)) if members.len() as u64 >= count => return Ok(members),
            Some((count, members)) => {
                debug!(target = "directory", cached = members.len(), member_count = count, "member cache incomplete; paging over HTTP");
                Some(members)
            }
            None => None,
        };
        match self.page_members(guild_id).await {
            Ok(members) => Ok(members),
            Err(e) => match partial {
                Some(members) => {
                    warn!(target = "directory", error = %e, "member paging failed; using cached subset");
                    Ok(members)
                }
                None => Err(e),
            },
        }
    }
}

fn joins_from<'a>(members: impl Iterator<Item = &'a Member>) -> Vec<MemberJoin> {
    members
        .map(|m| MemberJoin {
            user_id: m.user.id,
            joined_at: m.joined_at.and_then(to_utc),
        })
        .collect()
}

/// Pin a CDN image URL to its static PNG rendition, so animated avatars show as a still.
fn static_png(url: &str) -> String {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    let path = match path.rsplit_once('.') {
        Some((stem, "gif" | "webp" | "jpg" | "jpeg" | "png")) => format!("{stem}.png"),
        _ => path.to_string(),
    };
    match query {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}

pub fn to_utc(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.unix_timestamp(), 0)
}

fn snapshot_from(guild: Option<&Guild>, member: &Member, mutual_guilds: usize) -> MemberSnapshot {
    let user = &member.user;

    let mut roles: Vec<&Role> = guild
        .map(|g| member.roles.iter().filter_map(|id| g.roles.get(id)).collect())
        .unwrap_or_default();
    roles.sort_by(|a, b| b.position.cmp(&a.position).then(b.id.cmp(&a.id)));
    let role_mentions = if guild.is_some() {
        roles.iter().map(|r| format!("<@&{}>", r.id)).collect()
    } else {
        member.roles.iter().map(|id| format!("<@&{}>", id)).collect()
    };
    let colour = roles
        .iter()
        .find(|r| r.colour.0 != 0)
        .map(|r| r.colour.0)
        .unwrap_or(0);

    let badges = user
        .public_flags
        .map(|flags| {
            STANDARD_BADGES
                .iter()
                .filter(|(flag, _)| flags.contains(*flag))
                .map(|(_, label)| label.to_string())
                .collect()
        })
        .unwrap_or_default();
    let mut special_badges = Vec::new();
    if guild.is_some_and(|g| g.owner_id == user.id) {
        special_badges.push("👑 Server Owner".to_string());
    }
    if member.premium_since.is_some() {
        special_badges.push("💎 Server Booster".to_string());
    }
    if user.bot {
        special_badges.push("🤖 Bot".to_string());
    }

    MemberSnapshot {
        user_id: user.id,
        username: user.name.clone(),
        display_name: member.display_name().to_string(),
        nickname: member.nick.clone(),
        colour,
        created_at: to_utc(user.id.created_at()).unwrap_or_default(),
        joined_at: member.joined_at.and_then(to_utc),
        avatar_url: user.avatar_url(),
        default_avatar_url: user.default_avatar_url(),
        display_avatar_url: static_png(&member.face()),
        guild_avatar_url: member.avatar_url(),
        roles: role_mentions,
        presence: guild
            .and_then(|g| g.presences.get(&user.id))
            .map(presence_from),
        voice_channel: guild
            .and_then(|g| g.voice_states.get(&user.id))
            .and_then(|v| v.channel_id),
        mutual_guilds,
        badges,
        special_badges,
    }
}

fn status_from(status: OnlineStatus) -> Status {
    match status {
        OnlineStatus::Online => Status::Online,
        OnlineStatus::Idle => Status::Idle,
        OnlineStatus::DoNotDisturb => Status::DoNotDisturb,
        _ => Status::Offline,
    }
}

fn presence_from(presence: &Presence) -> PresenceSnapshot {
    let activity = presence.activities.first().and_then(|a| match a.kind {
        ActivityType::Custom => a.state.as_ref().map(|s| format!("Custom: {s}")),
        ActivityType::Playing => Some(format!("Playing: {}", a.name)),
        ActivityType::Streaming => Some(format!("Streaming: {}", a.name)),
        ActivityType::Listening => Some(format!("Listening to: {}", a.name)),
        ActivityType::Watching => Some(format!("Watching: {}", a.name)),
        ActivityType::Competing => Some(format!("Competing in: {}", a.name)),
        _ => None,
    });
    let devices = presence
        .client_status
        .as_ref()
        .map(|cs| {
            [
                (Device::Mobile, cs.mobile),
                (Device::Web, cs.web),
                (Device::Desktop, cs.desktop),
            ]
            .into_iter()
            .filter_map(|(device, status)| status.map(|s| (device, status_from(s))))
            .collect()
        })
        .unwrap_or_default();
    PresenceSnapshot {
        activity,
        devices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animated_avatars_become_static_png() {
        assert_eq!(
            static_png("https://cdn.discordapp.com/avatars/1/a_abc.gif?size=1024"),
            "https://cdn.discordapp.com/avatars/1/a_abc.png?size=1024"
        );
        assert_eq!(
            static_png("https://cdn.discordapp.com/guilds/2/users/1/avatars/def.webp?size=1024"),
            "https://cdn.discordapp.com/guilds/2/users/1/avatars/def.png?size=1024"
        );
        assert_eq!(
            static_png("https://cdn.discordapp.com/embed/avatars/3.png"),
            "https://cdn.discordapp.com/embed/avatars/3.png"
        );
    }

    #[test]
    fn unknown_extension_is_left_alone() {
        assert_eq!(
            static_png("https://cdn.discordapp.com/avatars/1/abc"),
            "https://cdn.discordapp.com/avatars/1/abc"
        );
    }
}
