//! Point-in-time member data consumed by the renderer.
//!
//! Everything here is plain data. The serenity-backed directory fills it from the gateway cache;
//! tests fill it by hand.
use chrono::{DateTime, Utc};
use serenity::model::id::{ChannelId, UserId};

/// Member data resident without a network call.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSnapshot {
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub nickname: Option<String>,
    /// Colour of the highest coloured role, 0 when none.
    pub colour: u32,
    pub created_at: DateTime<Utc>,
    pub joined_at: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    pub default_avatar_url: String,
    /// Guild avatar, falling back to the global avatar, then the default one.
    pub display_avatar_url: String,
    pub guild_avatar_url: Option<String>,
    /// Role mentions, highest role first, without the implicit everyone role.
    pub roles: Vec<String>,
    pub presence: Option<PresenceSnapshot>,
    pub voice_channel: Option<ChannelId>,
    pub mutual_guilds: usize,
    pub badges: Vec<String>,
    pub special_badges: Vec<String>,
}

impl MemberSnapshot {
    /// Minimal snapshot: no roles, avatars, presence or badges.
    pub fn new(user_id: UserId, username: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let username = username.into();
        let default_avatar_url = format!(
            "https://cdn.discordapp.com/embed/avatars/{}.png",
            (user_id.get() >> 22) % 6
        );
        Self {
            user_id,
            display_name: username.clone(),
            username,
            nickname: None,
            colour: 0,
            created_at,
            joined_at: None,
            avatar_url: None,
            display_avatar_url: default_avatar_url.clone(),
            default_avatar_url,
            guild_avatar_url: None,
            roles: Vec::new(),
            presence: None,
            voice_channel: None,
            mutual_guilds: 1,
            badges: Vec::new(),
            special_badges: Vec::new(),
        }
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }

    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
}

impl Status {
    pub fn emoji(self) -> &'static str {
        match self {
            Status::Online => "🟢",
            Status::Idle => "🟡",
            Status::DoNotDisturb => "🔴",
            Status::Offline => "⚫",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Mobile,
    Web,
    Desktop,
}

impl Device {
    pub fn label(self) -> &'static str {
        match self {
            Device::Mobile => "Mobile",
            Device::Web => "Web",
            Device::Desktop => "Desktop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceSnapshot {
    /// Already formatted activity line, e.g. `Playing: Factorio`.
    pub activity: Option<String>,
    /// Active clients, in mobile / web / desktop order.
    pub devices: Vec<(Device, Status)>,
}

/// Fresh user data that the gateway cache does not carry.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
}

/// Join information for one member, used for join-order rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberJoin {
    pub user_id: UserId,
    pub joined_at: Option<DateTime<Utc>>,
}

/// Previous names. `None` means the history service has nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRecord {
    pub usernames: Option<Vec<String>>,
    pub nicknames: Option<Vec<String>>,
}
