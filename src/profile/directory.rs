//! Collaborator seams: the member directory and the name-history service.
use super::snapshot::{MemberJoin, MemberSnapshot, NameRecord, UserProfile};
use async_trait::async_trait;
use serenity::model::id::{GuildId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("member {0} not found")]
    NotFound(UserId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("discord request failed: {0}")]
    Http(#[from] serenity::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("name history unavailable: {0}")]
    Unavailable(String),
}

/// Guild membership and user data.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Current snapshot of a member. Cheap; served from cache where possible.
    async fn member_snapshot(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<MemberSnapshot, DirectoryError>;

    /// Fresh user fetch. Always a network call, needed for banners.
    async fn fetch_user_profile(&self, user_id: UserId) -> Result<UserProfile, DirectoryError>;

    async fn list_guild_members(&self, guild_id: GuildId)
    -> Result<Vec<MemberJoin>, DirectoryError>;
}

#[async_trait]
pub trait NameHistory: Send + Sync {
    async fn names(&self, guild_id: GuildId, user_id: UserId) -> Result<NameRecord, HistoryError>;
}
