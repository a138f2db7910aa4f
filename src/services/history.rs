//! In-process name history, fed from gateway member updates.
//!
//! Entries are most recent first and capped per user. Nothing survives a restart.
use crate::constants::NAME_HISTORY_DEPTH;
use crate::profile::{HistoryError, NameHistory, NameRecord};
use async_trait::async_trait;
use serenity::model::id::{GuildId, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryNameHistory {
    usernames: RwLock<HashMap<UserId, Vec<String>>>,
    nicknames: RwLock<HashMap<(GuildId, UserId), Vec<String>>>,
}

fn remember(list: &mut Vec<String>, previous: String) {
    if list.first() == Some(&previous) {
        return;
    }
    list.insert(0, previous);
    list.truncate(NAME_HISTORY_DEPTH);
}

impl InMemoryNameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_username(&self, user_id: UserId, previous: &str) {
        let mut map = self.usernames.write().await;
        remember(map.entry(user_id).or_default(), previous.to_string());
        debug!(target = "history", user_id = user_id.get(), "username recorded");
    }

    pub async fn record_nickname(&self, guild_id: GuildId, user_id: UserId, previous: &str) {
        let mut map = self.nicknames.write().await;
        remember(
            map.entry((guild_id, user_id)).or_default(),
            previous.to_string(),
        );
        debug!(target = "history", user_id = user_id.get(), guild_id = guild_id.get(), "nickname recorded");
    }

    /// Compare an old and new member state and record whatever changed.
    pub async fn observe_change(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        old_username: &str,
        new_username: &str,
        old_nick: Option<&str>,
        new_nick: Option<&str>,
    ) {
        if old_username != new_username {
            self.record_username(user_id, old_username).await;
        }
        if old_nick != new_nick
            && let Some(old) = old_nick
        {
            self.record_nickname(guild_id, user_id, old).await;
        }
    }
}

#[async_trait]
impl NameHistory for InMemoryNameHistory {
    async fn names(&self, guild_id: GuildId, user_id: UserId) -> Result<NameRecord, HistoryError> {
        let usernames = self.usernames.read().await.get(&user_id).cloned();
        let nicknames = self
            .nicknames
            .read()
            .await
            .get(&(guild_id, user_id))
            .cloned();
        Ok(NameRecord {
            usernames: usernames.filter(|n| !n.is_empty()),
            nicknames: nicknames.filter(|n| !n.is_empty()),
        })
    }
}
