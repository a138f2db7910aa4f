//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serenity::model::id::{GuildId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use userinfo_bot::profile::{
    CardDeps, CardRequest, Directory, DirectoryError, HistoryError, MemberJoin, MemberSnapshot,
    MessageSurface, MessageUpdate, NameHistory, NameRecord, SurfaceError, UserProfile,
};

pub const GUILD: GuildId = GuildId::new(10);
pub const REQUESTER: UserId = UserId::new(100);
pub const TARGET: UserId = UserId::new(200);
pub const STRANGER: UserId = UserId::new(300);

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn member(user_id: UserId, name: &str) -> MemberSnapshot {
    let mut m = MemberSnapshot::new(user_id, name, at(1_500_000_000));
    m.joined_at = Some(at(1_600_000_000));
    m.avatar_url = Some(format!("https://cdn.example/avatars/{}.png", user_id));
    m
}

#[derive(Default)]
pub struct FakeDirectory {
    members: Mutex<HashMap<UserId, MemberSnapshot>>,
    banners: Mutex<HashMap<UserId, String>>,
    joins: Mutex<Vec<MemberJoin>>,
    pub banner_delay: Mutex<Duration>,
    pub fail_profiles: AtomicBool,
    pub fail_listing: AtomicBool,
    pub fail_snapshots: AtomicBool,
    pub profile_calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn with_member(snapshot: MemberSnapshot) -> Arc<Self> {
        let dir = Self::default();
        dir.set_member(snapshot);
        Arc::new(dir)
    }

    pub fn set_member(&self, snapshot: MemberSnapshot) {
        self.members
            .lock()
            .unwrap()
            .insert(snapshot.user_id, snapshot);
    }

    pub fn update_member(&self, user_id: UserId, f: impl FnOnce(&mut MemberSnapshot)) {
        let mut members = self.members.lock().unwrap();
        f(members.get_mut(&user_id).expect("member exists"));
    }

    pub fn set_banner(&self, user_id: UserId, url: Option<&str>) {
        let mut banners = self.banners.lock().unwrap();
        match url {
            Some(url) => banners.insert(user_id, url.to_string()),
            None => banners.remove(&user_id),
        };
    }

    pub fn set_joins(&self, joins: Vec<MemberJoin>) {
        *self.joins.lock().unwrap() = joins;
    }

    pub fn set_banner_delay(&self, delay: Duration) {
        *self.banner_delay.lock().unwrap() = delay;
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn member_snapshot(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<MemberSnapshot, DirectoryError> {
        if self.fail_snapshots.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("snapshot outage".into()));
        }
        self.members
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(DirectoryError::NotFound(user_id))
    }

    async fn fetch_user_profile(&self, user_id: UserId) -> Result<UserProfile, DirectoryError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.banner_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_profiles.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("profile outage".into()));
        }
        Ok(UserProfile {
            user_id,
            avatar_url: None,
            banner_url: self.banners.lock().unwrap().get(&user_id).cloned(),
        })
    }

    async fn list_guild_members(
        &self,
        _guild_id: GuildId,
    ) -> Result<Vec<MemberJoin>, DirectoryError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("listing outage".into()));
        }
        Ok(self.joins.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeHistory {
    record: Mutex<NameRecord>,
    pub fail: AtomicBool,
}

impl FakeHistory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, record: NameRecord) {
        *self.record.lock().unwrap() = record;
    }
}

#[async_trait]
impl NameHistory for FakeHistory {
    async fn names(&self, _guild_id: GuildId, _user_id: UserId) -> Result<NameRecord, HistoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HistoryError::Unavailable("history outage".into()));
        }
        Ok(self.record.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    updates: Mutex<Vec<MessageUpdate>>,
    pub fail: AtomicBool,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn updates(&self) -> Vec<MessageUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<MessageUpdate> {
        self.updates.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MessageSurface for RecordingSurface {
    async fn edit(&self, update: MessageUpdate) -> Result<(), SurfaceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SurfaceError::Edit("Unknown Message".into()));
        }
        self.updates.lock().unwrap().push(update);
        Ok(())
    }
}

pub fn deps(directory: Arc<FakeDirectory>, history: Arc<FakeHistory>, show_presence: bool) -> CardDeps {
    CardDeps {
        directory,
        history,
        show_presence,
    }
}

pub fn request() -> CardRequest {
    CardRequest {
        guild_id: GUILD,
        requester: REQUESTER,
        target: TARGET,
        reference_time: at(1_700_000_000),
    }
}
