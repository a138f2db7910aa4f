//! Background enrichment of the selector options.
//!
//! The discoverer owns the only write handle to a component's option list. Appends happen from a
//! single task with sequential awaits, so Guild Avatar always lands before Banner no matter how
//! long the banner fetch takes.
use super::directory::Directory;
use super::page::{PageId, PageOption};
use serenity::model::id::UserId;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

pub struct PageOptionDiscoverer {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PageOptionDiscoverer {
    /// Spawn discovery for `user_id`. `has_guild_avatar` comes from the cached snapshot; banner
    /// presence needs a fresh fetch.
    pub fn start(
        directory: Arc<dyn Directory>,
        user_id: UserId,
        has_guild_avatar: bool,
        options: watch::Sender<Vec<PageOption>>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(discover(
            directory,
            user_id,
            has_guild_avatar,
            options,
            cancel.clone(),
        ));
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop discovery. Safe to call any number of times, including after completion.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            debug!(target = "profile.discover", "cancelled");
        }
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the task to end, either by finishing or by cancellation.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PageOptionDiscoverer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[instrument(level = "debug", skip_all, fields(user_id = user_id.get()))]
async fn discover(
    directory: Arc<dyn Directory>,
    user_id: UserId,
    has_guild_avatar: bool,
    options: watch::Sender<Vec<PageOption>>,
    cancel: CancellationToken,
) {
    if cancel.is_cancelled() {
        return;
    }
    if has_guild_avatar {
        append(&options, PageId::GuildAvatar);
    }

    let fetched = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        res = directory.fetch_user_profile(user_id) => res,
    };
    match fetched {
        Ok(profile) if profile.banner_url.is_some() => append(&options, PageId::Banner),
        Ok(_) => debug!(target = "profile.discover", "no banner"),
        Err(e) => debug!(target = "profile.discover", error = %e, "banner lookup failed"),
    }
}

fn append(options: &watch::Sender<Vec<PageOption>>, page: PageId) {
    options.send_modify(|opts| {
        if !opts.iter().any(|o| o.id == page) {
            opts.push(page.option());
        }
    });
    debug!(target = "profile.discover", page = %page, "option added");
}
