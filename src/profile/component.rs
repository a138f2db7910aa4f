//! The profile card state machine.
//!
//! `Active -> TimedOut` is the only transition. It happens on idle timeout or on the first
//! interaction from anyone other than the requester; a timed out card never comes back.
use super::directory::{Directory, DirectoryError, NameHistory};
use super::discover::PageOptionDiscoverer;
use super::page::{PageId, PageOption, initial_options};
use super::render::{PagePayload, PageRenderer};
use super::snapshot::MemberSnapshot;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::model::id::{GuildId, UserId};
use std::sync::Arc;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, instrument, warn};

pub const NOT_AUTHOR_MESSAGE: &str = "You're not the author of this message.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// The page was rendered and the message edit was attempted.
    Rendered(PagePayload),
    /// Wrong actor. The text goes back to them ephemerally; the card is now timed out.
    Denied(String),
    /// The card already timed out.
    Expired,
}

/// What the selector looks like after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorState {
    pub options: Vec<PageOption>,
    pub selected: PageId,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageUpdate {
    /// `None` keeps the embed that is already on the message.
    pub payload: Option<PagePayload>,
    pub selector: SelectorState,
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("message edit failed: {0}")]
    Edit(String),
}

/// The message a card was sent as.
#[async_trait]
pub trait MessageSurface: Send + Sync {
    async fn edit(&self, update: MessageUpdate) -> Result<(), SurfaceError>;
}

/// Collaborators shared by every card.
#[derive(Clone)]
pub struct CardDeps {
    pub directory: Arc<dyn Directory>,
    pub history: Arc<dyn NameHistory>,
    /// Whether the bot receives presences, i.e. whether status may be shown.
    pub show_presence: bool,
}

/// Who asked about whom, and when.
#[derive(Debug, Clone, Copy)]
pub struct CardRequest {
    pub guild_id: GuildId,
    pub requester: UserId,
    pub target: UserId,
    pub reference_time: DateTime<Utc>,
}

pub struct InteractiveComponent {
    requester: UserId,
    target: MemberSnapshot,
    options: watch::Receiver<Vec<PageOption>>,
    discoverer: PageOptionDiscoverer,
    renderer: PageRenderer,
    home: OnceCell<PagePayload>,
    message: Option<Arc<dyn MessageSurface>>,
    selected: PageId,
    state: Lifecycle,
}

impl InteractiveComponent {
    /// Look the target up and build a card for it.
    pub async fn open(deps: CardDeps, request: CardRequest) -> Result<Self, DirectoryError> {
        let target = deps
            .directory
            .member_snapshot(request.guild_id, request.target)
            .await?;
        Ok(Self::new(deps, request, target))
    }

    /// Build a card from an already fetched snapshot and start option discovery.
    pub fn new(deps: CardDeps, request: CardRequest, target: MemberSnapshot) -> Self {
        let (tx, rx) = watch::channel(initial_options(target.has_roles()));
        let discoverer = PageOptionDiscoverer::start(
            deps.directory.clone(),
            target.user_id,
            target.guild_avatar_url.is_some(),
            tx,
        );
        let renderer = PageRenderer::new(
            deps.directory,
            deps.history,
            request.guild_id,
            deps.show_presence,
            request.reference_time,
        );
        debug!(target = "profile.component", requester = request.requester.get(), target_id = target.user_id.get(), "card opened");
        Self {
            requester: request.requester,
            target,
            options: rx,
            discoverer,
            renderer,
            home: OnceCell::new(),
            message: None,
            selected: PageId::Home,
            state: Lifecycle::Active,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn requester(&self) -> UserId {
        self.requester
    }

    pub fn target(&self) -> &MemberSnapshot {
        &self.target
    }

    /// Options as of now. Discovery may still append more.
    pub fn options(&self) -> Vec<PageOption> {
        self.options.borrow().clone()
    }

    pub fn discovery_in_progress(&self) -> bool {
        self.discoverer.is_running()
    }

    /// Wait until discovery has finished or been cancelled.
    pub async fn discovery_settled(&mut self) {
        self.discoverer.join().await;
    }

    /// Record the sent message. Only the first call has an effect.
    pub fn attach_message(&mut self, surface: Arc<dyn MessageSurface>) {
        if self.message.is_some() {
            warn!(target = "profile.component", "outbound message already attached");
            return;
        }
        self.message = Some(surface);
    }

    pub fn selector(&self) -> SelectorState {
        SelectorState {
            options: self.options(),
            selected: self.selected,
            disabled: self.state == Lifecycle::TimedOut,
        }
    }

    /// The Home page, computed on first use and reused for the card's lifetime.
    pub async fn home_payload(&self) -> PagePayload {
        self.home
            .get_or_init(|| async {
                let target = self.renderer.current(&self.target).await;
                self.renderer.home(&target).await
            })
            .await
            .clone()
    }

    async fn render(&self, page: PageId) -> PagePayload {
        match page {
            PageId::Home => self.home_payload().await,
            other => {
                let target = self.renderer.current(&self.target).await;
                self.renderer.render(other, &target).await
            }
        }
    }

    #[instrument(level = "debug", skip_all, fields(requester = self.requester.get(), actor = actor.get(), page = %page))]
    pub async fn receive_interaction(&mut self, actor: UserId, page: PageId) -> InteractionOutcome {
        if self.state == Lifecycle::TimedOut {
            return InteractionOutcome::Expired;
        }
        if actor != self.requester {
            info!(target = "profile.component", actor = actor.get(), "interaction from non-author; closing card");
            self.shut_down().await;
            return InteractionOutcome::Denied(NOT_AUTHOR_MESSAGE.to_string());
        }

        let payload = self.render(page).await;
        self.selected = page;
        if let Some(message) = &self.message {
            let update = MessageUpdate {
                payload: Some(payload.clone()),
                selector: self.selector(),
            };
            if let Err(e) = message.edit(update).await {
                warn!(target = "profile.component", error = %e, "page edit failed");
            }
        }
        InteractionOutcome::Rendered(payload)
    }

    /// Idle timeout from the host.
    pub async fn on_timeout(&mut self) {
        if self.state == Lifecycle::TimedOut {
            return;
        }
        debug!(target = "profile.component", "idle timeout");
        self.shut_down().await;
    }

    /// Stop background work. Does not change the lifecycle; idempotent.
    pub fn close(&self) {
        self.discoverer.cancel();
    }

    async fn shut_down(&mut self) {
        self.state = Lifecycle::TimedOut;
        self.close();
        if let Some(message) = &self.message {
            let update = MessageUpdate {
                payload: None,
                selector: self.selector(),
            };
            // Best effort: the message may be gone or no longer editable.
            if let Err(e) = message.edit(update).await {
                debug!(target = "profile.component", error = %e, "disable edit failed");
            }
        }
    }
}
