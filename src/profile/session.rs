//! Live card registry.
//!
//! Each card is owned by one driver task. Interactions reach it over a channel, so a card only
//! ever handles one event at a time and no lock is held while it renders. The driver also owns
//! the idle timer, which restarts after every event.
use super::component::{InteractionOutcome, InteractiveComponent, Lifecycle};
use super::page::PageId;
use crate::constants::CARD_EVENT_CAPACITY;
use serenity::model::id::{MessageId, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, warn};

pub struct SelectEvent {
    pub actor: UserId,
    pub page: PageId,
    pub reply: oneshot::Sender<InteractionOutcome>,
}

type CardMap = HashMap<MessageId, mpsc::Sender<SelectEvent>>;

#[derive(Clone)]
pub struct CardManager {
    cards: Arc<RwLock<CardMap>>,
    idle_timeout: Duration,
}

impl CardManager {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            cards: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Hand `component` to a fresh driver task, keyed by the message it was sent as.
    pub async fn register(&self, message_id: MessageId, component: InteractiveComponent) {
        let (tx, rx) = mpsc::channel(CARD_EVENT_CAPACITY);
        // Weak, so a replaced card still sees its channel close.
        let own = tx.downgrade();
        if self.cards.write().await.insert(message_id, tx).is_some() {
            warn!(target = "profile.session", message_id = message_id.get(), "replaced existing card");
        }
        let cards = self.cards.clone();
        let idle = self.idle_timeout;
        tokio::spawn(async move {
            drive(component, rx, idle).await;
            let mut cards = cards.write().await;
            let still_ours = cards
                .get(&message_id)
                .is_some_and(|tx| own.upgrade().is_some_and(|own| own.same_channel(tx)));
            if still_ours {
                cards.remove(&message_id);
            }
            debug!(target = "profile.session", message_id = message_id.get(), "card finished");
        });
    }

    /// Route a selection. `None` when no live card owns `message_id`.
    pub async fn dispatch(
        &self,
        message_id: MessageId,
        actor: UserId,
        page: PageId,
    ) -> Option<InteractionOutcome> {
        let tx = self.cards.read().await.get(&message_id).cloned()?;
        let (reply, rx) = oneshot::channel();
        tx.send(SelectEvent { actor, page, reply }).await.ok()?;
        rx.await.ok()
    }

    pub async fn is_live(&self, message_id: MessageId) -> bool {
        self.cards.read().await.contains_key(&message_id)
    }

    pub async fn live_count(&self) -> usize {
        self.cards.read().await.len()
    }
}

/// Run one card until it times out or its channel closes.
pub async fn drive(
    mut component: InteractiveComponent,
    mut events: mpsc::Receiver<SelectEvent>,
    idle: Duration,
) {
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    component.on_timeout().await;
                    break;
                };
                let outcome = component.receive_interaction(event.actor, event.page).await;
                let _ = event.reply.send(outcome);
                if component.state() == Lifecycle::TimedOut {
                    break;
                }
            }
            _ = tokio::time::sleep(idle) => {
                component.on_timeout().await;
                break;
            }
        }
    }
    events.close();
    // Answer anything that queued up behind the final event.
    while let Some(event) = events.recv().await {
        let _ = event.reply.send(InteractionOutcome::Expired);
    }
}
