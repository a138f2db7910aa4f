//! Shared state stored in Serenity's global context as a `TypeMapKey`.
use crate::config::Config;
use crate::profile::{CardDeps, CardManager};
use crate::services::{InMemoryNameHistory, SerenityDirectory};
use serenity::prelude::{Context, TypeMapKey};
use std::sync::Arc;

/// The central, shared state of the application.
pub struct AppState {
    /// Live profile cards keyed by message.
    pub cards: CardManager,
    /// Name changes observed since start-up.
    pub history: Arc<InMemoryNameHistory>,
    /// Prefix for text commands.
    pub prefix: String,
    pub show_presence: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            cards: CardManager::new(config.card_timeout),
            history: Arc::new(InMemoryNameHistory::new()),
            prefix: config.prefix.clone(),
            show_presence: config.presence_intent,
        }
    }

    pub async fn from_ctx(ctx: &Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }

    /// Collaborators for a new card, bound to this context's cache and HTTP client.
    pub fn card_deps(&self, ctx: &Context) -> CardDeps {
        CardDeps {
            directory: Arc::new(SerenityDirectory::from_ctx(ctx)),
            history: self.history.clone(),
            show_presence: self.show_presence,
        }
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
