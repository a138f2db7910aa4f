//! Interactive member profile card: page options, rendering, and the card state machine.

pub mod component;
pub mod directory;
pub mod discover;
pub mod page;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod truncate;

pub use component::{
    CardDeps, CardRequest, InteractionOutcome, InteractiveComponent, Lifecycle, MessageSurface,
    MessageUpdate, SelectorState, SurfaceError,
};
pub use directory::{Directory, DirectoryError, HistoryError, NameHistory};
pub use page::{PageId, PageOption};
pub use render::{EmbedField, PagePayload, PageRenderer};
pub use session::CardManager;
pub use snapshot::{MemberJoin, MemberSnapshot, NameRecord, PresenceSnapshot, UserProfile};
