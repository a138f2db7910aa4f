//! Concrete collaborators for profile cards, backed by serenity.
pub mod directory;
pub mod history;
pub mod surface;

pub use directory::SerenityDirectory;
pub use history::InMemoryNameHistory;
pub use surface::SerenityMessage;
