//! Centralized custom_id string constants for interaction components.
use crate::profile::PageId;
use serenity::all::ComponentInteractionDataKind;

// Profile card page selector
pub const USERINFO_SELECT: &str = "userinfo_select";

/// The custom_id family used by the top-level router (`userinfo_select` -> `userinfo`).
pub fn family(custom_id: &str) -> &str {
    custom_id.split('_').next().unwrap_or("")
}

/// Extract the chosen page from a string-select payload.
pub fn selected_page(kind: &ComponentInteractionDataKind) -> Option<PageId> {
    match kind {
        ComponentInteractionDataKind::StringSelect { values } => values.first()?.parse().ok(),
        _ => None,
    }
}
