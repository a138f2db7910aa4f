//! Central UI style constants and helpers.
use serenity::builder::CreateEmbed;

pub const COLOR_ALERT: u32 = 0xE74C3C; // Red

pub const EMOJI_PAGE_HOME: &str = "🏠";
pub const EMOJI_PAGE_AVATAR: &str = "🖼️";
pub const EMOJI_PAGE_GUILD_AVATAR: &str = "🪪";
pub const EMOJI_PAGE_BANNER: &str = "🎏";
pub const EMOJI_PAGE_ROLES: &str = "🎭";

pub const SELECT_PLACEHOLDER: &str = "Choose a page to view...";

/// Convenience builder for an alert/error-styled embed.
pub fn error_embed<T: Into<String>, U: Into<String>>(title: T, description: U) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .color(COLOR_ALERT)
}
