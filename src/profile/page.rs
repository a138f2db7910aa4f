//! Page identifiers and the selector option catalog.
use crate::ui::style::{
    EMOJI_PAGE_AVATAR, EMOJI_PAGE_BANNER, EMOJI_PAGE_GUILD_AVATAR, EMOJI_PAGE_HOME,
    EMOJI_PAGE_ROLES,
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Home,
    Avatar,
    GuildAvatar,
    Banner,
    Roles,
}

impl PageId {
    /// Value carried in the select menu option.
    pub fn value(self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::Avatar => "avatar",
            PageId::GuildAvatar => "gavatar",
            PageId::Banner => "banner",
            PageId::Roles => "roles",
        }
    }

    pub fn option(self) -> PageOption {
        let (label, description, icon) = match self {
            PageId::Home => (
                "Home",
                "General info, join dates, badges, status, etc...",
                EMOJI_PAGE_HOME,
            ),
            PageId::Avatar => (
                "Avatar",
                "View the user's global avatar...",
                EMOJI_PAGE_AVATAR,
            ),
            PageId::GuildAvatar => (
                "Guild Avatar",
                "View the user's guild avatar...",
                EMOJI_PAGE_GUILD_AVATAR,
            ),
            PageId::Banner => ("Banner", "View the user's banner...", EMOJI_PAGE_BANNER),
            PageId::Roles => ("Roles", "View the user's roles..", EMOJI_PAGE_ROLES),
        };
        PageOption {
            id: self,
            label,
            description,
            icon,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPage(pub String);

impl fmt::Display for UnknownPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown page `{}`", self.0)
    }
}

impl std::error::Error for UnknownPage {}

impl FromStr for PageId {
    type Err = UnknownPage;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(PageId::Home),
            "avatar" => Ok(PageId::Avatar),
            "gavatar" => Ok(PageId::GuildAvatar),
            "banner" => Ok(PageId::Banner),
            "roles" => Ok(PageId::Roles),
            other => Err(UnknownPage(other.to_string())),
        }
    }
}

/// One selector entry. Immutable once added to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOption {
    pub id: PageId,
    pub label: &'static str,
    pub description: &'static str,
    /// Unicode emoji shown next to the label.
    pub icon: &'static str,
}

/// Options known at construction time: Home, Avatar, and Roles when the target has any.
pub fn initial_options(has_roles: bool) -> Vec<PageOption> {
    let mut options = vec![PageId::Home.option(), PageId::Avatar.option()];
    if has_roles {
        options.push(PageId::Roles.option());
    }
    options
}
