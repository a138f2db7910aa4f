// Central constants for limits and timing.
pub const ROLE_DISPLAY_BUDGET: usize = 4000; // embed description limit is 4096; keep headroom
pub const DEFAULT_CARD_TIMEOUT_SECS: u64 = 60;
pub const NAME_HISTORY_DEPTH: usize = 20; // per user, most recent first
pub const CARD_EVENT_CAPACITY: usize = 8;
pub const DEFAULT_PREFIX: &str = "!";
