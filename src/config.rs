//! Runtime configuration loaded from the environment (`.env` supported via dotenv).
use crate::constants::{DEFAULT_CARD_TIMEOUT_SECS, DEFAULT_PREFIX};
use serenity::model::id::GuildId;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Register commands in this guild only; global registration when unset.
    pub guild_id: Option<GuildId>,
    pub prefix: String,
    pub card_timeout: Duration,
    /// Request the presence intent and show status on profile cards.
    pub presence_intent: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let guild_id = match lookup("SERVER_ID") {
            Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u64>() {
                Ok(id) if id != 0 => Some(GuildId::new(id)),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SERVER_ID",
                        value: raw,
                    });
                }
            },
            _ => None,
        };

        let prefix = lookup("BOT_PREFIX")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let card_timeout = match lookup("USERINFO_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "USERINFO_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_CARD_TIMEOUT_SECS),
        };

        let presence_intent = match lookup("PRESENCE_INTENT").as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: "PRESENCE_INTENT",
                    value: v.to_string(),
                });
            }
        };

        Ok(Self {
            token,
            guild_id,
            prefix,
            card_timeout,
            presence_intent,
        })
    }
}
