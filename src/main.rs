use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use userinfo_bot::AppState;
use userinfo_bot::config::Config;
use userinfo_bot::handler::Handler;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenv::dotenv() {
        eprintln!("No .env file loaded: {e}");
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,userinfo_bot=debug")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Member and voice caches back the profile card; presences are opt-in (privileged).
    let mut intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    if config.presence_intent {
        intents |= GatewayIntents::GUILD_PRESENCES;
    }

    let app_state = Arc::new(AppState::new(&config));

    let mut client = Client::builder(&config.token, intents)
        .event_handler(Handler {
            guild_id: config.guild_id,
        })
        .await
        .expect("Error creating the Discord client.");

    {
        let mut data = client.data.write().await;
        data.insert::<AppState>(app_state);
    }

    if let Err(why) = client.start().await {
        tracing::error!(error = ?why, "client error");
    }
}
