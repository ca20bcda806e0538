use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Discord bot relaying CFTools watchlist join/leave alerts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, short = 'c', default_value = "config.json")]
    config: String,

    /// Path to the watchlist file (one `<cftools-id> <reason>` per line)
    #[arg(long, short = 'w', default_value = "watchlist.txt")]
    watchlist: String,

    /// Register slash commands per-guild instead of globally (faster for testing)
    #[arg(long, short = 's')]
    sync_commands: bool,

    /// Specific guild ID to sync commands to (for testing)
    #[arg(long)]
    guild_id: Option<u64>,
}

mod commands;
mod config;
mod error;
mod events;
mod logging;
mod notifier;
mod watchlist;
mod webhook;

use commands::{help, ping};
use config::RelayConfig;
use events::message::handle_message;
use notifier::{AlertNotifier, CachingGateway, ChatGateway, SerenityGateway};
use watchlist::{FileWatchlist, SharedWatchlist};

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared application state
pub struct Data {
    pub watchlist: SharedWatchlist,
    pub prefix: String,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if let Err(e) = handle_message(ctx, new_message, data).await {
            error!("Failed to handle message: {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    logging::init();

    info!("Loading configuration from {}...", args.config);
    let config = RelayConfig::load_from_file(&args.config)?;
    let token = config.resolve_token(std::env::var("DISCORD_TOKEN").ok())?;
    logging::log_bot_id(&token);

    info!("Loading watchlist from {}...", args.watchlist);
    let watchlist: SharedWatchlist = Arc::new(FileWatchlist::load(&args.watchlist).await?);

    // Bind every port up front so a taken port aborts startup
    let mut listeners = Vec::new();
    for listener_config in config.listeners() {
        listeners.push(webhook::bind_listener(&config.bind_address, listener_config).await?);
    }

    let sync_commands = args.sync_commands;
    let target_guild_id = args.guild_id;
    let data_watchlist = watchlist.clone();
    let prefix = config.prefix.clone();

    // Build framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![ping(), help()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Error in command '{}': {}", ctx.command().qualified_name, error);
                            let _ = ctx.say(format!("An error occurred: {}", error)).await;
                        }
                        other => {
                            error!("Other framework error: {}", other);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot logged in as: {}", ready.user.name);

                let guilds_to_register: Vec<serenity::GuildId> = match target_guild_id {
                    Some(gid) => vec![serenity::GuildId::new(gid)],
                    None => ready.guilds.iter().map(|g| g.id).collect(),
                };

                if sync_commands {
                    for guild_id in &guilds_to_register {
                        info!("Registering commands to guild: {}", guild_id);
                        if let Err(e) = poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            *guild_id,
                        ).await {
                            error!("Failed to register commands for guild {}: {}", guild_id, e);
                        }
                    }
                } else {
                    info!("Registering commands globally...");
                    if let Err(e) = poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    ).await {
                        error!("Failed to register commands globally: {}", e);
                    }
                }

                Ok(Data {
                    watchlist: data_watchlist,
                    prefix,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;

    // Alerts go out over the client's HTTP handle
    let gateway: Arc<dyn ChatGateway> =
        Arc::new(CachingGateway::new(SerenityGateway::new(client.http.clone())));
    let notifier = Arc::new(AlertNotifier::new(
        gateway,
        watchlist.clone(),
        config.alert_channel_id,
        config.ping_role_id,
    ));

    for listener in listeners {
        listener.serve(watchlist.clone(), notifier.clone());
    }

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("Enable the MESSAGE_CONTENT privileged intent in the Discord Developer Portal");
            error!("Go to https://discord.com/developers/applications -> Your App -> Bot -> Privileged Gateway Intents");
            return Err(anyhow::anyhow!(
                "Disallowed gateway intents. Enable MESSAGE_CONTENT in Discord Developer Portal"
            ));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
