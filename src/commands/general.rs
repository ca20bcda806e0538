use poise::serenity_prelude as serenity;
use tracing::info;

use crate::{Context, Error};

/// Check if the relay is running
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    info!("Ping command called by {}", ctx.author().name);
    let watched = ctx.data().watchlist.list().await.len();
    ctx.send(poise::CreateReply::default()
        .content(format!("Pong! Watchlist relay is running ({} players watched).", watched))
        .ephemeral(true))
        .await?;
    Ok(())
}

/// Show help information
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().prefix;
    let embed = serenity::CreateEmbed::new()
        .title("Watchlist Commands")
        .description("Available commands:")
        .field(format!("{}add <cftools-id> [reason]", prefix), "Add a player to the watchlist", false)
        .field(format!("{}remove <cftools-id>", prefix), "Remove a player from the watchlist", false)
        .field(format!("{}list", prefix), "Show all watched players", false)
        .field("/ping", "Check if the relay is running", false)
        .color(0x3498db);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;
    Ok(())
}
