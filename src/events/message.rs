use poise::serenity_prelude as serenity;
use tracing::{debug, info};

use crate::commands::{execute_command, parse_command, CommandReply};
use crate::{Data, Error};

/// Handle incoming messages
pub async fn handle_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    // Ignore bot messages
    if msg.author.bot {
        return Ok(());
    }

    let Some(command) = parse_command(&data.prefix, &msg.content) else {
        return Ok(());
    };

    info!(
        "Watchlist command {:?} from {} (ID: {})",
        command, msg.author.name, msg.author.id
    );

    match execute_command(data.watchlist.as_ref(), command).await {
        CommandReply::Text(text) => {
            msg.reply(&ctx.http, text).await?;
        }
        CommandReply::Embeds(embeds) => {
            for embed in embeds {
                let embed = serenity::CreateEmbed::new()
                    .title(embed.title)
                    .description(embed.description);
                msg.channel_id
                    .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
                    .await?;
            }
        }
    }

    debug!("Replied to command from {}", msg.author.name);
    Ok(())
}
