use poise::serenity_prelude::{self as serenity, RoleId};
use serde_json::Value;

use crate::watchlist::WatchlistEntry;
use crate::webhook::event::{field_text, PlayerAction, PlayerEvent};

pub const PROFILE_BASE_URL: &str = "https://app.cftools.cloud/profile";
pub const JOIN_COLOR: u32 = 0x2ecc71;
pub const LEAVE_COLOR: u32 = 0xe74c3c;

const NO_DESCRIPTION: &str = "No description provided";
const UNKNOWN: &str = "Unknown";

/// One embed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertField {
    pub name: String,
    pub value: String,
}

/// A watchlist alert, independent of the chat library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Plain content sent above the embed (role ping)
    pub content: Option<String>,
    pub title: String,
    pub url: String,
    pub color: u32,
    pub fields: Vec<AlertField>,
}

impl AlertMessage {
    /// Look up a field value by name
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn to_create_message(&self) -> serenity::CreateMessage {
        let embed = self.fields.iter().fold(
            serenity::CreateEmbed::new()
                .title(&self.title)
                .url(&self.url)
                .colour(self.color),
            |embed, f| embed.field(&f.name, &f.value, false),
        );

        let message = serenity::CreateMessage::new().embed(embed);
        match &self.content {
            Some(content) => message.content(content),
            None => message,
        }
    }
}

fn code(value: &str) -> String {
    format!("`{}`", value)
}

/// Build the alert for a matched player
pub fn build_alert(
    event: &PlayerEvent,
    entry: Option<&WatchlistEntry>,
    server_name: &str,
    action: PlayerAction,
    ping_role: Option<RoleId>,
) -> AlertMessage {
    let player_id = event.cftools_id.clone().unwrap_or_default();
    let text_or_unknown =
        |value: &Option<Value>| field_text(value).unwrap_or_else(|| UNKNOWN.to_string());

    let mut fields = vec![
        AlertField {
            name: "Player Name".to_string(),
            value: code(&text_or_unknown(&event.player_name)),
        },
        AlertField {
            name: "CF-ID".to_string(),
            value: code(&player_id),
        },
    ];

    match action {
        PlayerAction::Join => {
            let reason = entry
                .map(|e| e.description.as_str())
                .filter(|d| !d.is_empty())
                .unwrap_or(NO_DESCRIPTION);

            for (name, value) in [
                ("Country", &event.player_country),
                ("IP", &event.player_ipv4),
                ("GUID", &event.player_guid),
                ("Steam64", &event.player_steam64),
            ] {
                fields.push(AlertField {
                    name: name.to_string(),
                    value: code(&text_or_unknown(value)),
                });
            }
            fields.push(AlertField {
                name: "Reason".to_string(),
                value: code(reason),
            });
        }
        PlayerAction::Leave => {
            fields.push(AlertField {
                name: "Playtime".to_string(),
                value: code(&text_or_unknown(&event.player_playtime)),
            });
        }
    }

    let content = match (action, ping_role) {
        (PlayerAction::Join, Some(role)) => Some(format!("<@&{}>", role)),
        _ => None,
    };

    AlertMessage {
        content,
        title: format!("Watchlist player {} on {}", action.label(), server_name),
        url: format!("{}/{}", PROFILE_BASE_URL, player_id),
        color: match action {
            PlayerAction::Join => JOIN_COLOR,
            PlayerAction::Leave => LEAVE_COLOR,
        },
        fields,
    }
}
