use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Failed to load config file '{path}': {source}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // Watchlist file errors
    #[error("Failed to load watchlist from '{path}': {source}")]
    StateLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save watchlist to '{path}': {source}")]
    StateSave {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Watchlist mutation errors
    #[error("Invalid CFTools ID: '{id}'")]
    InvalidPlayerId { id: String },

    #[error("ID {id} is already in the watchlist")]
    AlreadyWatched { id: String },

    #[error("ID {id} is not in the watchlist")]
    NotWatched { id: String },

    // Webhook listener errors
    #[error("Failed to bind webhook listener on {addr}: {source}")]
    ListenerBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // Discord errors
    #[error("Discord API error: {message}")]
    Discord { message: String },
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

use poise::serenity_prelude as serenity;
