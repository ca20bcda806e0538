use poise::serenity_prelude::{ChannelId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{BotError, Result};

/// Relay configuration
/// Loaded from config.json (same keys as the original Node bot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Bot token; `DISCORD_TOKEN` takes precedence when set
    #[serde(rename = "botToken", default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Prefix for chat commands (e.g. "!")
    pub prefix: String,

    /// Role mentioned on join alerts
    #[serde(rename = "pingRoleID", default, skip_serializing_if = "Option::is_none")]
    pub ping_role_id: Option<RoleId>,

    /// Channel that receives watchlist alerts
    #[serde(rename = "Discord_Channel_ID")]
    pub alert_channel_id: ChannelId,

    /// Address every webhook listener binds to
    #[serde(rename = "bindAddress", default = "default_bind_address")]
    pub bind_address: String,

    /// Upstream game servers keyed by display name
    pub servers: BTreeMap<String, ServerConfig>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Webhook settings for one game server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub secret: String,
}

/// Everything a single webhook listener needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub display_name: String,
    pub port: u16,
    pub secret: String,
}

impl RelayConfig {
    /// Load from a JSON file and validate
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BotError::ConfigLoad {
            path: path.to_string(),
            source: e,
        })?;

        let config: RelayConfig =
            serde_json::from_str(&content).map_err(|e| BotError::ConfigParse {
                path: path.to_string(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            return Err(BotError::ConfigValidation {
                message: "prefix must not be empty".to_string(),
            });
        }

        if self.servers.is_empty() {
            return Err(BotError::ConfigValidation {
                message: "at least one server must be configured".to_string(),
            });
        }

        let mut ports = HashSet::new();
        for (name, server) in &self.servers {
            if server.port == 0 {
                return Err(BotError::ConfigValidation {
                    message: format!("server '{}' has no port", name),
                });
            }
            if server.secret.is_empty() {
                return Err(BotError::ConfigValidation {
                    message: format!("server '{}' has an empty secret", name),
                });
            }
            if !ports.insert(server.port) {
                return Err(BotError::ConfigValidation {
                    message: format!("port {} is used by more than one server", server.port),
                });
            }
        }

        Ok(())
    }

    /// Resolve the bot token, preferring the environment over the file
    pub fn resolve_token(&self, env_token: Option<String>) -> Result<String> {
        env_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.bot_token.clone().filter(|t| !t.is_empty()))
            .ok_or_else(|| BotError::ConfigValidation {
                message: "no bot token: set DISCORD_TOKEN or botToken".to_string(),
            })
    }

    /// One listener record per configured server, in name order
    pub fn listeners(&self) -> Vec<ListenerConfig> {
        self.servers
            .iter()
            .map(|(name, server)| ListenerConfig {
                display_name: name.clone(),
                port: server.port,
                secret: server.secret.clone(),
            })
            .collect()
    }
}
