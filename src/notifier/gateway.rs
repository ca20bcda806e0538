use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, ChannelId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::alert::AlertMessage;
use crate::error::Result;

/// The part of the chat client the notifier depends on
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Resolve the alert channel, `None` if it is unknown or unreachable
    async fn resolve_channel(&self, channel_id: ChannelId) -> Option<ChannelId>;

    /// Send one alert, no retry
    async fn send_alert(&self, channel_id: ChannelId, alert: &AlertMessage) -> Result<()>;
}

/// Gateway backed by serenity's HTTP client
pub struct SerenityGateway {
    http: Arc<serenity::Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatGateway for SerenityGateway {
    async fn resolve_channel(&self, channel_id: ChannelId) -> Option<ChannelId> {
        match self.http.get_channel(channel_id).await {
            Ok(channel) => channel.guild().map(|c| c.id),
            Err(e) => {
                debug!("Could not resolve channel {}: {}", channel_id, e);
                None
            }
        }
    }

    async fn send_alert(&self, channel_id: ChannelId, alert: &AlertMessage) -> Result<()> {
        channel_id
            .send_message(self.http.as_ref(), alert.to_create_message())
            .await?;
        Ok(())
    }
}

/// Remembers channels that resolved once so later alerts skip the lookup.
///
/// Failed lookups are not cached and are retried on the next alert.
pub struct CachingGateway<G> {
    inner: G,
    resolved: RwLock<HashSet<ChannelId>>,
}

impl<G: ChatGateway> CachingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            resolved: RwLock::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl<G: ChatGateway> ChatGateway for CachingGateway<G> {
    async fn resolve_channel(&self, channel_id: ChannelId) -> Option<ChannelId> {
        if self.resolved.read().await.contains(&channel_id) {
            return Some(channel_id);
        }

        let resolved = self.inner.resolve_channel(channel_id).await?;
        debug!("Caching resolved channel {}", resolved);
        self.resolved.write().await.insert(resolved);
        Some(resolved)
    }

    async fn send_alert(&self, channel_id: ChannelId, alert: &AlertMessage) -> Result<()> {
        self.inner.send_alert(channel_id, alert).await
    }
}
