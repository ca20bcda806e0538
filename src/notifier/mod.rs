//! Watchlist alerts posted to the Discord alert channel

pub mod alert;
pub mod gateway;

pub use alert::build_alert;
pub use gateway::{CachingGateway, ChatGateway, SerenityGateway};

use poise::serenity_prelude::{ChannelId, RoleId};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::watchlist::SharedWatchlist;
use crate::webhook::event::{PlayerAction, PlayerEvent};

/// Formats and sends alerts for matched players
pub struct AlertNotifier {
    gateway: Arc<dyn ChatGateway>,
    watchlist: SharedWatchlist,
    channel_id: ChannelId,
    ping_role: Option<RoleId>,
}

impl AlertNotifier {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        watchlist: SharedWatchlist,
        channel_id: ChannelId,
        ping_role: Option<RoleId>,
    ) -> Self {
        Self {
            gateway,
            watchlist,
            channel_id,
            ping_role,
        }
    }

    /// Send an alert for a player event.
    ///
    /// Returns `Ok` without sending if the alert channel cannot be resolved.
    /// The watchlist entry is looked up again here so the reason reflects
    /// the list at send time.
    pub async fn notify(
        &self,
        event: &PlayerEvent,
        server_name: &str,
        action: PlayerAction,
    ) -> Result<()> {
        let Some(channel_id) = self.gateway.resolve_channel(self.channel_id).await else {
            debug!(
                "Alert channel {} not available, skipping alert",
                self.channel_id
            );
            return Ok(());
        };

        let entry = match event.cftools_id.as_deref() {
            Some(id) => self.watchlist.find(id).await,
            None => None,
        };

        let alert = build_alert(event, entry.as_ref(), server_name, action, self.ping_role);
        self.gateway.send_alert(channel_id, &alert).await?;

        info!("Sent watchlist alert: {}", alert.title);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::alert::AlertMessage;
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// Gateway that records alerts instead of sending them
    pub struct RecordingGateway {
        pub available: bool,
        pub sent: mpsc::UnboundedSender<(ChannelId, AlertMessage)>,
    }

    impl RecordingGateway {
        pub fn new(available: bool) -> (Self, mpsc::UnboundedReceiver<(ChannelId, AlertMessage)>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    available,
                    sent: tx,
                },
                rx,
            )
        }
    }

    #[async_trait]
    impl ChatGateway for RecordingGateway {
        async fn resolve_channel(&self, channel_id: ChannelId) -> Option<ChannelId> {
            self.available.then_some(channel_id)
        }

        async fn send_alert(&self, channel_id: ChannelId, alert: &AlertMessage) -> Result<()> {
            let _ = self.sent.send((channel_id, alert.clone()));
            Ok(())
        }
    }
}
