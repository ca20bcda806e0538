//! One HTTP listener per configured game server

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use super::event::{DeliveryHeaders, EventKind, PlayerAction, PlayerEvent};
use super::signature::{verify_signature, Verdict};
use crate::config::ListenerConfig;
use crate::error::{BotError, Result};
use crate::notifier::AlertNotifier;
use crate::watchlist::SharedWatchlist;

/// Shared state for one listener's handlers
#[derive(Clone)]
pub struct ListenerState {
    pub config: Arc<ListenerConfig>,
    pub watchlist: SharedWatchlist,
    pub notifier: Arc<AlertNotifier>,
}

/// Build the webhook router for one server
pub fn webhook_router(state: ListenerState) -> Router {
    Router::new()
        .route("/", post(handle_delivery))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST / - Handle one webhook delivery. Responses never carry a body.
async fn handle_delivery(
    State(state): State<ListenerState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let server = &state.config.display_name;
    let delivery = DeliveryHeaders::from_headers(&headers);

    // Handshake sent when the webhook is registered
    if delivery.event == EventKind::Verification {
        debug!("Verification handshake on {}", server);
        return StatusCode::NO_CONTENT;
    }

    if verify_signature(&state.config.secret, &delivery.delivery_id, &delivery.signature)
        == Verdict::Forged
    {
        warn!(
            "Signature mismatch on {} (delivery '{}')",
            server, delivery.delivery_id
        );
        return StatusCode::UNAUTHORIZED;
    }

    let Some(action) = PlayerAction::from_event(delivery.event) else {
        debug!("Ignoring unsupported event on {}", server);
        return StatusCode::NO_CONTENT;
    };

    let event: PlayerEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(
                "Malformed payload on {} (delivery '{}'): {}",
                server, delivery.delivery_id, e
            );
            return StatusCode::BAD_REQUEST;
        }
    };

    let Some(player_id) = event.cftools_id.as_deref() else {
        return StatusCode::NO_CONTENT;
    };

    if state.watchlist.find(player_id).await.is_none() {
        return StatusCode::NO_CONTENT;
    }

    info!(
        "Watchlist player {} {} on {}",
        player_id,
        action.label().to_lowercase(),
        server
    );

    let notifier = state.notifier.clone();
    let server = server.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&event, &server, action).await {
            error!("Failed to send watchlist alert for {}: {}", server, e);
        }
    });

    StatusCode::NO_CONTENT
}

/// A listener whose port is bound but not yet serving
pub struct BoundListener {
    config: ListenerConfig,
    listener: TcpListener,
}

impl BoundListener {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Start serving on a background task
    pub fn serve(
        self,
        watchlist: SharedWatchlist,
        notifier: Arc<AlertNotifier>,
    ) -> JoinHandle<()> {
        let name = self.config.display_name.clone();
        if let Some(addr) = self.local_addr() {
            info!("Serving webhooks for {} on {}", name, addr);
        }
        let app = webhook_router(ListenerState {
            config: Arc::new(self.config),
            watchlist,
            notifier,
        });

        tokio::spawn(async move {
            if let Err(e) = axum::serve(self.listener, app).await {
                error!("Webhook listener for {} stopped: {}", name, e);
            }
        })
    }
}

/// Bind the port for one configured server
pub async fn bind_listener(bind_address: &str, config: ListenerConfig) -> Result<BoundListener> {
    let addr = format!("{}:{}", bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BotError::ListenerBind {
            addr: addr.clone(),
            source: e,
        })?;

    info!("Server {} listening on {}", config.display_name, addr);
    Ok(BoundListener { config, listener })
}
