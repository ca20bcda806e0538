use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

pub const SIGNATURE_HEADER: &str = "x-hephaistos-signature";
pub const DELIVERY_HEADER: &str = "x-hephaistos-delivery";
pub const EVENT_HEADER: &str = "x-hephaistos-event";

/// Event type announced in the `x-hephaistos-event` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Verification,
    UserJoin,
    UserLeave,
    Other,
}

impl EventKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "verification" => EventKind::Verification,
            "user.join" => EventKind::UserJoin,
            "user.leave" => EventKind::UserLeave,
            _ => EventKind::Other,
        }
    }
}

/// Join or leave, the two events that can raise an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Join,
    Leave,
}

impl PlayerAction {
    pub fn from_event(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::UserJoin => Some(PlayerAction::Join),
            EventKind::UserLeave => Some(PlayerAction::Leave),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerAction::Join => "Join",
            PlayerAction::Leave => "Leave",
        }
    }
}

/// Headers of one delivery; absent headers read as empty strings
#[derive(Debug, Clone)]
pub struct DeliveryHeaders {
    pub signature: String,
    pub delivery_id: String,
    pub event: EventKind,
}

impl DeliveryHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            signature: get(SIGNATURE_HEADER),
            delivery_id: get(DELIVERY_HEADER),
            event: EventKind::parse(&get(EVENT_HEADER)),
        }
    }
}

/// Player payload of a `user.join` / `user.leave` delivery.
///
/// Everything except the id is kept as raw JSON since the API sends some
/// of these as numbers and some as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEvent {
    #[serde(default)]
    pub cftools_id: Option<String>,
    #[serde(default)]
    pub player_name: Option<Value>,
    #[serde(default)]
    pub player_country: Option<Value>,
    #[serde(default)]
    pub player_ipv4: Option<Value>,
    #[serde(default)]
    pub player_guid: Option<Value>,
    #[serde(default)]
    pub player_steam64: Option<Value>,
    #[serde(default)]
    pub player_playtime: Option<Value>,
}

/// Render a payload field for display, `None` when absent, null or empty
pub fn field_text(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
