//! Webhook intake for CFTools game-server events
//!
//! Every configured server gets its own listener (port + shared secret);
//! all of them share the watchlist and the alert notifier.

pub mod event;
pub mod listener;
pub mod signature;

pub use listener::bind_listener;
