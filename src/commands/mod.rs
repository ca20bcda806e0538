pub mod general;
pub mod watchlist;

pub use general::{help, ping};
pub use watchlist::{execute_command, parse_command, CommandReply};
