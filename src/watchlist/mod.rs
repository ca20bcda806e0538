pub mod entry;
pub mod store;

pub use entry::WatchlistEntry;
pub use store::{FileWatchlist, SharedWatchlist, WatchlistStore};
