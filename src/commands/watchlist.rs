//! Prefix commands that edit the watchlist from chat

use tracing::error;

use crate::error::BotError;
use crate::watchlist::{WatchlistEntry, WatchlistStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistCommand {
    Add { id: String, description: String },
    Remove { id: String },
    List,
}

/// Reply to send back to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Text(String),
    /// One message per embed, sent in order
    Embeds(Vec<ReplyEmbed>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyEmbed {
    pub title: String,
    pub description: String,
}

/// Discord's limit on an embed description, in characters
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

const FENCE_OPEN: &str = "```\n";
const FENCE_CLOSE: &str = "\n```";
const STORAGE_FAILURE: &str = "Could not update the watchlist file, check the bot logs.";

/// Parse a chat message. Returns `None` for anything that is not a
/// known command with the configured prefix.
pub fn parse_command(prefix: &str, content: &str) -> Option<WatchlistCommand> {
    let rest = content.strip_prefix(prefix)?;
    let mut args = rest.split_whitespace();
    let command = args.next()?.to_lowercase();

    match command.as_str() {
        "add" => {
            let id = args.next().unwrap_or_default().to_string();
            let description = args.collect::<Vec<_>>().join(" ");
            Some(WatchlistCommand::Add { id, description })
        }
        "remove" => Some(WatchlistCommand::Remove {
            id: args.next().unwrap_or_default().to_string(),
        }),
        "list" => Some(WatchlistCommand::List),
        _ => None,
    }
}

/// Run a command against the watchlist and build the reply
pub async fn execute_command(
    watchlist: &dyn WatchlistStore,
    command: WatchlistCommand,
) -> CommandReply {
    match command {
        WatchlistCommand::Add { id, description } => {
            match watchlist.add(&id, &description).await {
                Ok(_) => CommandReply::Text(format!("ID {} was added to Watchlist", id)),
                Err(BotError::AlreadyWatched { .. }) => {
                    CommandReply::Text(format!("ID {} is already in Watchlist", id))
                }
                Err(BotError::InvalidPlayerId { .. }) => {
                    CommandReply::Text("Invalid CFTools-ID.".to_string())
                }
                Err(e) => {
                    error!("Failed to add {} to watchlist: {}", id, e);
                    CommandReply::Text(STORAGE_FAILURE.to_string())
                }
            }
        }
        WatchlistCommand::Remove { id } => match watchlist.remove(&id).await {
            Ok(_) => CommandReply::Text(format!("ID {} was removed from Watchlist", id)),
            Err(BotError::NotWatched { .. }) => {
                CommandReply::Text("ID was not found in Watchlist!".to_string())
            }
            Err(e) => {
                error!("Failed to remove {} from watchlist: {}", id, e);
                CommandReply::Text(STORAGE_FAILURE.to_string())
            }
        },
        WatchlistCommand::List => {
            let pages = format_watchlist(&watchlist.list().await);
            let total = pages.len();
            CommandReply::Embeds(
                pages
                    .into_iter()
                    .enumerate()
                    .map(|(i, description)| ReplyEmbed {
                        title: if total > 1 {
                            format!("Watchlist ({}/{})", i + 1, total)
                        } else {
                            "Watchlist".to_string()
                        },
                        description,
                    })
                    .collect(),
            )
        }
    }
}

/// Render entries as `id - description` lines in fenced code blocks.
///
/// Each block fits in one embed description. An empty list still yields a
/// single empty block.
pub fn format_watchlist(entries: &[WatchlistEntry]) -> Vec<String> {
    let budget = EMBED_DESCRIPTION_LIMIT - FENCE_OPEN.len() - FENCE_CLOSE.len();
    let fence = |body: &str| format!("{}{}{}", FENCE_OPEN, body, FENCE_CLOSE);

    let mut pages = Vec::new();
    let mut current = String::new();
    for entry in entries {
        let mut line = format!("{} - {}", entry.id, entry.description);
        truncate_to(&mut line, budget);

        if !current.is_empty() && current.len() + 1 + line.len() > budget {
            pages.push(fence(&current));
            current.clear();
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&line);
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(fence(&current));
    }
    pages
}

/// Cut a string to at most `max` bytes on a char boundary
fn truncate_to(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watchlist::FileWatchlist;

    const ID: &str = "5f3c2a1b0d9e8f7a6b5c4d3e";

    async fn store(dir: &tempfile::TempDir) -> FileWatchlist {
        FileWatchlist::load(dir.path().join("watchlist.txt"))
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse_command("!", &format!("!add {}   known   griefer", ID)),
            Some(WatchlistCommand::Add {
                id: ID.to_string(),
                description: "known griefer".to_string(),
            })
        );
        assert_eq!(
            parse_command("!", "!ADD"),
            Some(WatchlistCommand::Add {
                id: String::new(),
                description: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_remove_and_list() {
        assert_eq!(
            parse_command("!", &format!("! Remove {}", ID)),
            Some(WatchlistCommand::Remove { id: ID.to_string() })
        );
        assert_eq!(parse_command("wl.", "wl.list"), Some(WatchlistCommand::List));
    }

    #[test]
    fn test_parse_ignores_other_messages() {
        assert_eq!(parse_command("!", "list"), None);
        assert_eq!(parse_command("!", "!"), None);
        assert_eq!(parse_command("!", "!ban someone"), None);
        assert_eq!(parse_command("!", "hello !list"), None);
    }

    #[tokio::test]
    async fn test_add_replies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let add = |id: &str| WatchlistCommand::Add {
            id: id.to_string(),
            description: "known griefer".to_string(),
        };

        assert_eq!(
            execute_command(&store, add(ID)).await,
            CommandReply::Text(format!("ID {} was added to Watchlist", ID))
        );
        assert_eq!(
            execute_command(&store, add(ID)).await,
            CommandReply::Text(format!("ID {} is already in Watchlist", ID))
        );
        assert_eq!(
            execute_command(&store, add("nope")).await,
            CommandReply::Text("Invalid CFTools-ID.".to_string())
        );
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_replies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.add(ID, "").await.unwrap();

        let remove = || WatchlistCommand::Remove { id: ID.to_string() };
        assert_eq!(
            execute_command(&store, remove()).await,
            CommandReply::Text(format!("ID {} was removed from Watchlist", ID))
        );
        assert_eq!(
            execute_command(&store, remove()).await,
            CommandReply::Text("ID was not found in Watchlist!".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        assert_eq!(
            execute_command(&store, WatchlistCommand::List).await,
            CommandReply::Embeds(vec![ReplyEmbed {
                title: "Watchlist".to_string(),
                description: "```\n\n```".to_string(),
            }])
        );
    }

    #[tokio::test]
    async fn test_list_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.add(ID, "known griefer").await.unwrap();
        store.add("aaaaaaaaaaaaaaaaaaaaaaaa", "").await.unwrap();

        let CommandReply::Embeds(embeds) = execute_command(&store, WatchlistCommand::List).await
        else {
            panic!("list should reply with embeds");
        };
        assert_eq!(embeds.len(), 1);
        assert_eq!(
            embeds[0].description,
            format!(
                "```\n{} - known griefer\naaaaaaaaaaaaaaaaaaaaaaaa - \n```",
                ID
            )
        );
    }

    #[test]
    fn test_long_watchlist_is_split() {
        let entries: Vec<WatchlistEntry> = (0..200u32)
            .map(|i| WatchlistEntry::new(format!("{:024x}", i), "griefer"))
            .collect();

        let pages = format_watchlist(&entries);
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.chars().count() <= EMBED_DESCRIPTION_LIMIT);
            assert!(page.starts_with("```\n"));
            assert!(page.ends_with("\n```"));
        }

        let lines: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.trim_start_matches("```\n").trim_end_matches("\n```").lines())
            .collect();
        assert_eq!(lines.len(), 200);
        assert_eq!(lines[0], format!("{:024x} - griefer", 0));
        assert_eq!(lines[199], format!("{:024x} - griefer", 199));
    }

    #[test]
    fn test_oversized_line_is_truncated() {
        let entries = vec![WatchlistEntry::new(ID, "é".repeat(3000))];
        let pages = format_watchlist(&entries);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].len() <= EMBED_DESCRIPTION_LIMIT);
    }

    #[tokio::test]
    async fn test_list_pages_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        for i in 0..200u32 {
            store.add(&format!("{:024x}", i), "griefer").await.unwrap();
        }

        let CommandReply::Embeds(embeds) = execute_command(&store, WatchlistCommand::List).await
        else {
            panic!("list should reply with embeds");
        };
        assert!(embeds.len() > 1);
        assert_eq!(embeds[0].title, format!("Watchlist (1/{})", embeds.len()));
    }

    #[tokio::test]
    async fn test_storage_failure_reply() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.add(ID, "known griefer").await.unwrap();

        // Replace the backing file with a directory so writes fail
        std::fs::remove_file(store.path()).unwrap();
        std::fs::create_dir(store.path()).unwrap();

        let add = WatchlistCommand::Add {
            id: "aaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            description: String::new(),
        };
        assert_eq!(
            execute_command(&store, add).await,
            CommandReply::Text(STORAGE_FAILURE.to_string())
        );

        let remove = WatchlistCommand::Remove { id: ID.to_string() };
        assert_eq!(
            execute_command(&store, remove).await,
            CommandReply::Text(STORAGE_FAILURE.to_string())
        );
        assert_eq!(store.list().await.len(), 1);
    }
}
