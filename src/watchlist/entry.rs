/// Length of a CFTools player id (hex characters)
pub const PLAYER_ID_LEN: usize = 24;

/// A watched player and the note explaining why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistEntry {
    /// CFTools id, 24 hex characters
    pub id: String,

    /// Free-text reason, may be empty
    pub description: String,
}

impl WatchlistEntry {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: sanitize_description(&description.into()),
        }
    }

    /// Parse one line of the watchlist file.
    ///
    /// The id ends at the first whitespace run; whatever follows is the
    /// description. Blank lines yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (id, description) = match line.split_once(char::is_whitespace) {
            Some((id, rest)) => (id, rest.trim_start()),
            None => (line, ""),
        };

        Some(Self {
            id: id.to_string(),
            description: description.to_string(),
        })
    }

    /// Render as a file line, including the trailing newline
    pub fn to_line(&self) -> String {
        format!("{} {}\n", self.id, self.description)
    }
}

/// Check the `^[a-fA-F0-9]{24}$` id format
pub fn is_valid_player_id(id: &str) -> bool {
    id.len() == PLAYER_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Newlines separate records, so they cannot appear inside a description
fn sanitize_description(description: &str) -> String {
    description.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_format() {
        assert!(is_valid_player_id("5f3c2a1b0d9e8f7a6b5c4d3e"));
        assert!(is_valid_player_id("5F3C2A1B0D9E8F7A6B5C4D3E"));
        assert!(!is_valid_player_id("5f3c2a1b0d9e8f7a6b5c4d3"));
        assert!(!is_valid_player_id("5f3c2a1b0d9e8f7a6b5c4d3e0"));
        assert!(!is_valid_player_id("zf3c2a1b0d9e8f7a6b5c4d3e"));
        assert!(!is_valid_player_id(""));
    }

    #[test]
    fn test_parse_line() {
        let entry = WatchlistEntry::parse_line("5f3c2a1b0d9e8f7a6b5c4d3e known  griefer").unwrap();
        assert_eq!(entry.id, "5f3c2a1b0d9e8f7a6b5c4d3e");
        assert_eq!(entry.description, "known  griefer");

        let entry = WatchlistEntry::parse_line("5f3c2a1b0d9e8f7a6b5c4d3e\t  alt account\r").unwrap();
        assert_eq!(entry.description, "alt account");
    }

    #[test]
    fn test_parse_line_without_description() {
        let entry = WatchlistEntry::parse_line("5f3c2a1b0d9e8f7a6b5c4d3e ").unwrap();
        assert_eq!(entry.id, "5f3c2a1b0d9e8f7a6b5c4d3e");
        assert_eq!(entry.description, "");

        let entry = WatchlistEntry::parse_line("not-an-id").unwrap();
        assert_eq!(entry.id, "not-an-id");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_parse_blank_line() {
        assert!(WatchlistEntry::parse_line("").is_none());
        assert!(WatchlistEntry::parse_line("   \t").is_none());
    }

    #[test]
    fn test_newlines_stripped_from_description() {
        let entry = WatchlistEntry::new("5f3c2a1b0d9e8f7a6b5c4d3e", "line one\nline two");
        assert_eq!(entry.to_line(), "5f3c2a1b0d9e8f7a6b5c4d3e line one line two\n");
    }
}
