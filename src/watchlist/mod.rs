//! Watchlist loading.
//!
//! Line-oriented text file: one address per line, optionally followed by
//! a comma and a display name. Blank lines and `#` comments are ignored.
//! Addresses are stored lowercase; entries keep file order, which is the
//! stable order the scheduler visits them in. An empty list is a startup
//! error — there is nothing to watch.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("failed to read watchlist {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("watchlist {0} contains no entries")]
    Empty(String),
}

/// An address the scheduler watches for inbound transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedEntity {
    /// Lowercase canonical 0x-form.
    pub address: String,
    pub name: String,
}

/// Load and parse the watchlist file, failing fast when it is missing
/// or holds no usable entries.
pub fn load(path: &Path) -> Result<Vec<WatchedEntity>, WatchlistError> {
    let contents = std::fs::read_to_string(path).map_err(|source| WatchlistError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entities = parse(&contents);
    if entities.is_empty() {
        return Err(WatchlistError::Empty(path.display().to_string()));
    }
    Ok(entities)
}

/// Parse watchlist text into entities, preserving line order and
/// dropping duplicate addresses (first occurrence wins).
pub fn parse(contents: &str) -> Vec<WatchedEntity> {
    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.splitn(2, ',');
        let address = parts.next().unwrap_or_default().trim().to_lowercase();
        if address.is_empty() {
            continue;
        }
        if !seen.insert(address.clone()) {
            debug!(address = %address, "duplicate watchlist entry ignored");
            continue;
        }

        let name = match parts.next().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback_name(&address),
        };

        entities.push(WatchedEntity { address, name });
    }

    entities
}

/// Display name for unnamed entries, derived from the address prefix.
fn fallback_name(address: &str) -> String {
    let prefix: String = address.chars().take(8).collect();
    format!("{prefix}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_addresses_and_names() {
        let contents = "\
# exchanges
0xABCDEF0123456789abcdef0123456789ABCDEF01, Binance Hot Wallet

0x1111111111111111111111111111111111111111
";
        let entities = parse(contents);
        assert_eq!(entities.len(), 2);
        assert_eq!(
            entities[0].address,
            "0xabcdef0123456789abcdef0123456789abcdef01"
        );
        assert_eq!(entities[0].name, "Binance Hot Wallet");
        // Unnamed entry falls back to the address prefix.
        assert_eq!(entities[1].name, "0x111111…");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let entities = parse("# only a comment\n\n   \n");
        assert!(entities.is_empty());
    }

    #[test]
    fn duplicate_addresses_keep_first_entry() {
        let contents = "\
0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa, First
0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA, Second
";
        let entities = parse(contents);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "First");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load(Path::new("/nonexistent/watch_list.txt")).unwrap_err();
        assert!(matches!(err, WatchlistError::Io { .. }));
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = std::env::temp_dir().join("vigil-watchlist-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.txt");
        std::fs::write(&path, "# nothing here\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, WatchlistError::Empty(_)));
    }
}
