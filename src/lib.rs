//! adiumcat - print Adium chat transcripts as plain text
//!
//! This crate provides:
//! - A streaming parser turning Adium XML chat logs into ordered events
//! - Lookup of buddies and their transcripts in the Adium log store
//! - TOML configuration for where the log store lives
//!
//! # Usage
//!
//! As a library:
//! ```ignore
//! use adiumcat::{Config, Core};
//!
//! let core = Core::new(Config::default());
//! for event in core.conversations("alice@jabber.org").unwrap().events {
//!     println!("{}", event);
//! }
//! ```
//!
//! From the command line:
//! ```text
//! adiumcat                    # list buddies
//! adiumcat alice@jabber.org   # print the transcript
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::{CoreError, Result};
pub use parser::{LogEvent, ParseResult};
pub use store::LogStore;

/// Core service that ties the log store to the parser
pub struct Core {
    /// Configuration
    pub config: Config,

    store: LogStore,
}

impl Core {
    /// Create a new Core instance with the given configuration
    pub fn new(config: Config) -> Self {
        let store = LogStore::from_config(&config.logs);
        Core { config, store }
    }

    /// Get a reference to the log store
    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Every buddy with logs, sorted by name
    pub fn buddies(&self) -> Vec<String> {
        self.store.all_buddies()
    }

    /// Parse every transcript of `buddy` in directory order
    pub fn conversations(&self, buddy: &str) -> Result<ParseResult> {
        let dir = self
            .store
            .buddy_dir(buddy)
            .ok_or_else(|| CoreError::NotFound("Buddy", buddy.to_string()))?;

        let files = self.store.conversation_files(&dir);
        tracing::debug!("Reading {} transcripts from {}", files.len(), dir.display());

        let result = parser::parse_logs(&files);
        tracing::debug!(
            "Parsed {} events ({} files, {} skipped, {} elements dropped)",
            result.events.len(),
            result.stats.files_parsed,
            result.stats.files_skipped,
            result.stats.skipped_elements
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_day(buddy_dir: &Path, day: &str, xml: &str) {
        let bundle = buddy_dir.join(format!("{}.chatlog", day));
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join(format!("{}.xml", day)), xml).unwrap();
    }

    fn core_at(root: &Path) -> Core {
        let mut config = Config::default();
        config.logs.root = root.to_path_buf();
        Core::new(config)
    }

    #[test]
    fn test_conversations_in_directory_order() {
        let dir = tempfile::tempdir().unwrap();
        let bob = dir.path().join("Logs/Jabber.me@jabber.org/bob@jabber.org");

        // Second day's file carries earlier timestamps; directory order still wins
        write_day(
            &bob,
            "bob@jabber.org (2014-08-16T10.00.00+0200)",
            r#"<chat account="me@jabber.org"><message alias="Bob" sender="bob@jabber.org" time="2014-08-16T10:00:00+02:00">first</message></chat>"#,
        );
        write_day(
            &bob,
            "bob@jabber.org (2014-08-17T10.00.00+0200)",
            r#"<chat account="me@jabber.org"><status type="offline" alias="Bob" sender="bob@jabber.org" time="2001-01-01T00:00:00+00:00"/></chat>"#,
        );
        fs::create_dir_all(bob.join("bob@jabber.org (2014-08-18T10.00.00+0200).chatlog")).unwrap();

        let core = core_at(dir.path());
        assert_eq!(core.buddies(), vec!["bob@jabber.org"]);

        let result = core.conversations("bob@jabber.org").unwrap();
        let lines: Vec<String> = result.events.iter().map(LogEvent::render).collect();
        assert_eq!(
            lines,
            vec![
                "[2014-08-16 08:00:00 +0000] <Bob> first".to_string(),
                "[2001-01-01 00:00:00 +0000] *** Bob offline".to_string(),
            ]
        );
        assert_eq!(result.local_identity.as_deref(), Some("me@jabber.org"));
        assert_eq!(result.stats.files_parsed, 2);
        assert_eq!(result.stats.files_skipped, 1);
    }

    #[test]
    fn test_unknown_buddy_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let core = core_at(dir.path());
        let err = core.conversations("nobody").unwrap_err();
        assert!(matches!(err, CoreError::NotFound("Buddy", ref name) if name == "nobody"));
    }
}
