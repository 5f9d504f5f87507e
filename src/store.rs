//! Adium log store layout
//!
//! Transcripts live under the Adium user directory:
//!
//! ```text
//! <root>/Logs/<service>.<account>/<buddy>/<buddy> (<date>).chatlog/<buddy> (<date>).xml
//! ```
//!
//! Each per-day entry in a buddy directory is a `.chatlog` bundle holding one XML
//! file with the same base name.

use crate::config::LogsConfig;
use std::path::{Path, PathBuf};

const LOGS_DIR: &str = "Logs";
const CHATLOG_EXTENSION: &str = ".chatlog";
const XML_EXTENSION: &str = ".xml";

/// Read-only view over an Adium log directory
#[derive(Debug, Clone)]
pub struct LogStore {
    root: PathBuf,
    ignore: Vec<String>,
}

impl LogStore {
    pub fn new<P: Into<PathBuf>>(root: P, ignore: Vec<String>) -> Self {
        LogStore {
            root: root.into(),
            ignore,
        }
    }

    pub fn from_config(config: &LogsConfig) -> Self {
        Self::new(config.root(), config.ignore.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// One directory per configured account, sorted by name
    pub fn account_dirs(&self) -> Vec<PathBuf> {
        let logs = self.root.join(LOGS_DIR);
        let mut dirs: Vec<PathBuf> = self
            .entries(&logs)
            .into_iter()
            .map(|name| logs.join(name))
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    /// Every buddy with logs under any account, sorted
    pub fn all_buddies(&self) -> Vec<String> {
        let mut buddies: Vec<String> = self
            .account_dirs()
            .iter()
            .flat_map(|account| self.entries(account))
            .collect();
        buddies.sort();
        buddies
    }

    /// Log directory for `name` in the first account that has one
    pub fn buddy_dir(&self, name: &str) -> Option<PathBuf> {
        if self.is_ignored(name) {
            return None;
        }

        self.account_dirs().into_iter().find_map(|account| {
            self.entries(&account)
                .iter()
                .any(|entry| entry == name)
                .then(|| account.join(name))
        })
    }

    /// XML transcripts of one buddy, ordered by entry name
    pub fn conversation_files(&self, buddy_dir: &Path) -> Vec<PathBuf> {
        let mut days = self.entries(buddy_dir);
        days.sort();
        days.iter()
            .map(|day| buddy_dir.join(day).join(xml_file_name(day)))
            .collect()
    }

    /// Entry names in `dir` minus ignored ones. An unreadable directory has no entries.
    fn entries(&self, dir: &Path) -> Vec<String> {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Cannot list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !self.is_ignored(name))
            .collect()
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|i| i == name)
    }
}

/// Name of the XML file inside a `.chatlog` entry: the last `.chatlog` in the
/// entry name is replaced by `.xml`. Names without it are returned unchanged.
pub fn xml_file_name(entry: &str) -> String {
    match entry.rfind(CHATLOG_EXTENSION) {
        Some(pos) => format!(
            "{}{}{}",
            &entry[..pos],
            XML_EXTENSION,
            &entry[pos + CHATLOG_EXTENSION.len()..]
        ),
        None => entry.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_with(layout: &[&str]) -> (tempfile::TempDir, LogStore) {
        let dir = tempfile::tempdir().unwrap();
        for path in layout {
            fs::create_dir_all(dir.path().join(path)).unwrap();
        }
        let store = LogStore::new(dir.path(), vec![".DS_Store".to_string()]);
        (dir, store)
    }

    #[test]
    fn test_xml_file_name() {
        assert_eq!(
            xml_file_name("alice (2014-08-16T14.00.00+0200).chatlog"),
            "alice (2014-08-16T14.00.00+0200).xml"
        );
        assert_eq!(
            xml_file_name("odd.chatlog friend (2014).chatlog"),
            "odd.chatlog friend (2014).xml"
        );
        assert_eq!(xml_file_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_all_buddies_sorted_across_accounts() {
        let (dir, store) = store_with(&[
            "Logs/Jabber.me@jabber.org/zed@jabber.org",
            "Logs/Jabber.me@jabber.org/alice@jabber.org",
            "Logs/AIM.me/bob",
        ]);
        fs::write(dir.path().join("Logs/AIM.me/.DS_Store"), b"").unwrap();

        assert_eq!(
            store.all_buddies(),
            vec!["alice@jabber.org", "bob", "zed@jabber.org"]
        );
    }

    #[test]
    fn test_missing_logs_dir_is_empty() {
        let (_dir, store) = store_with(&[]);
        assert!(store.account_dirs().is_empty());
        assert!(store.all_buddies().is_empty());
        assert!(store.buddy_dir("alice").is_none());
    }

    #[test]
    fn test_buddy_dir_uses_first_account() {
        let (dir, store) = store_with(&["Logs/AIM.me/bob", "Logs/Jabber.me/bob"]);
        assert_eq!(
            store.buddy_dir("bob"),
            Some(dir.path().join("Logs/AIM.me/bob"))
        );
        assert!(store.buddy_dir("carol").is_none());
        assert!(store.buddy_dir(".DS_Store").is_none());
    }

    #[test]
    fn test_conversation_files_in_name_order() {
        let (dir, store) = store_with(&[
            "Logs/AIM.me/bob/bob (2014-08-17T10.00.00+0200).chatlog",
            "Logs/AIM.me/bob/bob (2014-08-16T09.00.00+0200).chatlog",
        ]);
        let buddy = dir.path().join("Logs/AIM.me/bob");
        fs::write(buddy.join(".DS_Store"), b"").unwrap();

        assert_eq!(
            store.conversation_files(&buddy),
            vec![
                buddy
                    .join("bob (2014-08-16T09.00.00+0200).chatlog")
                    .join("bob (2014-08-16T09.00.00+0200).xml"),
                buddy
                    .join("bob (2014-08-17T10.00.00+0200).chatlog")
                    .join("bob (2014-08-17T10.00.00+0200).xml"),
            ]
        );
    }
}
