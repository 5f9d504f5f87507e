//! Event types produced by the chat log parser

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;

/// Rendered timestamps are the UTC instant, e.g. `2014-08-16 12:03:21 +0000`
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Format an event time for output
pub fn display_time(time: &DateTime<FixedOffset>) -> String {
    time.with_timezone(&Utc).format(TIME_FORMAT).to_string()
}

/// A presence change such as "online", "away" or "offline"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Status kind, verbatim from the `type` attribute
    pub kind: String,
    pub alias: String,
    pub sender: String,
    pub time: DateTime<FixedOffset>,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub alias: String,
    pub sender: String,
    pub time: DateTime<FixedOffset>,

    /// Text body, joined from every character data fragment of the element
    pub message: String,
}

impl StatusEvent {
    pub fn new(kind: &str, alias: &str, sender: &str, time: DateTime<FixedOffset>) -> Self {
        StatusEvent {
            kind: kind.to_string(),
            alias: alias.to_string(),
            sender: sender.to_string(),
            time,
        }
    }
}

impl MessageEvent {
    /// Create a message with an empty body
    pub fn new(alias: &str, sender: &str, time: DateTime<FixedOffset>) -> Self {
        MessageEvent {
            alias: alias.to_string(),
            sender: sender.to_string(),
            time,
            message: String::new(),
        }
    }
}

/// A parsed occurrence in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Status(StatusEvent),
    Message(MessageEvent),
}

impl LogEvent {
    /// Display name of the participant
    pub fn alias(&self) -> &str {
        match self {
            LogEvent::Status(e) => &e.alias,
            LogEvent::Message(e) => &e.alias,
        }
    }

    /// Canonical identifier of the participant
    pub fn sender(&self) -> &str {
        match self {
            LogEvent::Status(e) => &e.sender,
            LogEvent::Message(e) => &e.sender,
        }
    }

    pub fn time(&self) -> &DateTime<FixedOffset> {
        match self {
            LogEvent::Status(e) => &e.time,
            LogEvent::Message(e) => &e.time,
        }
    }

    /// Canonical single-line form used for output.
    ///
    /// - status: `[<time>] *** <alias> <type>`
    /// - message: `[<time>] <<alias>> <message>`
    pub fn render(&self) -> String {
        match self {
            LogEvent::Status(e) => {
                format!("[{}] *** {} {}", display_time(&e.time), e.alias, e.kind)
            }
            LogEvent::Message(e) => {
                format!("[{}] <{}> {}", display_time(&e.time), e.alias, e.message)
            }
        }
    }

    /// Field dump for debugging, not used for normal output
    pub fn describe(&self) -> String {
        format!(
            "LogEvent {} {} {}",
            self.alias(),
            self.sender(),
            display_time(self.time())
        )
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<StatusEvent> for LogEvent {
    fn from(event: StatusEvent) -> Self {
        LogEvent::Status(event)
    }
}

impl From<MessageEvent> for LogEvent {
    fn from(event: MessageEvent) -> Self {
        LogEvent::Message(event)
    }
}

/// Result of parsing one or more chat log files
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Events in encounter order: file order first, then document order
    pub events: Vec<LogEvent>,

    /// Last `account` seen on a `chat` element
    pub local_identity: Option<String>,

    /// Parsing statistics
    pub stats: ParseStats,

    /// Files that failed to parse completely
    pub errors: Vec<String>,
}

/// Statistics from parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Files read to the end (or until an XML error)
    pub files_parsed: usize,

    /// Files that could not be opened or read
    pub files_skipped: usize,

    /// Number of status events
    pub status_events: usize,

    /// Number of message events
    pub message_events: usize,

    /// `status`/`message` elements dropped for a missing attribute or bad time
    pub skipped_elements: usize,

    /// Messages dropped because their file ended before the closing tag
    pub discarded_messages: usize,
}
