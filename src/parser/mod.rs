//! Adium chat log parsers
//!
//! This module turns per-day XML transcripts into an ordered list of
//! [`LogEvent`]s.

pub mod chatlog;
pub mod timestamp;
pub mod types;

pub use chatlog::{AttributeSource, ChatLogParser, ParseState};
pub use timestamp::parse_log_time;
pub use types::*;

use std::path::Path;

/// Parse the given log files in order and collect their events
pub fn parse_logs<I, P>(paths: I) -> ParseResult
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut parser = ChatLogParser::new();
    parser.parse_files(paths);
    parser.finish()
}
