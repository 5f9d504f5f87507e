//! Adium chat log parser
//!
//! Each conversation day is stored as one XML document:
//!
//! ```xml
//! <chat account="me@jabber.org" service="Jabber">
//!   <status type="online" alias="Alice" sender="alice@jabber.org" time="2014-08-16T14:00:01+02:00"/>
//!   <message alias="Alice" sender="alice@jabber.org" time="2014-08-16T14:03:21+02:00">
//!     <div><span>hi &amp; bye</span></div>
//!   </message>
//! </chat>
//! ```
//!
//! The element stream is fed through [`ParseState`], which turns `status` and
//! `message` elements into [`LogEvent`]s. Character data arriving while a
//! message is open is appended to its body in delivery order, so text split
//! across child elements, CDATA sections or entity references ends up joined.

use super::timestamp::parse_log_time;
use super::types::*;
use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read access to the attributes of an opened element
pub trait AttributeSource {
    /// Unescaped value of `name`, or `None` when absent or unreadable
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for BytesStart<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        let attr = self.try_get_attribute(name).ok()??;
        attr.unescape_value().ok().map(|v| v.into_owned())
    }
}

impl AttributeSource for [(&str, &str)] {
    fn attribute(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

impl<const N: usize> AttributeSource for [(&str, &str); N] {
    fn attribute(&self, name: &str) -> Option<String> {
        self[..].attribute(name)
    }
}

/// Parser state shared by every file of one run
#[derive(Debug, Default)]
pub struct ParseState {
    local_identity: Option<String>,
    events: Vec<LogEvent>,
    /// Index into `events` of the message receiving character data
    open_message: Option<usize>,
    stats: ParseStats,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a start tag
    pub fn open_element<A: AttributeSource + ?Sized>(&mut self, name: &str, attrs: &A) {
        match name {
            "chat" => {
                if let Some(account) = attrs.attribute("account") {
                    self.local_identity = Some(account);
                }
            }
            "status" => match read_status(attrs) {
                Some(event) => {
                    self.events.push(event.into());
                    self.stats.status_events += 1;
                }
                None => self.skip(name),
            },
            "message" => match read_message(attrs) {
                Some(event) => {
                    self.events.push(event.into());
                    self.open_message = Some(self.events.len() - 1);
                    self.stats.message_events += 1;
                }
                None => self.skip(name),
            },
            _ => {}
        }
    }

    /// Handle an end tag
    pub fn close_element(&mut self, name: &str) {
        if name == "message" {
            self.open_message = None;
        }
    }

    /// Handle a character data fragment
    pub fn characters(&mut self, text: &str) {
        let Some(index) = self.open_message else {
            return;
        };
        if let Some(LogEvent::Message(message)) = self.events.get_mut(index) {
            message.message.push_str(text);
        }
    }

    /// End of one document. A message still open here never saw its closing
    /// tag and is dropped.
    pub fn finish_document(&mut self) {
        if let Some(index) = self.open_message.take() {
            let dropped = self.events.remove(index);
            self.stats.message_events -= 1;
            self.stats.discarded_messages += 1;
            tracing::debug!("Discarding unclosed message: {}", dropped.describe());
        }
    }

    pub fn local_identity(&self) -> Option<&str> {
        self.local_identity.as_deref()
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    fn skip(&mut self, name: &str) {
        self.stats.skipped_elements += 1;
        tracing::trace!("Skipping <{}> with missing attribute or bad time", name);
    }
}

fn read_status<A: AttributeSource + ?Sized>(attrs: &A) -> Option<StatusEvent> {
    let kind = attrs.attribute("type")?;
    let alias = attrs.attribute("alias")?;
    let sender = attrs.attribute("sender")?;
    let time = parse_log_time(&attrs.attribute("time")?)?;

    Some(StatusEvent {
        kind,
        alias,
        sender,
        time,
    })
}

fn read_message<A: AttributeSource + ?Sized>(attrs: &A) -> Option<MessageEvent> {
    let alias = attrs.attribute("alias")?;
    let sender = attrs.attribute("sender")?;
    let time = parse_log_time(&attrs.attribute("time")?)?;

    Some(MessageEvent {
        alias,
        sender,
        time,
        message: String::new(),
    })
}

/// Parser for Adium chat log files
#[derive(Debug, Default)]
pub struct ChatLogParser {
    state: ParseState,
    errors: Vec<String>,
}

impl ChatLogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one document held in memory
    pub fn parse_str(&mut self, xml: &str) -> Result<()> {
        self.parse_reader(xml.as_bytes())
    }

    /// Parse one document from a buffered reader.
    ///
    /// On malformed XML the events produced before the error are kept and the
    /// error is returned.
    pub fn parse_reader<R: BufRead>(&mut self, source: R) -> Result<()> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().expand_empty_elements = true;

        let mut buf = Vec::new();
        let outcome = self.consume(&mut reader, &mut buf);

        self.state.finish_document();
        self.state.stats.files_parsed += 1;

        outcome.map_err(Into::into)
    }

    /// Parse one file. Fails if the file cannot be read.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parse files in the given order. Unreadable files are skipped and
    /// malformed ones are recorded in [`ParseResult::errors`].
    pub fn parse_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();

            let file = match File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    tracing::debug!("Skipping unreadable log {}: {}", path.display(), e);
                    self.state.stats.files_skipped += 1;
                    continue;
                }
            };

            if let Err(e) = self.parse_reader(BufReader::new(file)) {
                tracing::warn!("Stopped parsing {}: {}", path.display(), e);
                self.errors.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Consume the parser and return everything collected so far
    pub fn finish(self) -> ParseResult {
        let ParseState {
            local_identity,
            events,
            stats,
            ..
        } = self.state;

        ParseResult {
            events,
            local_identity,
            stats,
            errors: self.errors,
        }
    }

    fn consume<R: BufRead>(
        &mut self,
        reader: &mut Reader<R>,
        buf: &mut Vec<u8>,
    ) -> quick_xml::Result<()> {
        loop {
            match reader.read_event_into(buf)? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.state.open_element(&name, &e);
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.state.close_element(&name);
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    self.state.characters(&normalize_line_ends(&text));
                }
                Event::CData(e) => {
                    let text = e.decode()?;
                    self.state.characters(&normalize_line_ends(&text));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }
}

/// XML line-end handling: `\r\n` and lone `\r` become `\n`
fn normalize_line_ends(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
