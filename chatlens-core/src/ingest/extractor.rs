//! Incremental chat extractor
//!
//! Turns a stream of [`MarkupEvent`]s into [`Message`]s. Exports wrap every
//! chat entry in a block tagged with the `message` class; inside it the
//! timestamp lives in the `title` of a `date` element, the author in the
//! text of a `from_name` element and the body in the text of a `text`
//! element:
//!
//! ```text
//! <div class="message default clearfix">
//!   <div class="pull_right date details" title="01.02.2022 10:00:00 UTC+02:00">10:00</div>
//!   <div class="from_name">Alice</div>
//!   <div class="text">Hello</div>
//! </div>
//! ```
//!
//! Fields are collected into a [`PendingMessage`] as they appear. The
//! opening of the *next* message block commits the pending one if it is
//! complete, and always resets it. Markup that does not fit this shape is
//! ignored; extraction never fails.

use super::markup::{MarkupDocument, MarkupEvent};
use crate::types::Message;

/// Suffix some clients append to author names of forwarded GIFs
const GIF_VIA_SUFFIX: &str = " via @gif";

/// Role a start tag plays in the export structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRole {
    /// Opens a new message block
    MessageBoundary,
    /// Carries the timestamp in its `title` attribute
    DateLabel,
    /// Next text run is the author name
    AuthorLabel,
    /// Next text run is the message body
    TextLabel,
}

impl TagRole {
    /// Classify a tag by its class tokens.
    ///
    /// When several role tokens are present the first match in the order
    /// `message`, `date`, `from_name`, `text` wins.
    pub fn classify<'a, I>(classes: I) -> Option<TagRole>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<TagRole> = None;
        for class in classes {
            let role = match class {
                "message" => TagRole::MessageBoundary,
                "date" => TagRole::DateLabel,
                "from_name" => TagRole::AuthorLabel,
                "text" => TagRole::TextLabel,
                _ => continue,
            };
            if best.map_or(true, |current| role.precedence() < current.precedence()) {
                best = Some(role);
            }
        }
        best
    }

    fn precedence(self) -> u8 {
        match self {
            TagRole::MessageBoundary => 0,
            TagRole::DateLabel => 1,
            TagRole::AuthorLabel => 2,
            TagRole::TextLabel => 3,
        }
    }
}

/// Fields the next text run fills. Both may be armed at once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Armed {
    author: bool,
    body: bool,
}

/// Fields of the message block currently being read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    pub author: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<String>,
}

impl PendingMessage {
    /// True once author, text and timestamp are all present and non-empty.
    pub fn is_complete(&self) -> bool {
        [&self.author, &self.text, &self.timestamp]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.text.is_none() && self.timestamp.is_none()
    }

    /// Reset to empty, returning a message if the state was complete.
    pub fn take_complete(&mut self) -> Option<Message> {
        let pending = std::mem::take(self);
        if !pending.is_complete() {
            return None;
        }
        match pending {
            PendingMessage {
                author: Some(author),
                text: Some(text),
                timestamp: Some(timestamp),
            } => Some(Message::new(author, text, timestamp)),
            _ => None,
        }
    }
}

/// Counters describing what the extractor saw.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    /// Documents fed so far
    pub documents: usize,
    /// Message blocks that opened
    pub boundaries: usize,
    /// Incomplete message blocks that were dropped
    pub discarded: usize,
}

/// Streaming extractor that accumulates messages across documents.
///
/// ```rust
/// use chatlens_core::ingest::ChatExtractor;
///
/// let mut extractor = ChatExtractor::new(true);
/// extractor.feed_document(
///     r#"<div class="message"><div class="date" title="01.02.2022 10:00:00"></div>
///        <div class="from_name">Alice</div><div class="text">Hi</div></div>"#,
/// );
/// let messages = extractor.finish();
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].author(), "Alice");
/// ```
#[derive(Debug, Default)]
pub struct ChatExtractor {
    pending: PendingMessage,
    armed: Armed,
    flush_trailing: bool,
    messages: Vec<Message>,
    stats: ExtractStats,
}

impl ChatExtractor {
    /// Create an extractor.
    ///
    /// With `flush_trailing` set, the last message of every document is
    /// committed when the document ends. Without it, pending state carries
    /// over into the next document and is dropped by [`Self::finish`].
    pub fn new(flush_trailing: bool) -> Self {
        Self {
            flush_trailing,
            ..Default::default()
        }
    }

    /// Parse one document and feed its events.
    pub fn feed_document(&mut self, source: &str) {
        let document = MarkupDocument::parse(source);
        if document.recovered_errors() > 0 {
            tracing::debug!(
                errors = document.recovered_errors(),
                "Recovered from malformed markup"
            );
        }

        for event in document.events() {
            self.handle_event(event);
        }
        self.end_document();
    }

    /// Process a single markup event.
    pub fn handle_event(&mut self, event: MarkupEvent<'_>) {
        match event {
            MarkupEvent::StartTag { classes, title, .. } => {
                if let Some(role) = TagRole::classify(classes) {
                    self.handle_role(role, title);
                }
            }
            MarkupEvent::Text(data) => self.handle_text(data),
        }
    }

    fn handle_role(&mut self, role: TagRole, title: Option<&str>) {
        match role {
            TagRole::MessageBoundary => {
                self.stats.boundaries += 1;
                self.commit();
            }
            TagRole::DateLabel => {
                if let Some(title) = title {
                    self.pending.timestamp = Some(title.trim().to_string());
                }
            }
            TagRole::AuthorLabel => self.armed.author = true,
            TagRole::TextLabel => self.armed.body = true,
        }
    }

    fn handle_text(&mut self, data: &str) {
        if std::mem::take(&mut self.armed.author) {
            let name = data.trim();
            let name = name.strip_suffix(GIF_VIA_SUFFIX).unwrap_or(name);
            self.pending.author = Some(name.trim_end().to_string());
        }
        if std::mem::take(&mut self.armed.body) {
            self.pending.text = Some(data.trim().to_string());
        }
    }

    /// Commit the pending message if complete; always reset.
    fn commit(&mut self) {
        let had_state = !self.pending.is_empty();
        match self.pending.take_complete() {
            Some(message) => {
                tracing::debug!(line = %message.display_line(), "Committed message");
                self.messages.push(message);
            }
            None if had_state => {
                self.stats.discarded += 1;
                tracing::info!(
                    discarded = self.stats.discarded,
                    "Discarded incomplete message block"
                );
            }
            None => {}
        }
    }

    fn end_document(&mut self) {
        self.stats.documents += 1;
        if self.flush_trailing {
            self.commit();
            self.armed = Armed::default();
        }
    }

    /// Messages extracted so far, in document order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn stats(&self) -> ExtractStats {
        self.stats
    }

    /// Consume the extractor and return all messages.
    ///
    /// Any pending state that was not flushed at a document end is dropped.
    pub fn finish(self) -> Vec<Message> {
        if !self.pending.is_empty() {
            tracing::debug!("Dropping pending message at end of input");
        }
        self.messages
    }
}
