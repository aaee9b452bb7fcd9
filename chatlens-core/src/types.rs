//! Core domain types for chatlens
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Export** | One HTML document produced by a chat client's "export history" feature |
//! | **Message** | One chat entry recovered from an export: author, body text, raw timestamp |
//! | **Contributor** | A distinct author name seen in at least one message |
//! | **Timeline** | Per-day running total of a contributor's messages |
//!
//! Messages keep the timestamp exactly as it appeared in the export. Parsing
//! is deferred to [`Message::timestamp`] so that a single malformed export
//! only fails the operations that actually need dates.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Primary timestamp layout used by exports (`01.02.2022 10:00:00`)
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Fragment that starts the zone suffix some exports append (`... UTC+02:00`)
const ZONE_SUFFIX: &str = " UTC";

// ============================================
// Message
// ============================================

/// A single chat message recovered from an export.
///
/// Only the extractor creates messages, and only once author, text and
/// timestamp are all known. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    author: String,
    text: String,
    raw_timestamp: String,
}

impl Message {
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
        raw_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            raw_timestamp: raw_timestamp.into(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Timestamp string as found in the export's `title` attribute.
    pub fn raw_timestamp(&self) -> &str {
        &self.raw_timestamp
    }

    /// Parse the raw timestamp.
    ///
    /// Tries `DD.MM.YYYY HH:MM:SS` first. If that fails, everything from the
    /// first `" UTC"` onwards is dropped and the remainder is parsed again,
    /// so `01.02.2022 10:00:00 UTC+02:00` yields the local wall-clock time.
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.raw_timestamp)
    }

    /// Calendar day of the message.
    pub fn date(&self) -> Result<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    /// One-line rendering used in debug output.
    pub fn display_line(&self) -> String {
        format!("{}({}): {}", self.author, self.raw_timestamp, self.text)
    }
}

/// Parse an export timestamp, falling back to the zone-stripped form.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }

    let stripped = raw.split(ZONE_SUFFIX).next().unwrap_or(raw);
    NaiveDateTime::parse_from_str(stripped, TIMESTAMP_FORMAT).map_err(|_| Error::TimestampFormat {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_format() {
        let msg = Message::new("Alice", "hi", "01.02.2022 10:00:00");
        let ts = msg.timestamp().unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2022, 2, 1).unwrap());
        assert_eq!(ts.format("%H:%M:%S").to_string(), "10:00:00");
    }

    #[test]
    fn test_utc_suffix_fallback() {
        let plain = Message::new("Alice", "hi", "01.02.2022 10:00:00");
        let zoned = Message::new("Alice", "hi", "01.02.2022 10:00:00 UTC+2");
        assert_eq!(zoned.date().unwrap(), plain.date().unwrap());
        assert_eq!(zoned.timestamp().unwrap(), plain.timestamp().unwrap());
        // The raw value is left untouched
        assert_eq!(zoned.raw_timestamp(), "01.02.2022 10:00:00 UTC+2");
    }

    #[test]
    fn test_long_zone_suffix() {
        let ts = parse_timestamp("31.12.2021 23:59:59 UTC+03:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    }

    #[test]
    fn test_unrecognized_format_fails() {
        let msg = Message::new("Alice", "hi", "2022-02-01T10:00:00Z");
        match msg.timestamp() {
            Err(Error::TimestampFormat { raw }) => assert_eq!(raw, "2022-02-01T10:00:00Z"),
            other => panic!("expected TimestampFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_display_line() {
        let msg = Message::new("Bob", "hello there", "02.03.2022 08:15:00");
        assert_eq!(msg.display_line(), "Bob(02.03.2022 08:15:00): hello there");
    }
}
