//! Per-author views over the message sequence

use super::timeline::Timeline;
use crate::error::Result;
use crate::format::short_name;
use crate::types::Message;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Read-only queries over an extracted message sequence.
#[derive(Debug, Clone, Copy)]
pub struct Contributors<'a> {
    messages: &'a [Message],
}

impl<'a> Contributors<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self { messages }
    }

    /// Distinct author names.
    pub fn contributing_names(&self) -> BTreeSet<&'a str> {
        self.messages.iter().map(Message::author).collect()
    }

    fn authored_by<'s>(&'s self, author: &'s str) -> impl Iterator<Item = &'a Message> + 's {
        self.messages.iter().filter(move |m| m.author() == author)
    }

    /// Message texts of `author`, in sequence order.
    pub fn messages_of(&self, author: &str) -> Vec<&'a str> {
        self.authored_by(author).map(Message::text).collect()
    }

    pub fn message_count(&self, author: &str) -> usize {
        self.authored_by(author).count()
    }

    /// Sum of whitespace-separated tokens over all of `author`'s messages.
    pub fn word_count(&self, author: &str) -> usize {
        self.authored_by(author)
            .map(|m| m.text().split_whitespace().count())
            .sum()
    }

    /// Sum of message lengths in characters.
    pub fn char_count(&self, author: &str) -> usize {
        self.authored_by(author)
            .map(|m| m.text().chars().count())
            .sum()
    }

    pub fn timeline(&self, author: &str) -> Result<Timeline> {
        Timeline::from_messages(self.authored_by(author))
    }

    /// Full summary for one contributor.
    pub fn summarize(&self, author: &str) -> Result<ContributorSummary> {
        Ok(ContributorSummary {
            name: author.to_string(),
            short_name: short_name(author),
            message_count: self.message_count(author) as u64,
            word_count: self.word_count(author) as u64,
            char_count: self.char_count(author) as u64,
            timeline: self.timeline(author)?,
            messages: self
                .messages_of(author)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Everything the report layer needs to know about one contributor.
#[derive(Debug, Clone, Serialize)]
pub struct ContributorSummary {
    pub name: String,
    /// Name cut down for matrix labels
    pub short_name: String,
    pub message_count: u64,
    pub word_count: u64,
    pub char_count: u64,
    pub timeline: Timeline,
    pub messages: Vec<String>,
}

impl ContributorSummary {
    /// Apply amnesty: drop history up to `cutoff` and reduce the message
    /// count by what was forgotten.
    pub fn apply_amnesty(&mut self, cutoff: NaiveDate) {
        let (rebased, base) = self.timeline.rebase(cutoff);
        self.message_count = if rebased.is_empty() {
            0
        } else {
            self.message_count.saturating_sub(base)
        };
        self.timeline = rebased;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::new("Alice", "hello world", "01.03.2022 09:00:00"),
            Message::new("Bob", "hi", "01.03.2022 09:01:00"),
            Message::new("Alice", "  spaced   out  text ", "02.03.2022 10:00:00"),
            Message::new("Carol", "größe", "05.03.2022 10:00:00"),
        ]
    }

    #[test]
    fn test_contributing_names() {
        let messages = sample();
        let contributors = Contributors::new(&messages);
        let names: Vec<_> = contributors.contributing_names().into_iter().collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_messages_of_in_order() {
        let messages = sample();
        let contributors = Contributors::new(&messages);
        assert_eq!(
            contributors.messages_of("Alice"),
            vec!["hello world", "  spaced   out  text "]
        );
    }

    #[test]
    fn test_counts() {
        let messages = sample();
        let contributors = Contributors::new(&messages);
        assert_eq!(contributors.message_count("Alice"), 2);
        assert_eq!(contributors.word_count("Alice"), 5);
        assert_eq!(contributors.char_count("Bob"), 2);
        // Characters, not bytes
        assert_eq!(contributors.char_count("Carol"), 5);
    }

    #[test]
    fn test_unknown_author_is_zero() {
        let messages = sample();
        let contributors = Contributors::new(&messages);
        assert_eq!(contributors.message_count("Mallory"), 0);
        assert_eq!(contributors.word_count("Mallory"), 0);
        assert_eq!(contributors.char_count("Mallory"), 0);
        assert!(contributors.timeline("Mallory").unwrap().is_empty());
    }

    #[test]
    fn test_summarize() {
        let messages = sample();
        let summary = Contributors::new(&messages).summarize("Alice").unwrap();
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.word_count, 5);
        assert_eq!(summary.timeline.total(), 2);
        assert_eq!(summary.messages.len(), 2);
        assert_eq!(summary.short_name, "Alice");
    }

    #[test]
    fn test_apply_amnesty() {
        let messages = sample();
        let contributors = Contributors::new(&messages);

        let mut alice = contributors.summarize("Alice").unwrap();
        alice.apply_amnesty(NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
        // Day 2 is retained with cumulative 2, which becomes the new zero
        assert_eq!(alice.timeline.get(NaiveDate::from_ymd_opt(2022, 3, 2).unwrap()), Some(0));
        assert_eq!(alice.message_count, 0);

        let mut bob = contributors.summarize("Bob").unwrap();
        bob.apply_amnesty(NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
        assert!(bob.timeline.is_empty());
        assert_eq!(bob.message_count, 0);
        // Word counts describe the whole history
        assert_eq!(bob.word_count, 1);
    }
}
