//! Ingestion layer for chat export files
//!
//! This module turns a directory of exported HTML documents into one
//! ordered message sequence.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  Export Files   │ ──► │ IngestCoordinator│ ──► │  Vec<Message>   │
//! │ (messages*.html)│     │                  │     │ (document order)│
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//!                               │
//!                               ▼
//!                    ┌──────────────────────┐
//!                    │  MarkupDocument      │
//!                    │   └─► ChatExtractor  │
//!                    └──────────────────────┘
//! ```
//!
//! Files are visited in sorted path order, which is not necessarily the
//! chronological order of their contents. All files share one extractor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chatlens_core::{Config, IngestCoordinator};
//!
//! let config = Config::load()?;
//! let coordinator = IngestCoordinator::new(config.ingest.clone());
//! let result = coordinator.ingest_dir(Path::new("export"))?;
//! println!("Parsed {} messages from {} files", result.messages.len(), result.files_parsed);
//! ```

mod extractor;
mod markup;

pub use extractor::{ChatExtractor, ExtractStats, PendingMessage, TagRole};
pub use markup::{MarkupDocument, MarkupEvent};

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::types::Message;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Result of ingesting one export directory.
#[derive(Debug, Default)]
pub struct IngestResult {
    /// All extracted messages, in file order then document order
    pub messages: Vec<Message>,
    /// Number of files parsed
    pub files_parsed: usize,
    /// Files that contained invalid UTF-8 and were decoded with replacements
    pub files_with_replacements: Vec<PathBuf>,
    /// Extractor counters
    pub stats: ExtractStats,
}

/// Coordinates discovery, decoding and extraction for an export directory.
pub struct IngestCoordinator {
    config: IngestConfig,
}

impl IngestCoordinator {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Discover export files in `dir`, sorted by path.
    ///
    /// Only regular files matching the configured pattern are returned.
    pub fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let metadata = std::fs::metadata(dir).map_err(|e| Error::SourceDir {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(Error::SourceDir {
                path: dir.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let full_pattern = dir.join(&self.config.file_pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let entries = glob::glob(&pattern_str).map_err(|e| Error::Pattern(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable directory entry");
                }
            }
        }
        files.sort();

        tracing::info!(
            dir = %dir.display(),
            count = files.len(),
            "Discovered export files"
        );

        Ok(files)
    }

    /// Ingest every export file in `dir`.
    pub fn ingest_dir(&self, dir: &Path) -> Result<IngestResult> {
        self.ingest_dir_with_progress(dir, |_, _, _| {})
    }

    /// Ingest every export file in `dir` with progress callback.
    ///
    /// The callback receives `(current_file_index, total_files, file_path)`
    /// before each file is parsed.
    pub fn ingest_dir_with_progress<F>(&self, dir: &Path, mut on_progress: F) -> Result<IngestResult>
    where
        F: FnMut(usize, usize, &Path),
    {
        let files = self.discover_files(dir)?;
        let total = files.len();

        let mut extractor = ChatExtractor::new(self.config.flush_trailing_message);
        let mut result = IngestResult::default();

        for (i, path) in files.iter().enumerate() {
            on_progress(i, total, path);

            if self.feed_file(&mut extractor, path)? {
                result.files_with_replacements.push(path.clone());
            }
            result.files_parsed += 1;
        }

        result.stats = extractor.stats();
        result.messages = extractor.finish();

        tracing::info!(
            files = result.files_parsed,
            messages = result.messages.len(),
            discarded = result.stats.discarded,
            "Ingest complete"
        );

        Ok(result)
    }

    /// Read one file and feed it to the extractor.
    ///
    /// Returns whether invalid byte sequences had to be replaced.
    fn feed_file(&self, extractor: &mut ChatExtractor, path: &Path) -> Result<bool> {
        let bytes = std::fs::read(path)?;
        let (source, replaced) = decode_lossy(&bytes);

        if replaced {
            tracing::warn!(
                path = %path.display(),
                "File is not valid UTF-8, invalid sequences replaced"
            );
        }

        let before = extractor.messages().len();
        extractor.feed_document(&source);
        tracing::debug!(
            path = %path.display(),
            new_messages = extractor.messages().len() - before,
            "Parsed export file"
        );

        Ok(replaced)
    }
}

/// Decode bytes as UTF-8, substituting U+FFFD for invalid sequences.
fn decode_lossy(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    let decoded = String::from_utf8_lossy(bytes);
    let replaced = matches!(decoded, Cow::Owned(_));
    (decoded, replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const EXPORT: &str = r#"<html><body>
<div class="message default" id="message1">
  <div class="pull_right date details" title="01.02.2022 10:00:00">10:00</div>
  <div class="from_name">Alice</div>
  <div class="text">Hello</div>
</div>
</body></html>"#;

    #[test]
    fn test_decode_lossy() {
        let (text, replaced) = decode_lossy("plain ascii".as_bytes());
        assert_eq!(text, "plain ascii");
        assert!(!replaced);

        let (text, replaced) = decode_lossy(b"bad \xff byte");
        assert_eq!(text, "bad \u{FFFD} byte");
        assert!(replaced);
    }

    #[test]
    fn test_discover_files_sorted_and_regular_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("messages2.html"), EXPORT).unwrap();
        fs::write(dir.path().join("messages.html"), EXPORT).unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();

        let coordinator = IngestCoordinator::new(IngestConfig::default());
        let files = coordinator.discover_files(dir.path()).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["messages.html", "messages2.html"]);
    }

    #[test]
    fn test_discover_files_respects_pattern() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("messages.html"), EXPORT).unwrap();
        fs::write(dir.path().join("notes.txt"), "not an export").unwrap();

        let coordinator = IngestCoordinator::new(IngestConfig {
            file_pattern: "*.html".to_string(),
            ..Default::default()
        });
        let files = coordinator.discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = IngestCoordinator::new(IngestConfig::default());

        let err = coordinator
            .ingest_dir(&dir.path().join("does-not-exist"))
            .unwrap_err();
        assert!(matches!(err, Error::SourceDir { .. }));
    }

    #[test]
    fn test_file_instead_of_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("messages.html");
        fs::write(&file, EXPORT).unwrap();

        let coordinator = IngestCoordinator::new(IngestConfig::default());
        assert!(matches!(
            coordinator.discover_files(&file),
            Err(Error::SourceDir { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = EXPORT.replace("Hello", "Hello \u{1}MARK").into_bytes();
        let pos = bytes
            .windows(5)
            .position(|w| w == b"\x01MARK")
            .unwrap();
        bytes[pos] = 0xFF;
        fs::write(dir.path().join("messages.html"), bytes).unwrap();

        let coordinator = IngestCoordinator::new(IngestConfig::default());
        let result = coordinator.ingest_dir(dir.path()).unwrap();

        assert_eq!(result.files_parsed, 1);
        assert_eq!(result.files_with_replacements.len(), 1);
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].text(), "Hello \u{FFFD}MARK");
    }

    #[test]
    fn test_progress_callback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), EXPORT).unwrap();
        fs::write(dir.path().join("b.html"), EXPORT).unwrap();

        let coordinator = IngestCoordinator::new(IngestConfig::default());
        let mut seen = Vec::new();
        let result = coordinator
            .ingest_dir_with_progress(dir.path(), |i, total, path| {
                seen.push((i, total, path.file_name().unwrap().to_owned()));
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, 0);
        assert_eq!(seen[1].1, 2);
        assert_eq!(result.messages.len(), 2);
    }
}
