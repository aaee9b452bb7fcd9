//! # chatlens-core
//!
//! Core library for chatlens - a chat export analyzer.
//!
//! This library provides:
//! - Domain types for extracted messages
//! - A lenient, streaming extractor for exported chat HTML
//! - Contributor statistics, cumulative activity timelines and a
//!   correlation-based "who triggers whom" ranking
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Ingest:** export files on disk are decoded and fed through one
//!   [`ingest::ChatExtractor`] into a message sequence
//! - **Aggregate:** per-contributor counts and timelines
//! - **Correlate:** pairwise scores and trigger links
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatlens_core::{analyze, Config, IngestCoordinator};
//! use std::path::Path;
//!
//! let config = Config::load().expect("failed to load config");
//! let coordinator = IngestCoordinator::new(config.ingest.clone());
//! let ingested = coordinator
//!     .ingest_dir(Path::new("export"))
//!     .expect("failed to read export");
//!
//! let today = chrono::Local::now().date_naive();
//! let report = analyze(&ingested.messages, &config.analysis.params(today))
//!     .expect("failed to analyze");
//! for link in &report.triggers {
//!     println!("{} <- {}", link.triggered, link.triggered_by);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{analyze, ActivityReport, AnalysisParams};
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{IngestCoordinator, IngestResult};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
