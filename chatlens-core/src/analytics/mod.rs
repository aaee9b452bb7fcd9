//! Analytics module for chatlens
//!
//! Provides comparative statistics across contributors:
//! - Message, word and character volume per contributor
//! - Cumulative day-granularity activity timelines, optionally re-based
//!   after an amnesty cutoff
//! - A pairwise cross-correlation matrix over common-support-aligned
//!   timelines, and the "most triggered by" link derived from it
//!
//! The entry point is [`analyze`], which runs every stage over an extracted
//! message sequence and returns an [`ActivityReport`].

pub mod contributors;
pub mod correlation;
pub mod report;
pub mod timeline;

pub use contributors::{ContributorSummary, Contributors};
pub use correlation::{
    align, correlation_score, AlignedSeries, CorrelationMatrix, MatrixEntry, TriggerLink,
};
pub use report::{analyze, ActivityReport, AnalysisParams};
pub use timeline::Timeline;
