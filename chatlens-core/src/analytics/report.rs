//! Report pipeline
//!
//! Ties the analytics stages together:
//! message sequence → contributor summaries → ranking → correlation matrix
//! → trigger links.

use super::contributors::{ContributorSummary, Contributors};
use super::correlation::{CorrelationMatrix, MatrixEntry, TriggerLink};
use crate::error::Result;
use crate::types::Message;
use chrono::NaiveDate;
use serde::Serialize;

/// Parameters of one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisParams {
    /// Forget history up to and including this day
    pub amnesty_cutoff: Option<NaiveDate>,
    /// Extend every timeline flat up to this day
    pub horizon: Option<NaiveDate>,
}

/// Output of the analytics pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    /// Contributors ordered by descending message count, then name
    pub contributors: Vec<ContributorSummary>,
    /// Correlation scores in the same order as `contributors`
    pub matrix: CorrelationMatrix,
    /// One link per contributor with a unique strongest correlation
    pub triggers: Vec<TriggerLink>,
    pub amnesty_cutoff: Option<NaiveDate>,
}

impl ActivityReport {
    /// The `n` most active contributors.
    pub fn top(&self, n: usize) -> &[ContributorSummary] {
        &self.contributors[..n.min(self.contributors.len())]
    }

    pub fn total_messages(&self) -> u64 {
        self.contributors.iter().map(|c| c.message_count).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full analysis over an extracted message sequence.
///
/// Fails only if a message timestamp cannot be parsed.
pub fn analyze(messages: &[Message], params: &AnalysisParams) -> Result<ActivityReport> {
    let contributors = Contributors::new(messages);

    let mut summaries = contributors
        .contributing_names()
        .into_iter()
        .map(|name| {
            let mut summary = contributors.summarize(name)?;
            if let Some(horizon) = params.horizon {
                summary.timeline.extend_to(horizon);
            }
            if let Some(cutoff) = params.amnesty_cutoff {
                summary.apply_amnesty(cutoff);
            }
            Ok(summary)
        })
        .collect::<Result<Vec<_>>>()?;

    summaries.sort_by(|a, b| {
        b.message_count
            .cmp(&a.message_count)
            .then_with(|| a.name.cmp(&b.name))
    });

    let entries: Vec<MatrixEntry<'_>> = summaries
        .iter()
        .map(|s| MatrixEntry {
            name: &s.name,
            short_name: &s.short_name,
            timeline: &s.timeline,
        })
        .collect();
    let matrix = CorrelationMatrix::compute(&entries);
    let triggers = matrix.triggers();

    tracing::info!(
        contributors = summaries.len(),
        triggers = triggers.len(),
        "Analysis complete"
    );

    Ok(ActivityReport {
        contributors: summaries,
        matrix,
        triggers,
        amnesty_cutoff: params.amnesty_cutoff,
    })
}
