//! Cross-correlation of activity timelines
//!
//! Two cumulative timelines are compared over their common support window,
//! the day range where both can be evaluated:
//!
//! ```text
//! A:     |-----------------------|
//! B:            |--------------------------|
//! window:       [max(first) ... min(last)]
//! ```
//!
//! Inside the window both series are sampled once per day, forward-filling
//! days without activity. The full discrete cross-correlation of the two
//! sampled series is summed over all lags, divided by the product of the
//! series lengths and compressed with `log10(1 + x)`.
//!
//! The score is a ranking signal, not a statistical test. It is used to
//! pick, for each contributor, the other contributor whose activity curve
//! tracks theirs most closely (the "trigger").

use super::timeline::Timeline;
use chrono::NaiveDate;
use serde::Serialize;

/// Two timelines sampled daily over their common window.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl AlignedSeries {
    /// Number of days in the window.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Align two timelines onto their common daily calendar.
///
/// Returns `None` if either timeline is empty or the timelines do not
/// overlap in time.
pub fn align(left: &Timeline, right: &Timeline) -> Option<AlignedSeries> {
    let start = left.first_date()?.max(right.first_date()?);
    let end = left.last_date()?.min(right.last_date()?);
    if start > end {
        return None;
    }

    let days = (end - start).num_days() as usize + 1;
    let mut left_values = Vec::with_capacity(days);
    let mut right_values = Vec::with_capacity(days);

    for day in start.iter_days().take(days) {
        // Both timelines start on or before `start`, so forward fill always
        // finds an anchor
        left_values.push(left.value_on(day)? as f64);
        right_values.push(right.value_on(day)? as f64);
    }

    Some(AlignedSeries {
        start,
        end,
        left: left_values,
        right: right_values,
    })
}

/// Sum over all lags of the full cross-correlation of `x` and `y`,
/// normalised by `len(x) * len(y)`.
///
/// Every product `x[i] * y[j]` appears at exactly one lag, so the sum over
/// all lags equals `sum(x) * sum(y)`.
pub fn normalized_cross_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    (sum_x * sum_y) / (x.len() as f64 * y.len() as f64)
}

/// Log-compressed score of an aligned pair.
pub fn aligned_score(series: &AlignedSeries) -> f64 {
    (1.0 + normalized_cross_correlation(&series.left, &series.right)).log10()
}

/// Correlation score of two timelines, `0.0` when they do not overlap.
pub fn correlation_score(left: &Timeline, right: &Timeline) -> f64 {
    align(left, right).map_or(0.0, |series| aligned_score(&series))
}

/// A directed "triggered by" relationship between two contributors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerLink {
    /// Contributor whose row was ranked
    pub triggered: String,
    /// Contributor with the strictly highest score in that row
    pub triggered_by: String,
}

/// N×N correlation scores between contributors.
///
/// Row and column `i` belong to `names[i]`. Every cell is computed on its
/// own; the matrix is not mirrored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub short_names: Vec<String>,
    pub cells: Vec<Vec<f64>>,
    /// Whether the contributor had any activity to correlate
    #[serde(skip)]
    active: Vec<bool>,
}

/// One row/column of the matrix.
pub struct MatrixEntry<'a> {
    pub name: &'a str,
    pub short_name: &'a str,
    pub timeline: &'a Timeline,
}

impl CorrelationMatrix {
    /// Score every ordered pair of entries, including each entry with itself.
    pub fn compute(entries: &[MatrixEntry<'_>]) -> Self {
        let mut cells = vec![vec![0.0; entries.len()]; entries.len()];

        for (i, row) in entries.iter().enumerate() {
            for (j, column) in entries.iter().enumerate() {
                cells[i][j] = match align(row.timeline, column.timeline) {
                    Some(series) => aligned_score(&series),
                    None => {
                        tracing::info!(
                            left = row.name,
                            right = column.name,
                            "Not enough overlapping data for correlation, using 0"
                        );
                        0.0
                    }
                };
            }
        }

        Self {
            names: entries.iter().map(|e| e.name.to_string()).collect(),
            short_names: entries.iter().map(|e| e.short_name.to_string()).collect(),
            cells,
            active: entries.iter().map(|e| !e.timeline.is_empty()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row)?.get(column).copied()
    }

    /// Column with the unique highest score in `row`, ignoring the diagonal
    /// and contributors without activity.
    ///
    /// `None` when the row has no candidates or the maximum is shared.
    pub fn most_triggered_by(&self, row: usize) -> Option<usize> {
        let scores = self.cells.get(row)?;
        let mut best: Option<(usize, f64)> = None;
        let mut tied = false;

        for (column, &score) in scores.iter().enumerate() {
            if column == row || !self.active.get(column).copied().unwrap_or(false) {
                continue;
            }
            match best {
                Some((_, best_score)) if score > best_score => {
                    best = Some((column, score));
                    tied = false;
                }
                Some((_, best_score)) if score == best_score => tied = true,
                Some(_) => {}
                None => best = Some((column, score)),
            }
        }

        match best {
            Some((column, _)) if !tied => Some(column),
            _ => None,
        }
    }

    /// Directed trigger links for every row with a unique maximum.
    pub fn triggers(&self) -> Vec<TriggerLink> {
        (0..self.len())
            .filter_map(|row| {
                let column = self.most_triggered_by(row)?;
                Some(TriggerLink {
                    triggered: self.names[row].clone(),
                    triggered_by: self.names[column].clone(),
                })
            })
            .collect()
    }
}
