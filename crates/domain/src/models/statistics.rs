//! Delivery statistics models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for the delivery chart.
///
/// Dates are `YYYY-MM-DD HH:MM:SS` or bare `YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChartQuery {
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "End date is required"))]
    pub end_date: String,
}

/// Per-record delivery series plus window totals.
///
/// The four sequences are parallel: index `i` of each belongs to the same
/// record (or the same synthesized day when the window is empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChartInfo {
    pub day_labels: Vec<String>,
    pub total_counts: Vec<i32>,
    pub success_counts: Vec<i32>,
    pub fail_counts: Vec<i32>,
    pub total_count: i64,
    pub success_count: i64,
    pub fail_count: i64,
}

impl ChartInfo {
    /// Number of entries in the series.
    pub fn len(&self) -> usize {
        self.day_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day_labels.is_empty()
    }

    /// Appends one entry and folds its counts into the totals.
    pub fn push_entry(&mut self, label: String, total: i32, success: i32, fail: i32) {
        self.day_labels.push(label);
        self.total_counts.push(total);
        self.success_counts.push(success);
        self.fail_counts.push(fail);
        self.total_count += i64::from(total);
        self.success_count += i64::from(success);
        self.fail_count += i64::from(fail);
    }
}
