//! Delivery statistics over a date window.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use shared::time::{day_label, day_label_for, trailing_days};

use crate::error::PushError;
use crate::models::{ChartInfo, MessageRecord};
use crate::services::store::MessageStore;

/// Days synthesized when a window holds no records.
pub const EMPTY_WINDOW_DAYS: u32 = 7;

/// Builds the chart series for the given records.
///
/// Each record contributes its own entry; records sharing a day are not
/// merged. With no records the series is the trailing seven days ending
/// `today`, all zero.
pub fn build_chart(records: &[MessageRecord], today: NaiveDate) -> ChartInfo {
    let mut chart = ChartInfo::default();

    if records.is_empty() {
        for day in trailing_days(today, EMPTY_WINDOW_DAYS) {
            chart.push_entry(day_label_for(day), 0, 0, 0);
        }
        return chart;
    }

    for record in records {
        chart.push_entry(
            day_label(record.created_at),
            record.total_count,
            record.success_count,
            record.fail_count,
        );
    }
    chart
}

/// Reads persisted message records and turns them into chart data.
#[derive(Clone)]
pub struct StatisticsAggregator {
    messages: Arc<dyn MessageStore>,
}

impl StatisticsAggregator {
    pub fn new(messages: Arc<dyn MessageStore>) -> Self {
        Self { messages }
    }

    /// Chart data for records created in `[start, end]`.
    pub async fn chart_info(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ChartInfo, PushError> {
        let records = self.messages.find_created_between(start, end).await?;
        let chart = build_chart(&records, Utc::now().date_naive());

        tracing::debug!(
            start = %start,
            end = %end,
            records = records.len(),
            "Built delivery chart"
        );

        Ok(chart)
    }
}
