//! Delivery statistics handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::{ChartInfo, ChartQuery};
use shared::time::parse_range;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Chart data for the records created in a date range.
///
/// GET /api/v1/push/admin/chart?start_date=2024-01-01&end_date=2024-01-07
pub async fn chart_info(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartInfo>, ApiError> {
    query.validate()?;

    let (start, end) = parse_range(&query.start_date, &query.end_date)?;
    let chart = state.statistics.chart_info(start, end).await?;

    Ok(Json(chart))
}
