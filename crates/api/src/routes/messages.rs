//! Message record listing handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::{
    ListDeliveriesQuery, ListDeliveriesResponse, ListMessagesQuery, ListMessagesResponse,
};
use shared::pagination::PageRequest;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn page_request(state: &AppState, start: Option<u32>, length: Option<u32>) -> PageRequest {
    let limits = &state.config.limits;
    PageRequest::from_params(
        start,
        length,
        limits.default_page_size,
        limits.max_page_size,
    )
}

/// List push message records, newest first.
///
/// GET /api/v1/push/admin/messages?start=0&length=10&search=<text>
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
    query.validate()?;

    let page = page_request(&state, query.start, query.length);
    let result = state.messages.find_page(query.search_text(), page).await?;

    Ok(Json(ListMessagesResponse {
        data: result.items,
        records_total: result.total,
        records_filtered: result.total,
    }))
}

/// List the per-device delivery records of one message.
///
/// GET /api/v1/push/admin/messages/:message_id/deliveries?delivery_state=0
pub async fn list_deliveries(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Query(query): Query<ListDeliveriesQuery>,
) -> Result<Json<ListDeliveriesResponse>, ApiError> {
    query.validate()?;

    let page = page_request(&state, query.start, query.length);
    let result = state
        .deliveries
        .find_page(message_id, query.state_filter(), page)
        .await?;

    Ok(Json(ListDeliveriesResponse {
        data: result.items,
        records_total: result.total,
        records_filtered: result.total,
    }))
}
