//! Push endpoint handlers.

use axum::{extract::State, Json};
use domain::models::PushRequest;
use domain::services::AdminPushOutcome;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_acknowledgments, record_connector_unavailable, record_push_dispatched, DispatchMode,
};

/// Response for a server push.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerPushResponse {
    pub success: bool,
}

/// Response for an admin push.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminPushResponse {
    pub success: bool,
    pub message_id: i64,
    pub remark: String,
    pub total_count: i32,
    pub success_count: i32,
    pub fail_count: i32,
}

/// Notify an application's users without waiting for acknowledgments.
///
/// POST /api/v1/push/server
pub async fn server_push(
    State(state): State<AppState>,
    Json(request): Json<PushRequest>,
) -> Result<Json<ServerPushResponse>, ApiError> {
    request.validate()?;

    let outcome = state.push.server_push(&request).await?;
    if outcome.dispatched {
        record_push_dispatched(DispatchMode::SendOnly);
    }

    info!(
        app_name = %request.app_name,
        recipients = outcome.recipients,
        dispatched = outcome.dispatched,
        "Server push handled"
    );

    Ok(Json(ServerPushResponse { success: true }))
}

/// Notify an application's devices and record per-device outcomes.
///
/// POST /api/v1/push/admin
pub async fn admin_push(
    State(state): State<AppState>,
    Json(request): Json<PushRequest>,
) -> Result<Json<AdminPushResponse>, ApiError> {
    request.validate()?;

    let outcome = match state.push.admin_push(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_unavailable() {
                record_connector_unavailable();
            }
            return Err(e.into());
        }
    };

    if let AdminPushOutcome::Sent(record) = &outcome {
        record_push_dispatched(DispatchMode::SendAndAwait);
        record_acknowledgments(record.success_count, record.fail_count);
    }

    let record = outcome.record();
    info!(
        message_id = record.id,
        app_name = %record.app_name,
        total = record.total_count,
        delivered = record.success_count,
        failed = record.fail_count,
        "Admin push recorded"
    );

    Ok(Json(AdminPushResponse {
        success: true,
        message_id: record.id,
        remark: record.remark.clone(),
        total_count: record.total_count,
        success_count: record.success_count,
        fail_count: record.fail_count,
    }))
}
