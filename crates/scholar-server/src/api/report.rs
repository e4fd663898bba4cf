use axum::{extract::State, Extension, Json};
use chrono::{Datelike, Utc};
use scholar_report::Report;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// Charts over the whole collection; `data` is `null` while the store is empty.
pub(super) async fn get_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Option<Report>>>, ApiError> {
    let rows = scholar_db::list_all_results(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let report = scholar_report::build_report(&rows, Utc::now().year());
    Ok(Json(ApiResponse::new(report, req_id.0)))
}
