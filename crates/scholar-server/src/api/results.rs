use axum::{
    extract::{Query, State},
    Extension, Json,
};
use scholar_db::ResultRow;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ResultsQuery {
    pub limit: Option<i64>,
}

/// Newest rows first, exactly as persisted.
pub(super) async fn list_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ApiResponse<Vec<ResultRow>>>, ApiError> {
    let rows = scholar_db::list_recent_results(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(rows, req_id.0)))
}
