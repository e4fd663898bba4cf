use axum::{extract::State, Extension, Json};
use scholar_core::{SearchDefaults, Topic};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct TopicsData {
    topics: Vec<Topic>,
    defaults: SearchDefaults,
}

pub(super) async fn list_topics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<TopicsData>> {
    let data = TopicsData {
        topics: state.topics.topics.clone(),
        defaults: state.topics.defaults.clone(),
    };
    Json(ApiResponse::new(data, req_id.0))
}
