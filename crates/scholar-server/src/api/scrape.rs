use axum::{extract::State, http::StatusCode, Extension, Json};
use scholar_core::{ScrapeRequest, SearchDefaults, Topic};
use scholar_scraper::{ProgressState, StartError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Unset fields fall back to the catalogue's search defaults.
#[derive(Debug, Default, Deserialize)]
pub(super) struct StartScrapeBody {
    #[serde(default)]
    pub topics: Vec<String>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub min_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeAccepted {
    status: &'static str,
    topics: Vec<Topic>,
    year_start: i32,
    year_end: i32,
    min_results: u32,
}

impl StartScrapeBody {
    pub(super) fn into_request(
        self,
        defaults: &SearchDefaults,
    ) -> Result<ScrapeRequest, scholar_core::RequestError> {
        ScrapeRequest::new(
            self.topics.into_iter().map(Topic::from).collect(),
            self.year_start.unwrap_or(defaults.year_start),
            self.year_end.unwrap_or(defaults.year_end),
            self.min_results.unwrap_or(defaults.min_results),
        )
    }
}

/// Validate the body and hand the run to the background task.
///
/// Validation happens before the run guard is touched, so a rejected body
/// never disturbs progress or the store.
pub(super) async fn start_scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<StartScrapeBody>,
) -> Result<(StatusCode, Json<ApiResponse<ScrapeAccepted>>), ApiError> {
    let request = body
        .into_request(&state.topics.defaults)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let accepted = ScrapeAccepted {
        status: "received",
        topics: request.topics.clone(),
        year_start: request.year_start,
        year_end: request.year_end,
        min_results: request.min_results_per_topic,
    };

    match state.scrape.start(request) {
        Ok(_handle) => Ok((
            StatusCode::ACCEPTED,
            Json(ApiResponse::new(accepted, req_id.0)),
        )),
        Err(e @ StartError::AlreadyRunning) => {
            tracing::info!("scrape request rejected: run in progress");
            Err(ApiError::new(req_id.0, "conflict", e.to_string()))
        }
    }
}

pub(super) async fn get_progress(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ProgressState>> {
    Json(ApiResponse::new(state.scrape.progress().snapshot(), req_id.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SearchDefaults {
        SearchDefaults {
            year_start: 2024,
            year_end: 2025,
            min_results: 50,
        }
    }

    #[test]
    fn missing_fields_take_catalogue_defaults() {
        let body = StartScrapeBody {
            topics: vec!["Computação quântica".to_string()],
            ..StartScrapeBody::default()
        };
        let request = body.into_request(&defaults()).expect("valid request");
        assert_eq!(request.year_start, 2024);
        assert_eq!(request.year_end, 2025);
        assert_eq!(request.min_results_per_topic, 50);
        assert_eq!(request.topics, vec![Topic::from("Computação quântica")]);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let body: StartScrapeBody = serde_json::from_value(serde_json::json!({
            "topics": ["a", "b"],
            "year_start": 2020,
            "year_end": 2021,
            "min_results": 5
        }))
        .expect("deserialize");
        let request = body.into_request(&defaults()).expect("valid request");
        assert_eq!(request.topics.len(), 2);
        assert_eq!(request.year_start, 2020);
        assert_eq!(request.min_results_per_topic, 5);
    }

    #[test]
    fn empty_topics_are_rejected() {
        let body: StartScrapeBody =
            serde_json::from_value(serde_json::json!({})).expect("deserialize");
        assert_eq!(
            body.into_request(&defaults()).unwrap_err(),
            scholar_core::RequestError::NoTopics
        );
    }

    #[test]
    fn accepted_payload_is_serializable() {
        let item = ScrapeAccepted {
            status: "received",
            topics: vec![Topic::from("q")],
            year_start: 2024,
            year_end: 2025,
            min_results: 50,
        };
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["status"], "received");
        assert_eq!(json["topics"][0], "q");
    }
}
