use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::merge::assembler::merge_all;
use crate::models::resume::{MasterRecord, SourceRecord};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub records: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub merge_id: Uuid,
    /// Records that took part in the merge.
    pub source_count: usize,
    /// Positions in `records` that were not JSON objects and were left out.
    pub skipped: Vec<usize>,
    pub master: MasterRecord,
}

/// POST /api/v1/merge
pub async fn handle_merge(
    State(state): State<AppState>,
    payload: Result<Json<MergeRequest>, JsonRejection>,
) -> Result<Json<MergeResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let merge_id = Uuid::new_v4();

    let mut records = Vec::with_capacity(req.records.len());
    let mut skipped = Vec::new();
    for (idx, value) in req.records.into_iter().enumerate() {
        match SourceRecord::from_value(value) {
            Some(record) => records.push(record),
            None => {
                warn!(%merge_id, "Skipping record {idx}: not a JSON object");
                skipped.push(idx);
            }
        }
    }

    let source_count = records.len();
    let config = state.merge_config.clone();
    let master = tokio::task::spawn_blocking(move || merge_all(&records, &config))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    info!(%merge_id, source_count, skipped = skipped.len(), "Merge complete");

    Ok(Json(MergeResponse {
        merge_id,
        source_count,
        skipped,
        master,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::state::AppState;

    async fn post_merge(body: String) -> (StatusCode, serde_json::Value) {
        let app = build_router(AppState::default());
        let response = app
            .oneshot(
                Request::post("/api/v1/merge")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_merge_endpoint_merges_and_reports_skipped() {
        let body = json!({"records": [
            {"work": [{"name": "Acme", "position": "Engineer", "startDate": "2019",
                       "endDate": "2020-06", "highlights": ["Built X"]}]},
            "not a record",
            {"work": [{"name": "Acme", "position": "Engineer", "startDate": "2020-01-01",
                       "endDate": "2021", "highlights": ["built x "]}]}
        ]});
        let (status, value) = post_merge(body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["source_count"], json!(2));
        assert_eq!(value["skipped"], json!([1]));
        assert_eq!(value["master"]["work"][0]["startDate"], json!("2019-01-01"));
        assert_eq!(value["master"]["work"][0]["endDate"], json!("2021-01-01"));
        assert_eq!(value["master"]["work"][0]["highlights"], json!(["Built X"]));
    }

    #[tokio::test]
    async fn test_merge_endpoint_empty_records() {
        let (status, value) = post_merge(json!({"records": []}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["source_count"], json!(0));
        assert_eq!(value["master"]["basics"]["name"], json!(""));
        assert_eq!(value["master"]["projects"], json!([]));
    }

    #[tokio::test]
    async fn test_merge_endpoint_rejects_bad_body() {
        let (status, value) = post_merge(json!({"resumes": []}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"]["code"], json!("VALIDATION_ERROR"));
    }
}
