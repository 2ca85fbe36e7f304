// POST /api/recommend: rank catalog subtopics for a topic and attach videos.
//
// Body: { "topic": "neural networks", "topN": 5 }
// When no video search is configured every recommendation carries an empty
// `videos` list.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::recommend::{attach_videos, EnrichedRecommendation, LookupOptions};
use crate::error::Error;
use crate::web::{api_error, bad_body, error_response, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub topic: Option<String>,
    /// Signed so that zero and negative counts reach the InvalidArgument path
    pub top_n: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<EnrichedRecommendation>,
}

pub async fn recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let topic = match body.topic.as_deref().map(str::trim) {
        Some(topic) if !topic.is_empty() => topic.to_string(),
        _ => return api_error(StatusCode::BAD_REQUEST, "topic is required"),
    };
    let top_n = match body.top_n {
        None => state.config.default_top_n,
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
        Some(n) => {
            return error_response(&Error::invalid(format!(
                "topN must be greater than zero, got {n}"
            )));
        }
    };

    let recommender = match state.recommender.get().await {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };

    let ranked = match recommender.recommend(&topic, top_n) {
        Ok(ranked) => ranked,
        Err(e) => return error_response(&e),
    };

    let recommendations = match &state.videos {
        Some(search) => {
            let options = LookupOptions {
                videos_per_result: state.config.videos_per_result,
                timeout: state.config.collaborator_timeout,
                ..LookupOptions::default()
            };
            match attach_videos(ranked, search.as_ref(), &options).await {
                Ok(enriched) => enriched,
                Err(e) => return error_response(&e),
            }
        }
        None => ranked
            .into_iter()
            .map(|recommendation| EnrichedRecommendation {
                recommendation,
                videos: Vec::new(),
            })
            .collect(),
    };

    Json(RecommendResponse { recommendations }).into_response()
}
