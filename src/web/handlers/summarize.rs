// POST /api/summarize: summarize a YouTube video from its transcript.
//
// Body: { "videoUrl": "https://www.youtube.com/watch?v=..." }
// Returns 503 when no summarizer is configured.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::summarize::{summarize_video, SummaryOptions};
use crate::web::{api_error, bad_body, error_response, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub video_id: String,
    pub summary: String,
}

pub async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let Some(video_url) = body.video_url.filter(|u| !u.trim().is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "videoUrl is required");
    };

    let Some(summarizer) = &state.summarizer else {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Summaries are disabled: GOOGLE_API_KEY is not configured",
        );
    };

    let options = SummaryOptions {
        timeout: state.config.collaborator_timeout,
        ..SummaryOptions::default()
    };

    match summarize_video(
        video_url.trim(),
        state.transcripts.as_ref(),
        summarizer.as_ref(),
        &options,
    )
    .await
    {
        Ok(summary) => Json(SummarizeResponse {
            video_id: summary.video_id,
            summary: summary.summary,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
