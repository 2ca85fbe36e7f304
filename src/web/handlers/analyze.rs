// POST /api/analyze: weak-topic analysis of a remote quiz log.
//
// Body: { "url": "https://.../quiz.csv" }
// Returns the file name, its content type and the weak topics in
// first-encounter order. The weak topics are also sent as `analysis1`, the
// key the existing dashboard frontend reads.
//
// Only http(s) URLs are accepted here. Local paths are a CLI-only input; the
// server never reads its own filesystem on a client's behalf.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::collaborators::{feed, guard};
use crate::performance::{analyze as analyze_records, read_records};
use crate::web::{api_error, bad_body, error_response, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub file_name: String,
    pub file_type: &'static str,
    /// Size of the downloaded CSV in bytes
    pub file_size: usize,
    pub weak_topics: Vec<String>,
    pub analysis1: Vec<String>,
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let url = match body.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return api_error(StatusCode::BAD_REQUEST, "url is required"),
    };
    if !feed::is_remote(&url) {
        return api_error(StatusCode::BAD_REQUEST, "url must be an http(s) URL");
    }

    let text = match guard(
        "quiz log feed",
        state.config.collaborator_timeout,
        state.feed.fetch(&url),
    )
    .await
    {
        Ok(text) => text,
        Err(e) => return error_response(&e),
    };

    let report = read_records(text.as_bytes())
        .and_then(|records| analyze_records(&records, &state.config.thresholds));

    match report {
        Ok(report) => Json(AnalyzeResponse {
            file_name: feed::file_name(&url),
            file_type: "text/csv",
            file_size: text.len(),
            analysis1: report.weak_topics.clone(),
            weak_topics: report.weak_topics,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
