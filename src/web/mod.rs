// Web server: Axum JSON API over the analyzer, recommender and summarizer.
//
// Routes mirror the CLI commands. Collaborators live in AppState as trait
// objects so tests can build the router with fakes. The recommender is
// built on first use behind LazyRecommender.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::collaborators::feed::CsvFeed;
use crate::collaborators::gemini::GeminiSummarizer;
use crate::collaborators::traits::{FeedSource, Summarizer, TranscriptSource, VideoSearch};
use crate::collaborators::transcript::TimedTextTranscripts;
use crate::collaborators::youtube::YouTubeSearch;
use crate::config::Config;
use crate::error::Error;
use crate::recommend::LazyRecommender;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<LazyRecommender>,
    pub feed: Arc<dyn FeedSource>,
    /// None when YOUTUBE_API_KEY is not configured
    pub videos: Option<Arc<dyn VideoSearch>>,
    pub transcripts: Arc<dyn TranscriptSource>,
    /// None when GOOGLE_API_KEY is not configured
    pub summarizer: Option<Arc<dyn Summarizer>>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let videos: Option<Arc<dyn VideoSearch>> = if config.youtube_api_key.is_empty() {
            None
        } else {
            Some(Arc::new(YouTubeSearch::new(config.youtube_api_key.clone())?))
        };
        let summarizer: Option<Arc<dyn Summarizer>> = if config.google_api_key.is_empty() {
            None
        } else {
            Some(Arc::new(GeminiSummarizer::new(
                config.google_api_key.clone(),
                &config.summary_model,
            )?))
        };

        Ok(Self {
            recommender: Arc::new(LazyRecommender::new(config.catalog_path.clone())),
            feed: Arc::new(CsvFeed::new()?),
            videos,
            transcripts: Arc::new(TimedTextTranscripts::new("en")?),
            summarizer,
            config: Arc::new(config),
        })
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    let state = AppState::from_config(config)?;

    if state.videos.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set; /api/recommend will return subtopics without videos");
    }
    if state.summarizer.is_none() {
        tracing::warn!("GOOGLE_API_KEY not set; /api/summarize is disabled");
    }

    let app = build_router(state)?;

    let addr = format!("{bind}:{port}");
    info!("learnpath API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Result<Router> {
    let origin = HeaderValue::from_str(&state.config.cors_origin)
        .with_context(|| format!("Invalid CORS origin {:?}", state.config.cors_origin))?;

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/recommend", post(handlers::recommend::recommend))
        .route("/api/summarize", post(handlers::summarize::summarize))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// Unparseable or mistyped request bodies are a 400 with a JSON body, like
/// every other error.
pub fn bad_body(rejection: JsonRejection) -> Response {
    api_error(StatusCode::BAD_REQUEST, &rejection.body_text())
}

/// Map a core error to its HTTP status and JSON body.
pub fn error_response(err: &Error) -> Response {
    let status = match err {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::Input {
            input: "catalog", ..
        } => StatusCode::INTERNAL_SERVER_ERROR,
        Error::MalformedRecord { .. } | Error::Input { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::CollaboratorFailure {
            timed_out: true, ..
        } => StatusCode::GATEWAY_TIMEOUT,
        Error::CollaboratorFailure { .. } => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    }
    api_error(status, &err.to_string())
}
