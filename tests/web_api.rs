// Router tests for the JSON API.
//
// Builds the axum router with in-memory collaborators and drives it with
// tower's `oneshot`, so no sockets or external services are involved.

#![cfg(feature = "web")]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use learnpath::catalog::CatalogEntry;
use learnpath::collaborators::traits::{
    FeedSource, Summarizer, TranscriptSource, Video, VideoSearch,
};
use learnpath::config::Config;
use learnpath::performance::WeakTopicThresholds;
use learnpath::recommend::{LazyRecommender, Recommender};
use learnpath::web::{build_router, AppState};

// ============================================================
// Fakes and helpers
// ============================================================

/// Serves fixed CSV text for any location containing "quiz", fails otherwise.
struct StaticFeed(&'static str);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self, location: &str) -> anyhow::Result<String> {
        if location.contains("quiz") {
            Ok(self.0.to_string())
        } else {
            anyhow::bail!("404 Not Found")
        }
    }
}

struct OneVideo;

#[async_trait]
impl VideoSearch for OneVideo {
    async fn search(&self, query: &str, _max_results: u32) -> anyhow::Result<Vec<Video>> {
        Ok(vec![Video {
            title: format!("Intro to {query}"),
            url: "https://www.youtube.com/watch?v=aircAruvnKk".to_string(),
            thumbnail: "https://i.ytimg.com/vi/aircAruvnKk/default.jpg".to_string(),
            description: String::new(),
        }])
    }
}

struct FixedTranscript;

#[async_trait]
impl TranscriptSource for FixedTranscript {
    async fn transcript(&self, _video_id: &str) -> anyhow::Result<String> {
        Ok("gradient descent walks downhill on the loss surface".to_string())
    }
}

struct UpperSummarizer;

#[async_trait]
impl Summarizer for UpperSummarizer {
    async fn summarize(&self, text: &str) -> anyhow::Result<String> {
        Ok(text.to_uppercase())
    }
}

const QUIZ_CSV: &str = "Topic,Correct,Time_Taken\nLoops,1,30\nLoops,0,150\nArrays,1,10\n";

fn test_config() -> Config {
    Config {
        catalog_path: PathBuf::from("/nonexistent/catalog.csv"),
        youtube_api_key: String::new(),
        google_api_key: String::new(),
        summary_model: "gemini-test".to_string(),
        thresholds: WeakTopicThresholds::default(),
        default_top_n: 5,
        videos_per_result: 3,
        collaborator_timeout: Duration::from_secs(5),
        cors_origin: "http://localhost:5173".to_string(),
        port: 0,
    }
}

fn recommender() -> Recommender {
    Recommender::new(vec![
        CatalogEntry::new("AI", "neural networks"),
        CatalogEntry::new("AI", "decision trees"),
        CatalogEntry::new("Statistics", "bayesian inference"),
    ])
}

fn state(with_videos: bool, with_summarizer: bool) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        recommender: Arc::new(LazyRecommender::ready(recommender())),
        feed: Arc::new(StaticFeed(QUIZ_CSV)),
        videos: with_videos.then(|| Arc::new(OneVideo) as Arc<dyn VideoSearch>),
        transcripts: Arc::new(FixedTranscript),
        summarizer: with_summarizer.then(|| Arc::new(UpperSummarizer) as Arc<dyn Summarizer>),
    }
}

fn router(with_videos: bool, with_summarizer: bool) -> Router {
    build_router(state(with_videos, with_summarizer)).unwrap()
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ============================================================
// GET /health
// ============================================================

#[tokio::test]
async fn health_is_ok() {
    let response = router(false, false)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================
// POST /api/analyze
// ============================================================

#[tokio::test]
async fn analyze_returns_weak_topics() {
    let (status, json) = post_json(
        router(false, false),
        "/api/analyze",
        serde_json::json!({ "url": "https://files.example.com/logs/quiz.csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fileName"], "quiz.csv");
    assert_eq!(json["fileType"], "text/csv");
    assert_eq!(json["weakTopics"], serde_json::json!(["Loops"]));
    assert_eq!(json["analysis1"], serde_json::json!(["Loops"]));
    assert_eq!(json["fileSize"], QUIZ_CSV.len());
}

#[tokio::test]
async fn analyze_refuses_server_local_paths() {
    // StaticFeed would happily serve any location containing "quiz"
    for path in ["/tmp/quiz.csv", "./data/quiz.csv", "file:///tmp/quiz.csv"] {
        let (status, json) = post_json(
            router(false, false),
            "/api/analyze",
            serde_json::json!({ "url": path }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "url: {path}");
        assert!(json["error"].as_str().unwrap().contains("http"));
    }
}

#[tokio::test]
async fn analyze_with_real_feed_never_reads_local_files() {
    let path = std::env::temp_dir().join("learnpath-web-private-quiz.csv");
    std::fs::write(&path, "Topic,Correct,Time_Taken\nSecretTopic,0,200\n").unwrap();

    let mut state = state(false, false);
    state.feed = Arc::new(learnpath::collaborators::feed::CsvFeed::new().unwrap());
    let (status, json) = post_json(
        build_router(state).unwrap(),
        "/api/analyze",
        serde_json::json!({ "url": path.to_str().unwrap() }),
    )
    .await;

    let _ = std::fs::remove_file(&path);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!json.to_string().contains("SecretTopic"));
}

#[tokio::test]
async fn analyze_requires_url() {
    let (status, json) = post_json(router(false, false), "/api/analyze", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn analyze_feed_failure_is_bad_gateway() {
    let (status, _) = post_json(
        router(false, false),
        "/api/analyze",
        serde_json::json!({ "url": "https://files.example.com/missing.csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn analyze_malformed_rows_are_unprocessable() {
    let mut state = state(false, false);
    state.feed = Arc::new(StaticFeed("Topic,Correct,Time_Taken\nLoops,maybe,30\n"));
    let (status, json) = post_json(
        build_router(state).unwrap(),
        "/api/analyze",
        serde_json::json!({ "url": "https://files.example.com/quiz.csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Correct"));
}

// ============================================================
// POST /api/recommend
// ============================================================

#[tokio::test]
async fn recommend_with_videos() {
    let (status, json) = post_json(
        router(true, false),
        "/api/recommend",
        serde_json::json!({ "topic": "neural network", "topN": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["subtopic"], "neural networks");
    assert_eq!(recs[0]["topic"], "AI");
    assert!(recs[0]["score"].as_f64().unwrap() > 0.0);
    assert_eq!(recs[0]["videos"][0]["title"], "Intro to neural networks");
}

#[tokio::test]
async fn recommend_without_video_search_has_empty_videos() {
    let (status, json) = post_json(
        router(false, false),
        "/api/recommend",
        serde_json::json!({ "topic": "bayesian" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = json["recommendations"].as_array().unwrap();
    // default top_n of 5 is capped by the 3-entry catalog
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["subtopic"], "bayesian inference");
    assert!(recs.iter().all(|r| r["videos"] == serde_json::json!([])));
}

#[tokio::test]
async fn recommend_rejects_blank_topic_and_zero_top_n() {
    let (status, _) = post_json(
        router(false, false),
        "/api/recommend",
        serde_json::json!({ "topic": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        router(false, false),
        "/api/recommend",
        serde_json::json!({ "topic": "neural", "topN": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommend_negative_top_n_is_json_bad_request() {
    let (status, json) = post_json(
        router(false, false),
        "/api/recommend",
        serde_json::json!({ "topic": "neural", "topN": -1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("topN"));
}

#[tokio::test]
async fn malformed_bodies_are_json_bad_requests() {
    for uri in ["/api/analyze", "/api/recommend", "/api/summarize"] {
        let (status, json) = post_raw(router(false, true), uri, "not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert!(json["error"].is_string(), "uri: {uri}");
    }

    let (status, json) = post_json(
        router(false, false),
        "/api/recommend",
        serde_json::json!({ "topic": "neural", "topN": "five" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn recommend_with_unreadable_catalog_is_server_error() {
    let mut state = state(false, false);
    state.recommender = Arc::new(LazyRecommender::new(PathBuf::from(
        "/nonexistent/learnpath/catalog.csv",
    )));
    let (status, _) = post_json(
        build_router(state).unwrap(),
        "/api/recommend",
        serde_json::json!({ "topic": "neural" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================
// POST /api/summarize
// ============================================================

#[tokio::test]
async fn summarize_returns_summary() {
    let (status, json) = post_json(
        router(false, true),
        "/api/summarize",
        serde_json::json!({ "videoUrl": "https://www.youtube.com/watch?v=aircAruvnKk" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["videoId"], "aircAruvnKk");
    assert_eq!(
        json["summary"],
        "GRADIENT DESCENT WALKS DOWNHILL ON THE LOSS SURFACE"
    );
}

#[tokio::test]
async fn summarize_bad_url_is_bad_request() {
    let (status, _) = post_json(
        router(false, true),
        "/api/summarize",
        serde_json::json!({ "videoUrl": "https://example.com/video" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summarize_without_summarizer_is_unavailable() {
    let (status, json) = post_json(
        router(false, false),
        "/api/summarize",
        serde_json::json!({ "videoUrl": "https://youtu.be/aircAruvnKk" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("GOOGLE_API_KEY"));
}
