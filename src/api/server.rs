//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{handlers, models::*};
use crate::config::Config;
use crate::error::AppError;
use crate::pipeline::Pipeline;
use crate::session::Session;

const INDEX_HTML: &str = include_str!("../../ui/index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub pipeline: Arc<Pipeline>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, config: Config) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(serve_ui))
        .route("/health", get(health_handler))
        .route("/api/session", get(session_handler))
        .route("/api/transcript/url", post(load_url_handler))
        .route("/api/transcript/srt", post(load_srt_handler))
        .route("/api/summary", post(summary_handler))
        .route("/api/summary.md", get(summary_download_handler))
        .route("/api/search", get(search_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/quiz", post(quiz_handler))
        .route("/api/quiz/answer", post(answer_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(app_state: AppState) -> Result<()> {
    let address = format!("{}:{}", app_state.config.server.host, app_state.config.server.port);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 Transcript Lens listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP status for a failed action
pub fn error_status(error: &AppError) -> StatusCode {
    match error {
        AppError::InvalidUrl(_)
        | AppError::Decode(_)
        | AppError::EmptyQuestion
        | AppError::QuestionOutOfRange(_) => StatusCode::BAD_REQUEST,
        AppError::NoTranscript | AppError::NoQuiz | AppError::NoSummary => StatusCode::NOT_FOUND,
        AppError::Fetch(_) | AppError::Completion(_) => StatusCode::BAD_GATEWAY,
        AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: crate::error::Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            warn!("Action failed ({}): {}", e.kind(), e);
            (error_status(&e), Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

/// Serve the single-page UI
async fn serve_ui() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check().await))
}

async fn session_handler(State(state): State<AppState>) -> Response {
    respond(Ok(handlers::session_view(&state).await))
}

async fn load_url_handler(State(state): State<AppState>, Json(payload): Json<LoadUrlRequest>) -> Response {
    respond(handlers::load_url(&state, &payload.url).await)
}

async fn load_srt_handler(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    respond(handlers::load_srt(&state, &body, params.filename).await)
}

async fn summary_handler(State(state): State<AppState>) -> Response {
    respond(handlers::summarize(&state).await)
}

/// Serve the last summary as a markdown attachment
async fn summary_download_handler(State(state): State<AppState>) -> Response {
    match handlers::summary_markdown(&state).await {
        Ok(summary) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                state.config.output.summary_filename
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/markdown".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                summary,
            )
                .into_response()
        }
        Err(e) => respond::<()>(Err(e)),
    }
}

async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    respond(handlers::search(&state, &params.q).await)
}

async fn ask_handler(State(state): State<AppState>, Json(payload): Json<AskRequest>) -> Response {
    respond(handlers::ask(&state, &payload.question).await)
}

async fn quiz_handler(State(state): State<AppState>) -> Response {
    respond(handlers::generate_quiz(&state).await)
}

async fn answer_handler(State(state): State<AppState>, Json(payload): Json<CheckAnswerRequest>) -> Response {
    respond(handlers::check_answer(&state, &payload).await)
}
