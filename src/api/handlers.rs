//! API request handlers

use serde_json::Value;

use super::models::{
    AnswerResultView, AnswerView, CheckAnswerRequest, QuizView, SearchView, SessionView, SummaryView,
};
use super::server::AppState;
use crate::error::{AppError, Result};

/// Handle health check requests
pub async fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "transcript-lens",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

pub async fn session_view(state: &AppState) -> SessionView {
    SessionView::from(&*state.session.read().await)
}

pub async fn load_url(state: &AppState, url: &str) -> Result<SessionView> {
    let mut session = state.session.write().await;
    state.pipeline.load_from_url(&mut session, url).await?;
    Ok(SessionView::from(&*session))
}

pub async fn load_srt(state: &AppState, bytes: &[u8], filename: Option<String>) -> Result<SessionView> {
    let mut session = state.session.write().await;
    state.pipeline.load_from_srt(&mut session, bytes, filename)?;
    Ok(SessionView::from(&*session))
}

pub async fn summarize(state: &AppState) -> Result<SummaryView> {
    let mut session = state.session.write().await;
    let summary = state.pipeline.summarize(&mut session).await?;
    Ok(SummaryView { summary })
}

/// Last generated summary, byte for byte
pub async fn summary_markdown(state: &AppState) -> Result<String> {
    let session = state.session.read().await;
    session.summary().map(str::to_string).ok_or(AppError::NoSummary)
}

pub async fn search(state: &AppState, keyword: &str) -> Result<SearchView> {
    let session = state.session.read().await;
    let hits = state.pipeline.search(&session, keyword)?;
    Ok(SearchView {
        keyword: keyword.to_string(),
        hits,
    })
}

pub async fn ask(state: &AppState, question: &str) -> Result<AnswerView> {
    let session = state.session.read().await;
    let answer = state.pipeline.ask(&session, question).await?;
    Ok(AnswerView {
        question: question.to_string(),
        answer,
    })
}

pub async fn generate_quiz(state: &AppState) -> Result<QuizView> {
    let mut session = state.session.write().await;
    let quiz = state.pipeline.generate_quiz(&mut session).await?;
    Ok(QuizView::from(&quiz))
}

pub async fn check_answer(state: &AppState, request: &CheckAnswerRequest) -> Result<AnswerResultView> {
    let session = state.session.read().await;
    let feedback = state
        .pipeline
        .check_answer(&session, request.index, &request.selection)?;
    Ok(AnswerResultView::from(feedback))
}
