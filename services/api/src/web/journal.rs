//! services/api/src/web/journal.rs
//!
//! The journal endpoints: the overview a client renders on login, and the
//! submission path that runs sentiment scoring and AI feedback inline before
//! storing the entry.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use moodlog_core::domain::{FeedbackRecord, JournalEntry};
use moodlog_core::{locale, sentiment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

/// A fresh mood vote locks out further voting for this long.
const VOTE_WINDOW_HOURS: i64 = 10;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct JournalSubmitRequest {
    pub mood: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub gratitude: String,
}

#[derive(Serialize, ToSchema)]
pub struct JournalEntryDto {
    pub date: DateTime<Utc>,
    pub mood: String,
    pub focus: String,
    pub reflection: String,
    pub improvements: String,
    pub gratitude: String,
}

impl From<&JournalEntry> for JournalEntryDto {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            date: entry.date,
            mood: entry.mood.clone(),
            focus: entry.focus.clone(),
            reflection: entry.reflection.clone(),
            improvements: entry.improvements.clone(),
            gratitude: entry.gratitude.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct JournalOverviewResponse {
    pub entry: Option<JournalEntryDto>,
    pub feedback: Option<String>,
    pub last_mood: Option<String>,
    /// False while the last mood vote is younger than the voting window.
    pub can_vote: bool,
    pub language: String,
}

#[derive(Serialize, ToSchema)]
pub struct JournalSubmitResponse {
    pub entry: JournalEntryDto,
    pub feedback: String,
    pub sentiment: String,
    pub score: f64,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /journal - The user's entry, latest feedback and voting state
#[utoipa::path(
    get,
    path = "/journal",
    responses(
        (status = 200, description = "Journal overview", body = JournalOverviewResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn journal_overview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state.store.get_profile(user_id).await.map_err(|e| {
        error!("Failed to load profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load profile".to_string(),
        )
    })?;

    let entry = state.store.get_journal_entry(user_id).await.map_err(|e| {
        error!("Failed to load journal entry: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load journal".to_string(),
        )
    })?;
    let feedback = state.store.get_feedback(user_id).await.map_err(|e| {
        error!("Failed to load feedback: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load journal".to_string(),
        )
    })?;

    let can_vote = match &entry {
        Some(entry) => Utc::now() - entry.date >= Duration::hours(VOTE_WINDOW_HOURS),
        None => true,
    };
    let language = locale::resolve(
        profile.preferred_language.as_deref(),
        profile.browser_language.as_deref(),
        Some(&profile.country),
    );

    Ok(Json(JournalOverviewResponse {
        last_mood: entry.as_ref().map(|e| e.mood.clone()),
        entry: entry.as_ref().map(JournalEntryDto::from),
        feedback: feedback.map(|f| f.feedback),
        can_vote,
        language,
    }))
}

/// POST /journal - Store today's entry and generate AI feedback
#[utoipa::path(
    post,
    path = "/journal",
    request_body = JournalSubmitRequest,
    responses(
        (status = 201, description = "Entry stored with feedback", body = JournalSubmitResponse),
        (status = 400, description = "Mood is required"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn journal_submit_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<JournalSubmitRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mood = req.mood.trim();
    if mood.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Mood is required".to_string()));
    }

    let profile = state.store.get_profile(user_id).await.map_err(|e| {
        error!("Failed to load profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load profile".to_string(),
        )
    })?;

    let entry = JournalEntry {
        user_id,
        date: Utc::now(),
        mood: mood.to_string(),
        focus: req.focus.trim().to_string(),
        reflection: req.reflection.trim().to_string(),
        improvements: req.improvements.trim().to_string(),
        gratitude: req.gratitude.trim().to_string(),
    };

    let language = crate::services::feedback::profile_language(&profile);
    let (label, score) = sentiment::score(&entry, &language);
    let feedback = state.feedback.generate(&entry, label, score, &profile).await;

    state.store.upsert_journal_entry(&entry).await.map_err(|e| {
        error!("Failed to store journal entry: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store entry".to_string(),
        )
    })?;
    let record = FeedbackRecord {
        user_id,
        date: entry.date,
        mood: entry.mood.clone(),
        feedback: feedback.clone(),
    };
    state.store.upsert_feedback(&record).await.map_err(|e| {
        error!("Failed to store feedback: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store entry".to_string(),
        )
    })?;

    Ok((
        StatusCode::CREATED,
        Json(JournalSubmitResponse {
            entry: JournalEntryDto::from(&entry),
            feedback,
            sentiment: label.to_string(),
            score,
        }),
    ))
}
