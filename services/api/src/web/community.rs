//! services/api/src/web/community.rs
//!
//! The community endpoints: share a post, read the feed, read the latest
//! aggregated analysis, and two small statistics views.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use moodlog_core::domain::CommunitySubmission;
use moodlog_core::prompts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::community::CommunityError;
use crate::services::feedback::profile_language;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SubmitRequest {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct SubmissionDto {
    pub id: Uuid,
    pub author_name: String,
    pub country: String,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

impl From<&CommunitySubmission> for SubmissionDto {
    fn from(submission: &CommunitySubmission) -> Self {
        Self {
            id: submission.id,
            author_name: submission.author_name.clone(),
            country: submission.country.clone(),
            message: submission.text.clone(),
            posted_at: submission.posted_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    pub submission: SubmissionDto,
    pub analysis_refreshed: bool,
    pub podcast_written: bool,
}

#[derive(Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub summary: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    pub input_count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct CountryCountDto {
    pub country: String,
    pub count: i64,
}

fn map_community_error(e: CommunityError) -> (StatusCode, String) {
    match e {
        CommunityError::EmptyText | CommunityError::TextTooLong => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        CommunityError::Cooldown { .. } => (StatusCode::TOO_MANY_REQUESTS, e.to_string()),
        CommunityError::Port(e) => {
            error!("Community store failure: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Community is unavailable".to_string(),
            )
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /community - Share a post with the community
#[utoipa::path(
    post,
    path = "/community",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Post accepted", body = SubmitResponse),
        (status = 400, description = "Empty or oversized post"),
        (status = 401, description = "Not authenticated"),
        (status = 429, description = "Posted again within the cooldown"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn community_submit_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state.store.get_profile(user_id).await.map_err(|e| {
        error!("Failed to load profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load profile".to_string(),
        )
    })?;

    let outcome = state
        .community
        .submit(&profile, &req.message)
        .await
        .map_err(map_community_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission: SubmissionDto::from(&outcome.submission),
            analysis_refreshed: outcome.analysis_refreshed,
            podcast_written: outcome.podcast_written,
        }),
    ))
}

/// GET /community - The whole feed
#[utoipa::path(
    get,
    path = "/community",
    responses(
        (status = 200, description = "All submissions", body = [SubmissionDto]),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn community_feed_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let submissions = state.store.list_submissions().await.map_err(|e| {
        error!("Failed to load feed: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load feed".to_string(),
        )
    })?;
    let feed: Vec<SubmissionDto> = submissions.iter().map(SubmissionDto::from).collect();
    Ok(Json(feed))
}

/// GET /community/analysis - The latest stored aggregation
///
/// Falls back to a language-appropriate "nothing yet" message when no
/// analysis has been produced so far.
#[utoipa::path(
    get,
    path = "/community/analysis",
    responses(
        (status = 200, description = "Latest analysis or placeholder", body = AnalysisResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn community_analysis_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let analysis = state.store.get_analysis().await.map_err(|e| {
        error!("Failed to load analysis: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load analysis".to_string(),
        )
    })?;

    match analysis {
        Some(analysis) => Ok(Json(AnalysisResponse {
            summary: analysis.summary,
            language: analysis.language,
            analyzed_at: Some(analysis.analyzed_at),
            input_count: analysis.input_count,
        })),
        None => {
            let lang = match state.store.get_profile(user_id).await {
                Ok(profile) => profile_language(&profile),
                Err(_) => "en".to_string(),
            };
            Ok(Json(AnalysisResponse {
                summary: prompts::lookup(prompts::NO_ANALYSIS_MESSAGES, &lang).to_string(),
                language: lang,
                analyzed_at: None,
                input_count: 0,
            }))
        }
    }
}

/// GET /community/statistics - Popular words and top contributors
#[utoipa::path(
    get,
    path = "/community/statistics",
    responses(
        (status = 200, description = "Feed statistics"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn community_statistics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let stats = state
        .community
        .statistics()
        .await
        .map_err(map_community_error)?;
    Ok(Json(stats))
}

/// GET /community/stats_by_country - Submission counts per country
#[utoipa::path(
    get,
    path = "/community/stats_by_country",
    responses(
        (status = 200, description = "Counts per country", body = [CountryCountDto]),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn community_stats_by_country_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let rows = state
        .store
        .submission_counts_by_country()
        .await
        .map_err(|e| {
            error!("Failed to load country counts: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load statistics".to_string(),
            )
        })?;
    let counts: Vec<CountryCountDto> = rows
        .into_iter()
        .map(|(country, count)| CountryCountDto { country, count })
        .collect();
    Ok(Json(counts))
}
