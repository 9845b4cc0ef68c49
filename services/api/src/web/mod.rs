//! services/api/src/web/mod.rs
//!
//! The HTTP surface: handler modules plus the master OpenAPI definition.

pub mod auth;
pub mod chat;
pub mod community;
pub mod journal;
pub mod middleware;
pub mod state;

pub use middleware::require_auth;

use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        journal::journal_overview_handler,
        journal::journal_submit_handler,
        chat::chat_handler,
        chat::chat_history_handler,
        community::community_submit_handler,
        community::community_feed_handler,
        community::community_analysis_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            journal::JournalSubmitRequest,
            journal::JournalEntryDto,
            journal::JournalOverviewResponse,
            journal::JournalSubmitResponse,
            chat::ChatRequest,
            chat::ChatTurnDto,
            chat::ChatResponse,
            chat::ChatHistoryResponse,
            community::SubmitRequest,
            community::SubmissionDto,
            community::SubmitResponse,
            community::AnalysisResponse,
        )
    ),
    tags(
        (name = "Mood Journal API", description = "API endpoints for the mood journal, coach chat and community feed.")
    )
)]
pub struct ApiDoc;
