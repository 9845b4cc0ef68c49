//! crates/moodlog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{
    ChatSession, ChatTurn, CommunityAnalysis, CommunitySubmission, FeedbackRecord, JournalEntry,
    Shop, UserCredentials, UserProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The document-store boundary. Upsert-by-key semantics throughout: sessions,
/// journal/feedback singletons and the analysis singleton are each addressed
/// by a stable key (the owning user id, or a fixed key for the singleton).
#[async_trait]
pub trait StoreService: Send + Sync {
    // --- Users & Auth ---
    async fn create_user(
        &self,
        profile: &UserProfile,
        hashed_password: &str,
    ) -> PortResult<()>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_profile(&self, user_id: Uuid) -> PortResult<UserProfile>;

    /// Best-effort cooldown bookkeeping; a failure here must not roll back an
    /// already-accepted submission.
    async fn set_last_community_post(
        &self,
        user_id: Uuid,
        posted_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn set_location(&self, user_id: Uuid, location: &str) -> PortResult<()>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Conversation Sessions ---
    /// Returns the stored session, or an empty one if the user never chatted.
    async fn get_chat_session(&self, user_id: Uuid) -> PortResult<ChatSession>;

    async fn save_chat_session(&self, session: &ChatSession) -> PortResult<()>;

    // --- Journal & Feedback (one live record per user) ---
    async fn upsert_journal_entry(&self, entry: &JournalEntry) -> PortResult<()>;

    async fn get_journal_entry(&self, user_id: Uuid) -> PortResult<Option<JournalEntry>>;

    async fn upsert_feedback(&self, record: &FeedbackRecord) -> PortResult<()>;

    async fn get_feedback(&self, user_id: Uuid) -> PortResult<Option<FeedbackRecord>>;

    // --- Community ---
    async fn insert_submission(&self, submission: &CommunitySubmission) -> PortResult<()>;

    async fn list_submissions(&self) -> PortResult<Vec<CommunitySubmission>>;

    async fn count_submissions(&self) -> PortResult<i64>;

    /// Per-country submission counts, highest first.
    async fn submission_counts_by_country(&self) -> PortResult<Vec<(String, i64)>>;

    async fn upsert_analysis(&self, analysis: &CommunityAnalysis) -> PortResult<()>;

    async fn get_analysis(&self) -> PortResult<Option<CommunityAnalysis>>;

    // --- Shops (read-only, for the nearby-lookup collaborator) ---
    async fn list_shops(&self) -> PortResult<Vec<Shop>>;
}

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Sends a system prompt plus an ordered message history and returns the
    /// assistant's reply. Single-shot, no streaming, no retries.
    async fn complete(&self, system_prompt: &str, turns: &[ChatTurn]) -> PortResult<String>;
}

#[async_trait]
pub trait TextToSpeechService: Send + Sync {
    /// Generates audio data from a string of text.
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>>;
}

#[async_trait]
pub trait NearbyLookupService: Send + Sync {
    /// Resolves a free-text location to a human-readable nearest-match
    /// answer, or a "nothing found" string.
    async fn find_nearby(&self, location: &str) -> PortResult<String>;
}
