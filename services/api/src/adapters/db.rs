//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StoreService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Singleton records (chat session, journal entry, feedback, analysis) are
//! written with `INSERT ... ON CONFLICT ... DO UPDATE` so every save is an
//! atomic upsert keyed by the owning user id (or the fixed analysis key).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moodlog_core::domain::{
    ChatSession, ChatTurn, CommunityAnalysis, CommunitySubmission, FeedbackRecord, JournalEntry,
    Shop, UserCredentials, UserProfile,
};
use moodlog_core::ports::{PortError, PortResult, StoreService};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Fixed key for the single analysis slot.
const ANALYSIS_KEY: &str = "latest_analysis";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StoreService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    name: String,
    email: Option<String>,
    country: String,
    preferred_language: Option<String>,
    browser_language: Option<String>,
    age: Option<i32>,
    hobbies: Option<String>,
    location: Option<String>,
    last_community_post_at: Option<DateTime<Utc>>,
}
impl UserRecord {
    fn to_domain(self) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            country: self.country,
            preferred_language: self.preferred_language,
            browser_language: self.browser_language,
            age: self.age,
            hobbies: self.hobbies,
            location: self.location,
            last_community_post_at: self.last_community_post_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct ChatSessionRecord {
    user_id: Uuid,
    turns: Json<Vec<ChatTurn>>,
    turn_count: i64,
    awaiting_location: bool,
}
impl ChatSessionRecord {
    fn to_domain(self) -> ChatSession {
        ChatSession {
            user_id: self.user_id,
            turns: self.turns.0,
            turn_count: self.turn_count,
            awaiting_location: self.awaiting_location,
        }
    }
}

#[derive(FromRow)]
struct JournalEntryRecord {
    user_id: Uuid,
    date: DateTime<Utc>,
    mood: String,
    focus: String,
    reflection: String,
    improvements: String,
    gratitude: String,
}
impl JournalEntryRecord {
    fn to_domain(self) -> JournalEntry {
        JournalEntry {
            user_id: self.user_id,
            date: self.date,
            mood: self.mood,
            focus: self.focus,
            reflection: self.reflection,
            improvements: self.improvements,
            gratitude: self.gratitude,
        }
    }
}

#[derive(FromRow)]
struct FeedbackRecordRow {
    user_id: Uuid,
    date: DateTime<Utc>,
    mood: String,
    feedback: String,
}
impl FeedbackRecordRow {
    fn to_domain(self) -> FeedbackRecord {
        FeedbackRecord {
            user_id: self.user_id,
            date: self.date,
            mood: self.mood,
            feedback: self.feedback,
        }
    }
}

#[derive(FromRow)]
struct SubmissionRecord {
    id: Uuid,
    user_id: Uuid,
    author_name: String,
    country: String,
    content: String,
    posted_at: DateTime<Utc>,
}
impl SubmissionRecord {
    fn to_domain(self) -> CommunitySubmission {
        CommunitySubmission {
            id: self.id,
            user_id: self.user_id,
            author_name: self.author_name,
            country: self.country,
            text: self.content,
            posted_at: self.posted_at,
        }
    }
}

#[derive(FromRow)]
struct AnalysisRecord {
    summary: String,
    language: String,
    analyzed_at: DateTime<Utc>,
    input_count: i64,
}
impl AnalysisRecord {
    fn to_domain(self) -> CommunityAnalysis {
        CommunityAnalysis {
            summary: self.summary,
            language: self.language,
            analyzed_at: self.analyzed_at,
            input_count: self.input_count,
        }
    }
}

#[derive(FromRow)]
struct ShopRecord {
    id: Uuid,
    name: String,
    location: String,
}
impl ShopRecord {
    fn to_domain(self) -> Shop {
        Shop {
            id: self.id,
            name: self.name,
            location: self.location,
        }
    }
}

//=========================================================================================
// `StoreService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoreService for DbAdapter {
    async fn create_user(&self, profile: &UserProfile, hashed_password: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO users \
             (user_id, name, email, hashed_password, country, preferred_language, \
              browser_language, age, hobbies) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(hashed_password)
        .bind(&profile.country)
        .bind(&profile.preferred_language)
        .bind(&profile.browser_language)
        .bind(profile.age)
        .bind(&profile.hobbies)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<UserProfile> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, name, email, country, preferred_language, browser_language, \
             age, hobbies, location, last_community_post_at \
             FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn set_last_community_post(
        &self,
        user_id: Uuid,
        posted_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("UPDATE users SET last_community_post_at = $1 WHERE user_id = $2")
            .bind(posted_at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn set_location(&self, user_id: Uuid, location: &str) -> PortResult<()> {
        sqlx::query("UPDATE users SET location = $1 WHERE user_id = $2")
            .bind(location)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row = sqlx::query_as::<_, (Uuid,)>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > $2",
        )
        .bind(session_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        match row {
            Some((user_id,)) => Ok(user_id),
            None => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn get_chat_session(&self, user_id: Uuid) -> PortResult<ChatSession> {
        let record = sqlx::query_as::<_, ChatSessionRecord>(
            "SELECT user_id, turns, turn_count, awaiting_location \
             FROM chat_sessions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record
            .map(ChatSessionRecord::to_domain)
            .unwrap_or_else(|| ChatSession::empty(user_id)))
    }

    async fn save_chat_session(&self, session: &ChatSession) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO chat_sessions (user_id, turns, turn_count, awaiting_location, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
             turns = EXCLUDED.turns, turn_count = EXCLUDED.turn_count, \
             awaiting_location = EXCLUDED.awaiting_location, updated_at = EXCLUDED.updated_at",
        )
        .bind(session.user_id)
        .bind(Json(&session.turns))
        .bind(session.turn_count)
        .bind(session.awaiting_location)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn upsert_journal_entry(&self, entry: &JournalEntry) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO journal_entries \
             (user_id, date, mood, focus, reflection, improvements, gratitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id) DO UPDATE SET \
             date = EXCLUDED.date, mood = EXCLUDED.mood, focus = EXCLUDED.focus, \
             reflection = EXCLUDED.reflection, improvements = EXCLUDED.improvements, \
             gratitude = EXCLUDED.gratitude",
        )
        .bind(entry.user_id)
        .bind(entry.date)
        .bind(&entry.mood)
        .bind(&entry.focus)
        .bind(&entry.reflection)
        .bind(&entry.improvements)
        .bind(&entry.gratitude)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_journal_entry(&self, user_id: Uuid) -> PortResult<Option<JournalEntry>> {
        let record = sqlx::query_as::<_, JournalEntryRecord>(
            "SELECT user_id, date, mood, focus, reflection, improvements, gratitude \
             FROM journal_entries WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(JournalEntryRecord::to_domain))
    }

    async fn upsert_feedback(&self, record: &FeedbackRecord) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO feedback_records (user_id, date, mood, feedback) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
             date = EXCLUDED.date, mood = EXCLUDED.mood, feedback = EXCLUDED.feedback",
        )
        .bind(record.user_id)
        .bind(record.date)
        .bind(&record.mood)
        .bind(&record.feedback)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_feedback(&self, user_id: Uuid) -> PortResult<Option<FeedbackRecord>> {
        let record = sqlx::query_as::<_, FeedbackRecordRow>(
            "SELECT user_id, date, mood, feedback FROM feedback_records WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(FeedbackRecordRow::to_domain))
    }

    async fn insert_submission(&self, submission: &CommunitySubmission) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO community_submissions \
             (id, user_id, author_name, country, content, posted_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(submission.id)
        .bind(submission.user_id)
        .bind(&submission.author_name)
        .bind(&submission.country)
        .bind(&submission.text)
        .bind(submission.posted_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_submissions(&self) -> PortResult<Vec<CommunitySubmission>> {
        let records = sqlx::query_as::<_, SubmissionRecord>(
            "SELECT id, user_id, author_name, country, content, posted_at \
             FROM community_submissions ORDER BY posted_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(SubmissionRecord::to_domain).collect())
    }

    async fn count_submissions(&self) -> PortResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM community_submissions")
                .fetch_one(&self.pool)
                .await
                .map_err(unexpected)?;
        Ok(count)
    }

    async fn submission_counts_by_country(&self) -> PortResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT country, COUNT(*) FROM community_submissions \
             GROUP BY country ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(rows)
    }

    async fn upsert_analysis(&self, analysis: &CommunityAnalysis) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO community_analysis (id, summary, language, analyzed_at, input_count) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
             summary = EXCLUDED.summary, language = EXCLUDED.language, \
             analyzed_at = EXCLUDED.analyzed_at, input_count = EXCLUDED.input_count",
        )
        .bind(ANALYSIS_KEY)
        .bind(&analysis.summary)
        .bind(&analysis.language)
        .bind(analysis.analyzed_at)
        .bind(analysis.input_count)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_analysis(&self) -> PortResult<Option<CommunityAnalysis>> {
        let record = sqlx::query_as::<_, AnalysisRecord>(
            "SELECT summary, language, analyzed_at, input_count \
             FROM community_analysis WHERE id = $1",
        )
        .bind(ANALYSIS_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(AnalysisRecord::to_domain))
    }

    async fn list_shops(&self) -> PortResult<Vec<Shop>> {
        let records =
            sqlx::query_as::<_, ShopRecord>("SELECT id, name, location FROM shops ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(unexpected)?;
        Ok(records.into_iter().map(ShopRecord::to_domain).collect())
    }
}
