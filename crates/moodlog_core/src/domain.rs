//! crates/moodlog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format,
//! except for the chat turn, which is serialized as-is into the session row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a registered user with the profile fields the AI paths read.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    /// ISO country code chosen at registration, lowercase.
    pub country: String,
    /// Language the user explicitly selected, if any.
    pub preferred_language: Option<String>,
    /// Language the user's browser reported at registration (may carry a
    /// region subtag, e.g. "en-US").
    pub browser_language: Option<String>,
    pub age: Option<i32>,
    pub hobbies: Option<String>,
    /// Free-text location the user gave the chat, used for nearby lookups.
    pub location: Option<String>,
    /// When the user last had a community submission accepted.
    pub last_community_post_at: Option<DateTime<Utc>>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in a conversation. The creation timestamp doubles as the
/// turn's removal key and must be unique within the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub posted_at: DateTime<Utc>,
}

/// A user's whole conversation state, persisted as one row keyed by user id.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub user_id: Uuid,
    pub turns: Vec<ChatTurn>,
    /// Counts accepted ordinary turns. Deliberately NOT reset when the turn
    /// list is cleared, so the periodic donation cadence survives a clear.
    pub turn_count: i64,
    pub awaiting_location: bool,
}

impl ChatSession {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            turns: Vec::new(),
            turn_count: 0,
            awaiting_location: false,
        }
    }
}

/// The single live journal entry per user (latest overwrites).
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub mood: String,
    pub focus: String,
    pub reflection: String,
    pub improvements: String,
    pub gratitude: String,
}

/// The AI feedback stored alongside a journal entry, one per user.
#[derive(Debug, Clone)]
pub struct FeedbackRecord {
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub mood: String,
    pub feedback: String,
}

/// A single accepted community submission. Immutable once stored.
#[derive(Debug, Clone)]
pub struct CommunitySubmission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub country: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// The singleton community analysis result. Overwritten, never versioned.
#[derive(Debug, Clone)]
pub struct CommunityAnalysis {
    pub summary: String,
    pub language: String,
    pub analyzed_at: DateTime<Utc>,
    /// How many submissions were fed into this analysis.
    pub input_count: i64,
}

/// A shop the nearby-lookup collaborator can match against.
#[derive(Debug, Clone)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub location: String,
}
