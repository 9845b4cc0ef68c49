//! services/api/src/services/testutil.rs
//!
//! In-memory mock implementations of the core ports, shared by the service
//! unit tests. The store keeps everything in plain mutex-guarded maps; the
//! LLM and TTS mocks replay scripted results and record what they were sent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moodlog_core::domain::{
    ChatSession, ChatTurn, CommunityAnalysis, CommunitySubmission, FeedbackRecord, JournalEntry,
    Shop, UserCredentials, UserProfile,
};
use moodlog_core::ports::{
    ChatCompletionService, NearbyLookupService, PortError, PortResult, StoreService,
    TextToSpeechService,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockStore {
    pub profiles: Mutex<HashMap<Uuid, UserProfile>>,
    pub chat_sessions: Mutex<HashMap<Uuid, ChatSession>>,
    pub journal_entries: Mutex<HashMap<Uuid, JournalEntry>>,
    pub feedback_records: Mutex<HashMap<Uuid, FeedbackRecord>>,
    pub submissions: Mutex<Vec<CommunitySubmission>>,
    pub analysis: Mutex<Option<CommunityAnalysis>>,
    pub shops: Mutex<Vec<Shop>>,
    /// When set, `set_last_community_post` fails (cooldown bookkeeping is
    /// best-effort and must not abort an accepted submission).
    pub fail_last_post_update: bool,
}

impl MockStore {
    pub fn with_profile(profile: UserProfile) -> Self {
        let store = Self::default();
        store
            .profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
        store
    }
}

#[async_trait]
impl StoreService for MockStore {
    async fn create_user(&self, profile: &UserProfile, _hashed_password: &str) -> PortResult<()> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        Err(PortError::NotFound(format!("User {} not found", email)))
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<UserProfile> {
        self.profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn set_last_community_post(
        &self,
        user_id: Uuid,
        posted_at: DateTime<Utc>,
    ) -> PortResult<()> {
        if self.fail_last_post_update {
            return Err(PortError::Unexpected("store write failed".to_string()));
        }
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&user_id) {
            profile.last_community_post_at = Some(posted_at);
        }
        Ok(())
    }

    async fn set_location(&self, user_id: Uuid, location: &str) -> PortResult<()> {
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&user_id) {
            profile.location = Some(location.to_string());
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        _session_id: &str,
        _user_id: Uuid,
        _expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        Ok(())
    }

    async fn validate_auth_session(&self, _session_id: &str) -> PortResult<Uuid> {
        Err(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, _session_id: &str) -> PortResult<()> {
        Ok(())
    }

    async fn get_chat_session(&self, user_id: Uuid) -> PortResult<ChatSession> {
        Ok(self
            .chat_sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| ChatSession::empty(user_id)))
    }

    async fn save_chat_session(&self, session: &ChatSession) -> PortResult<()> {
        self.chat_sessions
            .lock()
            .unwrap()
            .insert(session.user_id, session.clone());
        Ok(())
    }

    async fn upsert_journal_entry(&self, entry: &JournalEntry) -> PortResult<()> {
        self.journal_entries
            .lock()
            .unwrap()
            .insert(entry.user_id, entry.clone());
        Ok(())
    }

    async fn get_journal_entry(&self, user_id: Uuid) -> PortResult<Option<JournalEntry>> {
        Ok(self.journal_entries.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert_feedback(&self, record: &FeedbackRecord) -> PortResult<()> {
        self.feedback_records
            .lock()
            .unwrap()
            .insert(record.user_id, record.clone());
        Ok(())
    }

    async fn get_feedback(&self, user_id: Uuid) -> PortResult<Option<FeedbackRecord>> {
        Ok(self.feedback_records.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert_submission(&self, submission: &CommunitySubmission) -> PortResult<()> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn list_submissions(&self) -> PortResult<Vec<CommunitySubmission>> {
        Ok(self.submissions.lock().unwrap().clone())
    }

    async fn count_submissions(&self) -> PortResult<i64> {
        Ok(self.submissions.lock().unwrap().len() as i64)
    }

    async fn submission_counts_by_country(&self) -> PortResult<Vec<(String, i64)>> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for submission in self.submissions.lock().unwrap().iter() {
            *counts.entry(submission.country.clone()).or_default() += 1;
        }
        let mut rows: Vec<(String, i64)> = counts.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(rows)
    }

    async fn upsert_analysis(&self, analysis: &CommunityAnalysis) -> PortResult<()> {
        *self.analysis.lock().unwrap() = Some(analysis.clone());
        Ok(())
    }

    async fn get_analysis(&self) -> PortResult<Option<CommunityAnalysis>> {
        Ok(self.analysis.lock().unwrap().clone())
    }

    async fn list_shops(&self) -> PortResult<Vec<Shop>> {
        Ok(self.shops.lock().unwrap().clone())
    }
}

/// Scripted chat-completion mock. Pops one result per call and records every
/// (system prompt, turn history) pair it receives.
#[derive(Default)]
pub struct MockLlm {
    pub responses: Mutex<VecDeque<Result<String, String>>>,
    pub calls: Mutex<Vec<(String, Vec<ChatTurn>)>>,
}

impl MockLlm {
    pub fn replying(text: &str) -> Self {
        let mock = Self::default();
        mock.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        mock
    }

    pub fn failing(message: &str) -> Self {
        let mock = Self::default();
        mock.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        mock
    }

    pub fn push_reply(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }
}

#[async_trait]
impl ChatCompletionService for MockLlm {
    async fn complete(&self, system_prompt: &str, turns: &[ChatTurn]) -> PortResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), turns.to_vec()));
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(PortError::Unexpected(message)),
            None => Ok("ok".to_string()),
        }
    }
}

#[derive(Default)]
pub struct MockTts {
    pub fail: bool,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl TextToSpeechService for MockTts {
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail {
            Err(PortError::Unexpected("speech service unreachable".to_string()))
        } else {
            Ok(vec![1, 2, 3])
        }
    }
}

#[derive(Default)]
pub struct MockNearby {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl NearbyLookupService for MockNearby {
    async fn find_nearby(&self, location: &str) -> PortResult<String> {
        self.calls.lock().unwrap().push(location.to_string());
        Ok(format!("🏪 Test Shop 📍 {}", location))
    }
}

/// A profile with just enough filled in for the service tests.
pub fn profile(country: &str) -> UserProfile {
    UserProfile {
        user_id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: Some("test@example.com".to_string()),
        country: country.to_string(),
        preferred_language: None,
        browser_language: None,
        age: Some(30),
        hobbies: Some("reading".to_string()),
        location: None,
        last_community_post_at: None,
    }
}
