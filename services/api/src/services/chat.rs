//! services/api/src/services/chat.rs
//!
//! The conversation state machine. A user's session is an append-only turn
//! log plus a counter and one pending sub-state ("awaiting location"). Every
//! accepted ordinary turn goes through the completion service with the full
//! running history; every 4th one also returns an advisory donation nudge.
//! The session row is upserted after each accepted mutation.

use chrono::{DateTime, Utc};
use moodlog_core::domain::{ChatRole, ChatTurn, UserProfile};
use moodlog_core::ports::{
    ChatCompletionService, NearbyLookupService, PortError, StoreService,
};
use moodlog_core::{locale, prompts};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Upper bound on a single chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 250;

/// Every Nth accepted ordinary turn returns the donation nudge.
const DONATION_CADENCE: i64 = 4;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("⚠️ Please enter a valid question!")]
    EmptyMessage,
    #[error("⚠️ Your message is too long (max {MAX_MESSAGE_CHARS} characters).")]
    MessageTooLong,
    #[error("Message not found")]
    TurnNotFound,
    #[error("Invalid message id: {0}")]
    InvalidTurnKey(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// What a handled turn gives back to the caller.
#[derive(Debug)]
pub struct ChatReply {
    pub answer: String,
    /// Advisory donation nudge; returned alongside the answer, never stored
    /// as a conversation turn.
    pub extra: Option<String>,
    pub user_turn: Option<ChatTurn>,
    pub assistant_turn: Option<ChatTurn>,
    pub turns: Vec<ChatTurn>,
}

#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn StoreService>,
    llm: Arc<dyn ChatCompletionService>,
    nearby: Arc<dyn NearbyLookupService>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn StoreService>,
        llm: Arc<dyn ChatCompletionService>,
        nearby: Arc<dyn NearbyLookupService>,
    ) -> Self {
        Self { store, llm, nearby }
    }

    /// Handles one inbound message for the given user.
    pub async fn handle_turn(
        &self,
        profile: &UserProfile,
        text: &str,
    ) -> Result<ChatReply, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::MessageTooLong);
        }

        let mut session = self.store.get_chat_session(profile.user_id).await?;

        // A pending location question consumes the whole turn, whatever it
        // says; this is what prevents a second location prompt.
        if session.awaiting_location {
            if let Err(e) = self.store.set_location(profile.user_id, text).await {
                error!("Failed to store location for user {}: {e}", profile.user_id);
            }
            session.awaiting_location = false;
            self.store.save_chat_session(&session).await?;
            let answer = self.lookup_nearby(text).await;
            return Ok(ChatReply {
                answer,
                extra: None,
                user_turn: None,
                assistant_turn: None,
                turns: session.turns,
            });
        }

        if has_nearby_intent(text) {
            match profile.location.as_deref().filter(|l| !l.trim().is_empty()) {
                Some(location) => {
                    let answer = self.lookup_nearby(location).await;
                    return Ok(ChatReply {
                        answer,
                        extra: None,
                        user_turn: None,
                        assistant_turn: None,
                        turns: session.turns,
                    });
                }
                None => {
                    session.awaiting_location = true;
                    self.store.save_chat_session(&session).await?;
                    return Ok(ChatReply {
                        answer: "📍 What is your location? I'll look for a shop nearby."
                            .to_string(),
                        extra: None,
                        user_turn: None,
                        assistant_turn: None,
                        turns: session.turns,
                    });
                }
            }
        }

        // Ordinary turn: append, count, complete, append the reply.
        let user_turn = ChatTurn {
            role: ChatRole::User,
            content: text.to_string(),
            posted_at: Utc::now(),
        };
        session.turns.push(user_turn.clone());
        session.turn_count += 1;

        let lang = locale::country_language(&profile.country);
        let system_prompt = self.build_system_prompt(profile.user_id, lang).await;
        debug!(language = %lang, "Chat turn accepted, calling completion service");

        let (answer, assistant_turn) = match self.llm.complete(&system_prompt, &session.turns).await
        {
            Ok(reply) => {
                let turn = ChatTurn {
                    role: ChatRole::Assistant,
                    content: reply.clone(),
                    posted_at: Utc::now(),
                };
                session.turns.push(turn.clone());
                (reply, Some(turn))
            }
            Err(e) => {
                // Degrade: the accepted user turn and counter still persist.
                error!("Chat completion failed for user {}: {e}", profile.user_id);
                (format!("⚠️ AI error: {e}"), None)
            }
        };

        let extra = if assistant_turn.is_some() && session.turn_count % DONATION_CADENCE == 0 {
            Some(prompts::lookup(prompts::DONATION_MESSAGES, lang).to_string())
        } else {
            None
        };

        self.store.save_chat_session(&session).await?;
        Ok(ChatReply {
            answer,
            extra,
            user_turn: Some(user_turn),
            assistant_turn,
            turns: session.turns,
        })
    }

    /// Removes the first (and only) turn whose timestamp matches `key`.
    pub async fn delete_turn(&self, user_id: Uuid, key: &str) -> Result<(), ChatError> {
        let posted_at: DateTime<Utc> = DateTime::parse_from_rfc3339(key)
            .map_err(|_| ChatError::InvalidTurnKey(key.to_string()))?
            .with_timezone(&Utc);

        let mut session = self.store.get_chat_session(user_id).await?;
        let position = session
            .turns
            .iter()
            .position(|turn| turn.posted_at == posted_at)
            .ok_or(ChatError::TurnNotFound)?;
        session.turns.remove(position);
        self.store.save_chat_session(&session).await?;
        Ok(())
    }

    /// Empties the turn list. The turn counter is intentionally left alone so
    /// the donation cadence is independent of clears.
    pub async fn clear_history(&self, user_id: Uuid) -> Result<(), ChatError> {
        let mut session = self.store.get_chat_session(user_id).await?;
        session.turns.clear();
        self.store.save_chat_session(&session).await?;
        Ok(())
    }

    /// Returns the stored turns and the number of completed exchanges.
    pub async fn history(&self, user_id: Uuid) -> Result<(Vec<ChatTurn>, usize), ChatError> {
        let session = self.store.get_chat_session(user_id).await?;
        let exchanges = session.turns.len() / 2;
        Ok((session.turns, exchanges))
    }

    async fn build_system_prompt(&self, user_id: Uuid, lang: &str) -> String {
        let mut prompt = format!(
            "You are a helpful coach and motivator. Respond ONLY in {}.",
            prompts::language_name(lang)
        );
        // Last-known mood gives the coach something to anchor on.
        match self.store.get_journal_entry(user_id).await {
            Ok(Some(entry)) => {
                prompt.push_str(&format!(
                    " The user's most recent journal mood was \"{}\".",
                    entry.mood
                ));
            }
            Ok(None) => {}
            Err(e) => error!("Failed to load journal entry for chat context: {e}"),
        }
        prompt
    }

    async fn lookup_nearby(&self, location: &str) -> String {
        match self.nearby.find_nearby(location).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Nearby lookup failed: {e}");
                "⚠️ Could not look up shops near that location.".to_string()
            }
        }
    }
}

/// The "shop/nearby" intent phrase pair.
fn has_nearby_intent(text: &str) -> bool {
    let lower = text.to_lowercase();
    (lower.contains("shop") || lower.contains("store")) && lower.contains("nearby")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testutil::{profile, MockLlm, MockNearby, MockStore};

    fn service(store: Arc<MockStore>, llm: Arc<MockLlm>) -> (ChatService, Arc<MockNearby>) {
        let nearby = Arc::new(MockNearby::default());
        (
            ChatService::new(store, llm, nearby.clone()),
            nearby,
        )
    }

    #[tokio::test]
    async fn ordinary_turn_appends_both_turns_and_counts_once() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::replying("Hello there!"));
        let (chat, _) = service(store.clone(), llm.clone());

        let reply = chat.handle_turn(&user, "how do I cheer up?").await.unwrap();
        assert_eq!(reply.answer, "Hello there!");
        assert!(reply.extra.is_none());

        let session = store.get_chat_session(user.user_id).await.unwrap();
        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turn_count, 1);
        assert_eq!(session.turns[0].role, ChatRole::User);
        assert_eq!(session.turns[1].role, ChatRole::Assistant);

        let calls = llm.calls.lock().unwrap();
        assert!(calls[0].0.contains("Respond ONLY in English."));
    }

    #[tokio::test]
    async fn system_prompt_carries_language_and_last_mood() {
        let user = profile("nl");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        store
            .upsert_journal_entry(&moodlog_core::domain::JournalEntry {
                user_id: user.user_id,
                date: Utc::now(),
                mood: "happy".to_string(),
                focus: String::new(),
                reflection: String::new(),
                improvements: String::new(),
                gratitude: String::new(),
            })
            .await
            .unwrap();
        let llm = Arc::new(MockLlm::replying("Hallo!"));
        let (chat, _) = service(store, llm.clone());

        chat.handle_turn(&user, "hoi").await.unwrap();

        let calls = llm.calls.lock().unwrap();
        assert!(calls[0].0.contains("Respond ONLY in Dutch."));
        assert!(calls[0].0.contains("most recent journal mood was \"happy\""));
    }

    #[tokio::test]
    async fn donation_message_appears_exactly_on_every_fourth_turn() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::default());
        for _ in 0..8 {
            llm.push_reply("sure");
        }
        let (chat, _) = service(store, llm);

        for i in 1..=8 {
            let reply = chat.handle_turn(&user, "tell me more").await.unwrap();
            if i % 4 == 0 {
                assert!(reply.extra.is_some(), "turn {i} should carry the nudge");
                assert_eq!(
                    reply.extra.unwrap(),
                    "💡 I could use a drink! Want to donate 1 Pi? 😉"
                );
            } else {
                assert!(reply.extra.is_none(), "turn {i} should not carry the nudge");
            }
        }
    }

    #[tokio::test]
    async fn boundary_length_250_accepted_251_rejected() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::replying("ok"));
        let (chat, _) = service(store, llm);

        let exactly = "a".repeat(250);
        assert!(chat.handle_turn(&user, &exactly).await.is_ok());

        let too_long = "a".repeat(251);
        match chat.handle_turn(&user, &too_long).await {
            Err(ChatError::MessageTooLong) => {}
            other => panic!("expected MessageTooLong, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let (chat, _) = service(store, Arc::new(MockLlm::default()));
        assert!(matches!(
            chat.handle_turn(&user, "   ").await,
            Err(ChatError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn nearby_intent_without_location_asks_once_then_consumes_answer() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let (chat, nearby) = service(store.clone(), Arc::new(MockLlm::default()));

        let reply = chat.handle_turn(&user, "is there a shop nearby?").await.unwrap();
        assert!(reply.answer.starts_with("📍"));
        assert!(store
            .get_chat_session(user.user_id)
            .await
            .unwrap()
            .awaiting_location);

        // The next turn is the location answer, even if it repeats the intent.
        let reply = chat.handle_turn(&user, "shop nearby Amsterdam").await.unwrap();
        assert!(reply.answer.starts_with("🏪"));
        let session = store.get_chat_session(user.user_id).await.unwrap();
        assert!(!session.awaiting_location);
        // Lookup turns are not stored and not counted.
        assert!(session.turns.is_empty());
        assert_eq!(session.turn_count, 0);
        assert_eq!(nearby.calls.lock().unwrap().len(), 1);

        let stored = store.get_profile(user.user_id).await.unwrap();
        assert_eq!(stored.location.as_deref(), Some("shop nearby Amsterdam"));
    }

    #[tokio::test]
    async fn nearby_intent_with_known_location_answers_directly() {
        let mut user = profile("us");
        user.location = Some("Rotterdam".to_string());
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let (chat, nearby) = service(store.clone(), Arc::new(MockLlm::default()));

        let reply = chat.handle_turn(&user, "any store nearby?").await.unwrap();
        assert!(reply.answer.contains("Rotterdam"));
        assert!(!store
            .get_chat_session(user.user_id)
            .await
            .unwrap()
            .awaiting_location);
        assert_eq!(nearby.calls.lock().unwrap()[0], "Rotterdam");
    }

    #[tokio::test]
    async fn failed_completion_degrades_but_keeps_user_turn_and_counter() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::failing("boom"));
        let (chat, _) = service(store.clone(), llm);

        let reply = chat.handle_turn(&user, "hello?").await.unwrap();
        assert!(reply.answer.starts_with("⚠️ AI error:"));
        assert!(reply.assistant_turn.is_none());

        let session = store.get_chat_session(user.user_id).await.unwrap();
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turn_count, 1);
    }

    #[tokio::test]
    async fn deleting_by_timestamp_removes_only_that_turn() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::replying("hi"));
        let (chat, _) = service(store.clone(), llm);

        let reply = chat.handle_turn(&user, "hello").await.unwrap();
        let key = reply.user_turn.unwrap().posted_at.to_rfc3339();

        chat.delete_turn(user.user_id, &key).await.unwrap();
        let session = store.get_chat_session(user.user_id).await.unwrap();
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn deleting_unknown_timestamp_is_not_found_and_leaves_session_untouched() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::replying("hi"));
        let (chat, _) = service(store.clone(), llm);

        chat.handle_turn(&user, "hello").await.unwrap();
        let before = store.get_chat_session(user.user_id).await.unwrap();

        let missing = "2001-01-01T00:00:00+00:00";
        assert!(matches!(
            chat.delete_turn(user.user_id, missing).await,
            Err(ChatError::TurnNotFound)
        ));
        let after = store.get_chat_session(user.user_id).await.unwrap();
        assert_eq!(after.turns.len(), before.turns.len());
    }

    #[tokio::test]
    async fn clearing_history_keeps_the_turn_counter() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::default());
        llm.push_reply("one");
        llm.push_reply("two");
        let (chat, _) = service(store.clone(), llm);

        chat.handle_turn(&user, "first").await.unwrap();
        chat.handle_turn(&user, "second").await.unwrap();
        chat.clear_history(user.user_id).await.unwrap();

        let session = store.get_chat_session(user.user_id).await.unwrap();
        assert!(session.turns.is_empty());
        assert_eq!(session.turn_count, 2);
    }

    #[tokio::test]
    async fn history_reports_exchange_count() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::replying("hi"));
        let (chat, _) = service(store, llm);

        chat.handle_turn(&user, "hello").await.unwrap();
        let (turns, exchanges) = chat.history(user.user_id).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(exchanges, 1);
    }
}
