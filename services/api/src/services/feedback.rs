//! services/api/src/services/feedback.rs
//!
//! Generates the AI coaching feedback for a journal entry: picks the target
//! language, selects the matching persona and write-in-language instruction,
//! builds one prompt from the entry and the user's profile, and makes a
//! single completion call. A failed call degrades to a human-readable
//! placeholder so the journal write path is never interrupted.

use chrono::Utc;
use moodlog_core::domain::{ChatRole, ChatTurn, JournalEntry, UserProfile};
use moodlog_core::ports::ChatCompletionService;
use moodlog_core::sentiment::SentimentLabel;
use moodlog_core::{locale, prompts};
use std::sync::Arc;
use tracing::{debug, error};

/// The language key for everything AI-facing on the journal path: browser
/// language first, then the country-derived language, then the raw country
/// code (the prompt tables carry country-coded entries), then English.
pub fn profile_language(profile: &UserProfile) -> String {
    locale::feedback_language(
        profile.browser_language.as_deref(),
        Some(locale::country_language(&profile.country)),
        Some(&profile.country),
    )
}

#[derive(Clone)]
pub struct FeedbackGenerator {
    llm: Arc<dyn ChatCompletionService>,
}

impl FeedbackGenerator {
    pub fn new(llm: Arc<dyn ChatCompletionService>) -> Self {
        Self { llm }
    }

    /// Returns the generated feedback text, or a degraded message embedding
    /// the error detail. Exactly one completion call, no retries.
    pub async fn generate(
        &self,
        entry: &JournalEntry,
        sentiment: SentimentLabel,
        score: f64,
        profile: &UserProfile,
    ) -> String {
        let lang = profile_language(profile);
        let instruction = prompts::lookup(prompts::WRITE_IN_LANGUAGE, &lang);
        let persona = prompts::lookup(prompts::SYSTEM_PERSONAS, &lang);
        debug!(language = %lang, "Generating journal feedback");

        let prompt = build_prompt(entry, sentiment, score, profile, instruction);
        let turns = [ChatTurn {
            role: ChatRole::User,
            content: prompt,
            posted_at: Utc::now(),
        }];

        match self.llm.complete(persona, &turns).await {
            Ok(feedback) => feedback,
            Err(e) => {
                error!("Feedback generation failed for user {}: {e}", profile.user_id);
                format!("⚠️ AI feedback could not be retrieved: {e}")
            }
        }
    }
}

fn build_prompt(
    entry: &JournalEntry,
    sentiment: SentimentLabel,
    score: f64,
    profile: &UserProfile,
    instruction: &str,
) -> String {
    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Not provided".to_string());
    let hobbies = profile.hobbies.as_deref().unwrap_or("Not provided");

    format!(
        "{instruction}\n\n\
         - 📅 Date: {date}\n\
         - Mood: {mood}\n\
         - Focus of the day: {focus}\n\
         - What went well: {reflection}\n\
         - What could be better: {improvements}\n\
         - What I am grateful for: {gratitude}\n\n\
         📌 AI Recommendations:\n\
         My name is {name}.\n\
         - Age: {age}\n\
         - Hobbies: {hobbies}\n\n\
         Based on my mood ({mood}):\n\
         - Tips to improve my day\n\
         - A motivational quote\n\
         - Suggestions for self-development or activities based on my hobbies\n\n\
         🔍 Extra info: sentiment analysis score: {sentiment} ({score})",
        instruction = instruction,
        date = entry.date.format("%Y-%m-%d %H:%M:%S"),
        mood = entry.mood,
        focus = entry.focus,
        reflection = entry.reflection,
        improvements = entry.improvements,
        gratitude = entry.gratitude,
        name = profile.name,
        age = age,
        hobbies = hobbies,
        sentiment = sentiment,
        score = score,
    )
}
