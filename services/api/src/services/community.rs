//! services/api/src/services/community.rs
//!
//! Community submissions and the aggregation that hangs off them. A
//! submission passes validation and the hourly cooldown, is stored, and —
//! whenever the total submission count lands on an even number — the whole
//! historical corpus is summarized in one completion call and written over
//! the single stored analysis. A fresh analysis is also voiced to an mp3
//! under the podcast directory; that last step only ever reports a boolean.

use chrono::{Duration, Utc};
use moodlog_core::domain::{ChatRole, ChatTurn, CommunityAnalysis, CommunitySubmission, UserProfile};
use moodlog_core::ports::{ChatCompletionService, PortError, StoreService, TextToSpeechService};
use moodlog_core::{locale, prompts};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Upper bound on a single community submission, in characters.
pub const MAX_SUBMISSION_CHARS: usize = 250;

/// Minimum gap between two submissions from the same user.
const COOLDOWN_SECS: i64 = 3600;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum CommunityError {
    #[error("⚠️ Please write something before sharing!")]
    EmptyText,
    #[error("⚠️ Your post is too long (max {MAX_SUBMISSION_CHARS} characters).")]
    TextTooLong,
    #[error("⏳ You can post again in {minutes_left} minutes.")]
    Cooldown { minutes_left: i64 },
    #[error(transparent)]
    Port(#[from] PortError),
}

/// What an accepted submission reports back.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub submission: CommunitySubmission,
    /// True when this submission crossed the even-count threshold and the
    /// stored analysis was overwritten.
    pub analysis_refreshed: bool,
    /// True when a fresh analysis was also rendered to audio.
    pub podcast_written: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct CommunityStatistics {
    pub total_submissions: i64,
    pub popular_words: Vec<(String, i64)>,
    pub top_contributors: Vec<(String, i64)>,
}

#[derive(Clone)]
pub struct CommunityService {
    store: Arc<dyn StoreService>,
    llm: Arc<dyn ChatCompletionService>,
    tts: Arc<dyn TextToSpeechService>,
    podcast_dir: PathBuf,
}

impl CommunityService {
    pub fn new(
        store: Arc<dyn StoreService>,
        llm: Arc<dyn ChatCompletionService>,
        tts: Arc<dyn TextToSpeechService>,
        podcast_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            llm,
            tts,
            podcast_dir,
        }
    }

    /// Validates, throttles and stores one submission, then runs the
    /// even-count aggregation inline when it applies.
    pub async fn submit(
        &self,
        profile: &UserProfile,
        text: &str,
    ) -> Result<SubmissionOutcome, CommunityError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommunityError::EmptyText);
        }
        if text.chars().count() > MAX_SUBMISSION_CHARS {
            return Err(CommunityError::TextTooLong);
        }

        let now = Utc::now();
        if let Some(last) = profile.last_community_post_at {
            let elapsed = now - last;
            if elapsed < Duration::seconds(COOLDOWN_SECS) {
                let remaining = Duration::seconds(COOLDOWN_SECS) - elapsed;
                // Round up so "59m30s left" reads as 60 minutes, never 0.
                let minutes_left = remaining.num_seconds() / 60 + 1;
                return Err(CommunityError::Cooldown { minutes_left });
            }
        }

        let submission = CommunitySubmission {
            id: Uuid::new_v4(),
            user_id: profile.user_id,
            author_name: profile.name.clone(),
            country: profile.country.clone(),
            text: text.to_string(),
            posted_at: now,
        };
        self.store.insert_submission(&submission).await?;

        // Cooldown bookkeeping is best-effort; the submission stands either way.
        if let Err(e) = self.store.set_last_community_post(profile.user_id, now).await {
            warn!(
                "Failed to update cooldown marker for user {}: {e}",
                profile.user_id
            );
        }

        let count = self.store.count_submissions().await?;
        let mut analysis_refreshed = false;
        let mut podcast_written = false;
        if count > 0 && count % 2 == 0 {
            let lang = locale::country_language(&profile.country);
            match self.analyze(lang).await {
                Ok(Some(analysis)) => {
                    analysis_refreshed = true;
                    podcast_written = self.render_podcast(&analysis.summary).await;
                }
                Ok(None) => {}
                Err(e) => {
                    // The previous analysis stays in place.
                    error!("Community analysis failed at count {count}: {e}");
                }
            }
        }

        Ok(SubmissionOutcome {
            submission,
            analysis_refreshed,
            podcast_written,
        })
    }

    /// Summarizes the entire submission corpus in the given language and
    /// overwrites the stored analysis. Returns `None` when there is nothing
    /// to summarize.
    pub async fn analyze(&self, lang: &str) -> Result<Option<CommunityAnalysis>, CommunityError> {
        let submissions = self.store.list_submissions().await?;
        if submissions.is_empty() {
            return Ok(None);
        }

        let corpus = submissions
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let system = prompts::lookup(prompts::ANALYSIS_SYSTEM_MESSAGES, lang);
        let instruction = prompts::lookup(prompts::ANALYSIS_INSTRUCTIONS, lang);
        let prompt = format!(
            "{instruction}\n\n{corpus}\n\nRespond in {}.",
            prompts::language_name(lang)
        );

        let turns = [ChatTurn {
            role: ChatRole::User,
            content: prompt,
            posted_at: Utc::now(),
        }];
        let summary = self.llm.complete(system, &turns).await?;

        let analysis = CommunityAnalysis {
            summary,
            language: lang.to_string(),
            analyzed_at: Utc::now(),
            input_count: submissions.len() as i64,
        };
        self.store.upsert_analysis(&analysis).await?;
        info!(
            inputs = analysis.input_count,
            language = %analysis.language,
            "Community analysis refreshed"
        );
        Ok(Some(analysis))
    }

    /// Voices a summary to `podcast_<timestamp>.mp3` under the podcast
    /// directory. Never fails the caller; every problem is logged and folded
    /// into the boolean.
    pub async fn render_podcast(&self, summary: &str) -> bool {
        let audio = match self.tts.generate_audio(summary).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Podcast audio generation failed: {e}");
                return false;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.podcast_dir).await {
            error!("Could not create podcast directory: {e}");
            return false;
        }
        let filename = format!("podcast_{}.mp3", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = self.podcast_dir.join(&filename);
        match tokio::fs::write(&path, &audio).await {
            Ok(()) => {
                info!("Podcast written to {}", path.display());
                true
            }
            Err(e) => {
                error!("Could not write podcast file {}: {e}", path.display());
                false
            }
        }
    }

    /// Word and contributor frequency over the whole feed: the five most
    /// common words longer than three characters, and the five most frequent
    /// author names.
    pub async fn statistics(&self) -> Result<CommunityStatistics, CommunityError> {
        let submissions = self.store.list_submissions().await?;

        let mut word_counts: HashMap<String, i64> = HashMap::new();
        let mut contributor_counts: HashMap<String, i64> = HashMap::new();
        for submission in &submissions {
            for word in WORD_RE.find_iter(&submission.text) {
                let word = word.as_str().to_lowercase();
                if word.chars().count() > 3 {
                    *word_counts.entry(word).or_default() += 1;
                }
            }
            *contributor_counts
                .entry(submission.author_name.clone())
                .or_default() += 1;
        }

        Ok(CommunityStatistics {
            total_submissions: submissions.len() as i64,
            popular_words: top_five(word_counts),
            top_contributors: top_five(contributor_counts),
        })
    }
}

fn top_five(counts: HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut rows: Vec<(String, i64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(5);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testutil::{profile, MockLlm, MockStore, MockTts};

    fn service(
        store: Arc<MockStore>,
        llm: Arc<MockLlm>,
        tts: Arc<MockTts>,
    ) -> CommunityService {
        let dir = std::env::temp_dir().join(format!("moodlog-podcasts-{}", Uuid::new_v4()));
        CommunityService::new(store, llm, tts, dir)
    }

    #[tokio::test]
    async fn first_submission_is_accepted_without_aggregation() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let llm = Arc::new(MockLlm::default());
        let community = service(store.clone(), llm.clone(), Arc::new(MockTts::default()));

        let outcome = community.submit(&user, "I feel great today").await.unwrap();
        assert!(!outcome.analysis_refreshed);
        assert!(!outcome.podcast_written);
        assert_eq!(store.submissions.lock().unwrap().len(), 1);
        assert!(llm.calls.lock().unwrap().is_empty());

        let stored = store.get_profile(user.user_id).await.unwrap();
        assert!(stored.last_community_post_at.is_some());
    }

    #[tokio::test]
    async fn second_submission_triggers_full_corpus_analysis_and_podcast() {
        let first = profile("us");
        let second = profile("nl");
        let store = Arc::new(MockStore::with_profile(first.clone()));
        store
            .profiles
            .lock()
            .unwrap()
            .insert(second.user_id, second.clone());
        let llm = Arc::new(MockLlm::replying("Everyone sounds upbeat."));
        let tts = Arc::new(MockTts::default());
        let community = service(store.clone(), llm.clone(), tts.clone());

        community.submit(&first, "sunshine and coffee").await.unwrap();
        let outcome = community.submit(&second, "rainy but cozy").await.unwrap();

        assert!(outcome.analysis_refreshed);
        assert!(outcome.podcast_written);

        let calls = llm.calls.lock().unwrap();
        let prompt = &calls[0].1[0].content;
        assert!(prompt.contains("sunshine and coffee rainy but cozy"));
        assert!(prompt.contains("Respond in Dutch."));

        let analysis = store.analysis.lock().unwrap().clone().unwrap();
        assert_eq!(analysis.summary, "Everyone sounds upbeat.");
        assert_eq!(analysis.language, "nl");
        assert_eq!(analysis.input_count, 2);
        assert_eq!(
            tts.calls.lock().unwrap()[0],
            "Everyone sounds upbeat."
        );
    }

    #[tokio::test]
    async fn odd_count_does_not_trigger_analysis() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        store
            .submissions
            .lock()
            .unwrap()
            .extend((0..2).map(|i| CommunitySubmission {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                author_name: format!("Author {i}"),
                country: "us".to_string(),
                text: "seed".to_string(),
                posted_at: Utc::now(),
            }));
        let llm = Arc::new(MockLlm::default());
        let community = service(store, llm.clone(), Arc::new(MockTts::default()));

        let outcome = community.submit(&user, "third voice").await.unwrap();
        assert!(!outcome.analysis_refreshed);
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cooldown_rejects_with_rounded_up_minutes() {
        let mut user = profile("us");
        user.last_community_post_at = Some(Utc::now() - Duration::minutes(10));
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let community = service(
            store.clone(),
            Arc::new(MockLlm::default()),
            Arc::new(MockTts::default()),
        );

        match community.submit(&user, "again already").await {
            Err(CommunityError::Cooldown { minutes_left }) => {
                assert!((50..=51).contains(&minutes_left), "got {minutes_left}");
            }
            other => panic!("expected cooldown, got {other:?}"),
        }
        assert!(store.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_cooldown_allows_posting_again() {
        let mut user = profile("us");
        user.last_community_post_at = Some(Utc::now() - Duration::minutes(61));
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let community = service(
            store.clone(),
            Arc::new(MockLlm::default()),
            Arc::new(MockTts::default()),
        );

        assert!(community.submit(&user, "an hour has passed").await.is_ok());
        assert_eq!(store.submissions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_and_oversized_submissions_are_rejected() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let community = service(
            store.clone(),
            Arc::new(MockLlm::default()),
            Arc::new(MockTts::default()),
        );

        assert!(matches!(
            community.submit(&user, "  ").await,
            Err(CommunityError::EmptyText)
        ));
        let too_long = "x".repeat(251);
        assert!(matches!(
            community.submit(&user, &too_long).await,
            Err(CommunityError::TextTooLong)
        ));
        assert!(store.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_cooldown_bookkeeping_does_not_reject_the_submission() {
        let user = profile("us");
        let mut store = MockStore::with_profile(user.clone());
        store.fail_last_post_update = true;
        let store = Arc::new(store);
        let community = service(
            store.clone(),
            Arc::new(MockLlm::default()),
            Arc::new(MockTts::default()),
        );

        assert!(community.submit(&user, "still counts").await.is_ok());
        assert_eq!(store.submissions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_completion_preserves_the_previous_analysis() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        let previous = CommunityAnalysis {
            summary: "old summary".to_string(),
            language: "en".to_string(),
            analyzed_at: Utc::now() - Duration::hours(5),
            input_count: 4,
        };
        *store.analysis.lock().unwrap() = Some(previous.clone());
        store.submissions.lock().unwrap().push(CommunitySubmission {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            author_name: "Seed".to_string(),
            country: "us".to_string(),
            text: "seed".to_string(),
            posted_at: Utc::now(),
        });
        let llm = Arc::new(MockLlm::failing("model overloaded"));
        let tts = Arc::new(MockTts::default());
        let community = service(store.clone(), llm, tts.clone());

        // Second submission lands on an even count, so the analysis runs and fails.
        let outcome = community.submit(&user, "new voice").await.unwrap();
        assert!(!outcome.analysis_refreshed);
        assert!(!outcome.podcast_written);
        assert!(tts.calls.lock().unwrap().is_empty());

        let stored = store.analysis.lock().unwrap().clone().unwrap();
        assert_eq!(stored.summary, previous.summary);
        assert_eq!(stored.input_count, previous.input_count);
    }

    #[tokio::test]
    async fn failed_audio_rendering_keeps_the_fresh_analysis() {
        let user = profile("us");
        let store = Arc::new(MockStore::with_profile(user.clone()));
        store.submissions.lock().unwrap().push(CommunitySubmission {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            author_name: "Seed".to_string(),
            country: "us".to_string(),
            text: "seed".to_string(),
            posted_at: Utc::now(),
        });
        let llm = Arc::new(MockLlm::replying("fresh summary"));
        let tts = Arc::new(MockTts {
            fail: true,
            ..Default::default()
        });
        let community = service(store.clone(), llm, tts);

        let outcome = community.submit(&user, "new voice").await.unwrap();
        assert!(outcome.analysis_refreshed);
        assert!(!outcome.podcast_written);
        assert_eq!(
            store.analysis.lock().unwrap().clone().unwrap().summary,
            "fresh summary"
        );
    }

    #[tokio::test]
    async fn analyze_on_empty_corpus_is_a_no_op() {
        let store = Arc::new(MockStore::default());
        let llm = Arc::new(MockLlm::default());
        let community = service(store.clone(), llm.clone(), Arc::new(MockTts::default()));

        assert!(community.analyze("en").await.unwrap().is_none());
        assert!(llm.calls.lock().unwrap().is_empty());
        assert!(store.analysis.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn statistics_count_long_words_and_contributors() {
        let store = Arc::new(MockStore::default());
        let posts = [
            ("Alice", "coffee coffee tea sun"),
            ("Alice", "coffee makes mornings bright"),
            ("Bob", "tea and rain"),
        ];
        for (author, text) in posts {
            store.submissions.lock().unwrap().push(CommunitySubmission {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                author_name: author.to_string(),
                country: "us".to_string(),
                text: text.to_string(),
                posted_at: Utc::now(),
            });
        }
        let community = service(
            store,
            Arc::new(MockLlm::default()),
            Arc::new(MockTts::default()),
        );

        let stats = community.statistics().await.unwrap();
        assert_eq!(stats.total_submissions, 3);
        // "tea", "sun", "and" are too short to count.
        assert_eq!(stats.popular_words[0], ("coffee".to_string(), 3));
        assert!(stats.popular_words.iter().all(|(w, _)| w.len() > 3));
        assert_eq!(stats.top_contributors[0], ("Alice".to_string(), 2));
        assert_eq!(stats.top_contributors[1], ("Bob".to_string(), 1));
    }
}
