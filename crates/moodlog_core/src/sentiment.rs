//! crates/moodlog_core/src/sentiment.rs
//!
//! Lexicon-based sentiment scoring for journal entries. The VADER lexicon is
//! English-only; any other language gets the fixed neutral tuple without
//! touching the analyzer.

use crate::domain::JournalEntry;
use once_cell::sync::Lazy;
use std::fmt;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Classification boundaries on the VADER compound score.
const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

// Lexicon construction is guarded so an init failure degrades to the
// neutral fallback instead of poisoning the cell.
static ANALYZER: Lazy<Option<SentimentIntensityAnalyzer>> =
    Lazy::new(|| std::panic::catch_unwind(SentimentIntensityAnalyzer::new).ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive 😊"),
            SentimentLabel::Negative => write!(f, "Negative 😔"),
            SentimentLabel::Neutral => write!(f, "Neutral 😐"),
        }
    }
}

/// Scores a journal entry. Pure and side-effect free: non-English input is
/// always `(Neutral, 0.0)`, as is any input when the lexicon is unavailable;
/// English input runs the compound polarity scorer over the mood and
/// reflection fields joined with single spaces.
pub fn score(entry: &JournalEntry, language: &str) -> (SentimentLabel, f64) {
    score_with(ANALYZER.as_ref(), entry, language)
}

fn score_with(
    analyzer: Option<&SentimentIntensityAnalyzer>,
    entry: &JournalEntry,
    language: &str,
) -> (SentimentLabel, f64) {
    if language != "en" {
        return (SentimentLabel::Neutral, 0.0);
    }
    let Some(analyzer) = analyzer else {
        return (SentimentLabel::Neutral, 0.0);
    };

    let text = format!(
        "{} {} {} {}",
        entry.mood, entry.reflection, entry.improvements, entry.gratitude
    );
    let compound = analyzer
        .polarity_scores(&text)
        .get("compound")
        .copied()
        .unwrap_or(0.0);

    let label = if compound >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    (label, compound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(mood: &str, reflection: &str) -> JournalEntry {
        JournalEntry {
            user_id: Uuid::new_v4(),
            date: Utc::now(),
            mood: mood.to_string(),
            focus: String::new(),
            reflection: reflection.to_string(),
            improvements: String::new(),
            gratitude: String::new(),
        }
    }

    #[test]
    fn non_english_is_always_the_fixed_neutral_tuple() {
        let e = entry("geweldig", "alles ging fantastisch goed vandaag");
        assert_eq!(score(&e, "nl"), (SentimentLabel::Neutral, 0.0));
        assert_eq!(score(&e, "ja"), (SentimentLabel::Neutral, 0.0));
    }

    #[test]
    fn clearly_positive_english_text_scores_positive() {
        let e = entry("happy", "today was a wonderful amazing day, I loved it");
        let (label, compound) = score(&e, "en");
        assert_eq!(label, SentimentLabel::Positive);
        assert!(compound >= 0.05);
    }

    #[test]
    fn clearly_negative_english_text_scores_negative() {
        let e = entry("sad", "everything was terrible and awful, I hated it");
        let (label, compound) = score(&e, "en");
        assert_eq!(label, SentimentLabel::Negative);
        assert!(compound <= -0.05);
    }

    #[test]
    fn missing_lexicon_degrades_to_the_neutral_tuple() {
        let e = entry("happy", "today was a wonderful amazing day, I loved it");
        assert_eq!(score_with(None, &e, "en"), (SentimentLabel::Neutral, 0.0));
    }

    #[test]
    fn empty_english_text_is_neutral() {
        let e = entry("", "");
        let (label, compound) = score(&e, "en");
        assert_eq!(label, SentimentLabel::Neutral);
        assert_eq!(compound, 0.0);
    }
}
