//! crates/moodlog_core/src/locale.rs
//!
//! Language resolution. A small pile of conflicting signals (explicit
//! preference, browser language, country) is collapsed into a single
//! effective language code; every downstream prompt-construction call
//! depends on the exact priority order here.

/// Mapping from country code (lowercase) to primary language code.
pub static COUNTRY_TO_LANG: &[(&str, &str)] = &[
    ("nl", "nl"),    // Netherlands -> Dutch
    ("be", "nl"),    // Belgium -> Dutch (also fr, de)
    ("us", "en"),    // United States -> English
    ("gb", "en"),    // United Kingdom -> English
    ("ca", "en"),    // Canada -> English (also fr)
    ("au", "en"),    // Australia -> English
    ("de", "de"),    // Germany -> German
    ("fr", "fr"),    // France -> French
    ("es", "es"),    // Spain -> Spanish
    ("mx", "es"),    // Mexico -> Spanish
    ("cn", "zh"),    // China -> Chinese (Mandarin)
    ("in", "hi"),    // India -> Hindi
    ("id", "id"),    // Indonesia -> Indonesian
    ("pk", "ur"),    // Pakistan -> Urdu (also en)
    ("br", "pt"),    // Brazil -> Portuguese
    ("pt", "pt"),    // Portugal -> Portuguese
    ("ng", "en"),    // Nigeria -> English (official)
    ("bd", "bn"),    // Bangladesh -> Bengali
    ("ru", "ru"),    // Russia -> Russian
    ("jp", "ja"),    // Japan -> Japanese
    ("ph", "tl"),    // Philippines -> Tagalog (also en)
    ("vn", "vi"),    // Vietnam -> Vietnamese
    ("et", "am"),    // Ethiopia -> Amharic
    ("eg", "ar"),    // Egypt -> Arabic
    ("ir", "fa"),    // Iran -> Persian (Farsi)
    ("tr", "tr"),    // Turkey -> Turkish
    ("cd", "fr"),    // DR Congo -> French (official)
    ("ar", "es"),    // Argentina -> Spanish
    ("kr", "ko"),    // South Korea -> Korean
    ("za", "en"),    // South Africa -> English (one of many official)
    ("th", "th"),    // Thailand -> Thai
    ("other", "en"), // Default for 'other' selection
];

/// The global default language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Get the primary language for a given country code, defaulting to "en".
pub fn country_language(country_code: &str) -> &'static str {
    let code = country_code.trim().to_lowercase();
    COUNTRY_TO_LANG
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, lang)| *lang)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Resolves the effective language code. First non-empty signal wins:
/// explicit preference, browser language (primary subtag only), the country
/// table, then the global default. Total over its inputs.
pub fn resolve(
    preferred: Option<&str>,
    browser: Option<&str>,
    country: Option<&str>,
) -> String {
    if let Some(lang) = non_empty(preferred) {
        return lang.to_lowercase();
    }
    if let Some(lang) = non_empty(browser) {
        return primary_subtag(lang);
    }
    if let Some(code) = non_empty(country) {
        return country_language(code).to_string();
    }
    DEFAULT_LANGUAGE.to_string()
}

/// The language key used when building feedback prompts. Precedence differs
/// from [`resolve`]: browser language, country-derived language, then the raw
/// country code itself (the prompt tables carry country-coded entries such as
/// "us" and "br" for exactly this case), then the default.
pub fn feedback_language(
    browser: Option<&str>,
    country_lang: Option<&str>,
    country: Option<&str>,
) -> String {
    non_empty(browser)
        .or_else(|| non_empty(country_lang))
        .or_else(|| non_empty(country))
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_lowercase()
}

/// Reduces a language tag to its primary subtag: "en-US" -> "en".
pub fn primary_subtag(tag: &str) -> String {
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    primary.to_lowercase()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
