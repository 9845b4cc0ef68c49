pub mod domain;
pub mod locale;
pub mod ports;
pub mod prompts;
pub mod sentiment;

pub use domain::{
    ChatRole, ChatSession, ChatTurn, CommunityAnalysis, CommunitySubmission, FeedbackRecord,
    JournalEntry, Shop, UserCredentials, UserProfile,
};
pub use ports::{
    ChatCompletionService, NearbyLookupService, PortError, PortResult, StoreService,
    TextToSpeechService,
};
pub use sentiment::SentimentLabel;
