pub mod chat;
pub mod community;
pub mod feedback;

#[cfg(test)]
pub(crate) mod testutil;

pub use chat::ChatService;
pub use community::CommunityService;
pub use feedback::FeedbackGenerator;
