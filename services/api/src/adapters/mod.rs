pub mod chat_llm;
pub mod db;
pub mod nearby;
pub mod tts;

pub use chat_llm::OpenAiChatAdapter;
pub use db::DbAdapter;
pub use nearby::ShopDirectoryLookup;
pub use tts::OpenAiTtsAdapter;
