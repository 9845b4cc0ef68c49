//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::services::{ChatService, CommunityService, FeedbackGenerator};
use moodlog_core::ports::StoreService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreService>,
    pub config: Arc<Config>,
    pub feedback: FeedbackGenerator,
    pub chat: ChatService,
    pub community: CommunityService,
}
