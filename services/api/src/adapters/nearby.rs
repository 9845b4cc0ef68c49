//! services/api/src/adapters/nearby.rs
//!
//! This module contains the nearby-lookup collaborator used by the chat's
//! "shop nearby" intent. It implements the `NearbyLookupService` port by
//! matching the user's free-text location against the stored shop directory.
//! Geocoding and real distance math stay outside this service.

use async_trait::async_trait;
use moodlog_core::domain::Shop;
use moodlog_core::ports::{NearbyLookupService, PortResult, StoreService};
use std::sync::Arc;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that answers "what's near <location>?" from the shop directory.
#[derive(Clone)]
pub struct ShopDirectoryLookup {
    store: Arc<dyn StoreService>,
}

impl ShopDirectoryLookup {
    /// Creates a new `ShopDirectoryLookup`.
    pub fn new(store: Arc<dyn StoreService>) -> Self {
        Self { store }
    }

    fn best_match<'a>(shops: &'a [Shop], location: &str) -> Option<&'a Shop> {
        let needle = location.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        shops.iter().find(|shop| {
            let haystack = shop.location.to_lowercase();
            haystack.contains(&needle) || needle.contains(&haystack)
        })
    }
}

//=========================================================================================
// `NearbyLookupService` Trait Implementation
//=========================================================================================

#[async_trait]
impl NearbyLookupService for ShopDirectoryLookup {
    /// Returns a human-readable nearest-match string, or a "nothing found"
    /// string when no shop location overlaps the given text.
    async fn find_nearby(&self, location: &str) -> PortResult<String> {
        let shops = self.store.list_shops().await?;
        match Self::best_match(&shops, location) {
            Some(shop) => Ok(format!("🏪 {} 📍 {}", shop.name, shop.location)),
            None => Ok(format!(
                "🚫 No shops found near {}. Want to add a new shop at this location?",
                location.trim()
            )),
        }
    }
}
