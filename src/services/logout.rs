use std::sync::Arc;

use crate::services::{AvatarService, FeedService, ProfileService};
use crate::token::TokenStore;

/// Tears down a user session: the bearer token, the cached profile, the
/// cached avatar URL and the feed are all cleared, leaving every service
/// reusable for a fresh login. No events are emitted.
pub struct LogoutService {
    token_store: Arc<dyn TokenStore>,
    feed: Arc<FeedService>,
    profile: Arc<ProfileService>,
    avatar: Arc<AvatarService>,
}

impl LogoutService {
    pub fn new(
        token_store: Arc<dyn TokenStore>,
        feed: Arc<FeedService>,
        profile: Arc<ProfileService>,
        avatar: Arc<AvatarService>,
    ) -> Self {
        Self {
            token_store,
            feed,
            profile,
            avatar,
        }
    }

    pub async fn logout(&self) {
        log::info!("Clearing session data");
        self.token_store.clear();
        self.profile.clear().await;
        self.avatar.clear().await;
        self.feed.clear().await;
    }
}
