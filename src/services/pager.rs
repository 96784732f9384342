use std::ops::Range;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::services::{FeedService, FetchOutcome};

/// Presentation-adjacent driver for the feed: tracks the last count it told
/// its view about and decides when a displayed row should trigger the next
/// page fetch.
///
/// The trigger window is the last row of the currently loaded set. Because
/// the feed is append-only, the newly inserted rows after an append event
/// are always the contiguous range `[old_count, new_count)`.
pub struct FeedPager {
    feed: Arc<FeedService>,
    last_seen_count: usize,
}

impl FeedPager {
    pub fn new(feed: Arc<FeedService>) -> Self {
        Self {
            feed,
            last_seen_count: 0,
        }
    }

    /// Initial load: records the current count and kicks off the first
    /// fetch.
    pub async fn start(&mut self) -> Result<FetchOutcome, ApiError> {
        self.last_seen_count = self.feed.photo_count().await;
        self.feed.fetch_next_page().await
    }

    /// Call when the view is about to display `row`. Triggers a fetch when
    /// the row falls in the trailing window; redundant calls while a fetch
    /// is in flight are cheap no-ops inside the feed itself.
    pub async fn will_display_row(&self, row: usize) -> Result<Option<FetchOutcome>, ApiError> {
        let count = self.feed.photo_count().await;
        if count == 0 {
            return Ok(None);
        }
        let trigger_index = count - 1;
        if row >= trigger_index {
            self.feed.fetch_next_page().await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// The index range of rows inserted since the last call, or `None` when
    /// nothing new arrived. Intended to be called on each
    /// [`FeedEvent::PhotosAppended`](crate::services::FeedEvent::PhotosAppended).
    pub async fn appended_range(&mut self) -> Option<Range<usize>> {
        let new_count = self.feed.photo_count().await;
        if new_count <= self.last_seen_count {
            return None;
        }
        let range = self.last_seen_count..new_count;
        self.last_seen_count = new_count;
        Some(range)
    }
}
