//! Leaderboard cache invalidation sink.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::leaderboard::LeaderboardCache;
use crate::error::Result;
use crate::port::outbound::notifier::{Event, NotificationSink};

/// Drops cached standings for every tier an event may reorder.
pub struct LeaderboardSink {
    cache: Arc<LeaderboardCache>,
}

impl LeaderboardSink {
    pub fn new(cache: Arc<LeaderboardCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl NotificationSink for LeaderboardSink {
    fn name(&self) -> &'static str {
        "leaderboard"
    }

    async fn deliver(&self, event: &Event) -> Result<()> {
        for tier in event.affected_tiers() {
            self.cache.invalidate(tier);
        }
        Ok(())
    }
}
