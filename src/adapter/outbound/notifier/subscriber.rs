//! Live subscriber fan-out sink.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::application::registry::ConnectionRegistry;
use crate::error::Result;
use crate::port::outbound::notifier::{Event, NotificationSink};

/// Pushes events to the squad's registered connections.
///
/// Lagging subscribers miss the event rather than stalling the worker, so
/// this sink never reports a delivery failure.
pub struct SubscriberSink {
    registry: Arc<ConnectionRegistry>,
}

impl SubscriberSink {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl NotificationSink for SubscriberSink {
    fn name(&self) -> &'static str {
        "subscriber"
    }

    async fn deliver(&self, event: &Event) -> Result<()> {
        let report = self.registry.broadcast(event);
        trace!(
            squad_id = %event.squad_id(),
            delivered = report.delivered,
            lagging = report.lagging,
            pruned = report.pruned,
            "Event fanned out"
        );
        Ok(())
    }
}
