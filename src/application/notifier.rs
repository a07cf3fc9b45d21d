//! Background delivery of committed ledger events.
//!
//! [`TransitionNotifier`] is the [`Notifier`] handed to the ledger service.
//! `notify` only enqueues; a dispatcher task fans every event out to one
//! worker per sink, and each worker retries its own failures with jittered
//! exponential backoff. A failing or slow sink never delays the others, and
//! nothing here can reach back into the ledger write that produced the event.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::port::outbound::notifier::{Event, NotificationSink, Notifier};

/// Retry schedule for one sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Total attempts per event, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl DeliveryPolicy {
    /// Delay before retry number `attempt` (1-based), with up to 50% jitter.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let max = self.max_backoff.as_millis() as u64;
        let base = (self.initial_backoff.as_millis() as u64)
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(20))
            .min(max);
        let jitter = if base > 1 {
            rand::thread_rng().gen_range(0..=base / 2)
        } else {
            0
        };
        Duration::from_millis(base.saturating_add(jitter).min(max))
    }
}

/// Queue-backed notifier feeding the sink workers.
pub struct TransitionNotifier {
    sender: mpsc::UnboundedSender<Event>,
}

impl TransitionNotifier {
    /// Start the dispatcher and one worker per sink.
    ///
    /// The returned handle completes after the notifier is dropped and every
    /// queued event has been handled by every sink.
    #[must_use]
    pub fn spawn(
        sinks: Vec<Arc<dyn NotificationSink>>,
        policy: DeliveryPolicy,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(dispatch(receiver, sinks, policy));
        (Self { sender }, handle)
    }
}

impl Notifier for TransitionNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Transition notifier channel closed");
        }
    }
}

async fn dispatch(
    mut receiver: mpsc::UnboundedReceiver<Event>,
    sinks: Vec<Arc<dyn NotificationSink>>,
    policy: DeliveryPolicy,
) {
    let mut lanes = Vec::with_capacity(sinks.len());
    let mut workers = Vec::with_capacity(sinks.len());
    for sink in sinks {
        let (tx, rx) = mpsc::unbounded_channel();
        lanes.push(tx);
        workers.push(tokio::spawn(sink_worker(sink, rx, policy)));
    }
    info!(sinks = lanes.len(), "Transition notifier started");

    while let Some(event) = receiver.recv().await {
        for lane in &lanes {
            // A closed lane means its worker panicked; the others keep going.
            let _ = lane.send(event.clone());
        }
    }

    drop(lanes);
    for worker in workers {
        if let Err(e) = worker.await {
            error!(error = %e, "Notification sink worker failed");
        }
    }
    info!("Transition notifier stopped");
}

async fn sink_worker(
    sink: Arc<dyn NotificationSink>,
    mut receiver: mpsc::UnboundedReceiver<Event>,
    policy: DeliveryPolicy,
) {
    while let Some(event) = receiver.recv().await {
        deliver_with_retry(sink.as_ref(), &event, policy).await;
    }
}

/// Deliver one event, retrying on error. Returns `true` on success.
pub async fn deliver_with_retry(
    sink: &dyn NotificationSink,
    event: &Event,
    policy: DeliveryPolicy,
) -> bool {
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        match sink.deliver(event).await {
            Ok(()) => {
                if attempt > 1 {
                    debug!(sink = sink.name(), attempt, "Notification delivered after retry");
                }
                return true;
            }
            Err(e) if attempt < attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    sink = sink.name(),
                    squad_id = %event.squad_id(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Notification delivery failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!(
                    sink = sink.name(),
                    squad_id = %event.squad_id(),
                    attempts,
                    error = %e,
                    "Notification dropped after retries"
                );
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DivisionTier, SquadId};
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> DeliveryPolicy {
        DeliveryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
        }
    }

    fn event(squad: &str) -> Event {
        Event::SquadArchived {
            squad_id: SquadId::new(squad),
            tier: DivisionTier::Gold,
        }
    }

    struct Flaky {
        failures_left: AtomicU32,
        delivered: Mutex<Vec<Event>>,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                delivered: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NotificationSink for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn deliver(&self, event: &Event) -> Result<()> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(Error::Connection("sink unavailable".into()));
            }
            self.delivered.lock().push(event.clone());
            Ok(())
        }
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = DeliveryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1_000),
        };
        let first = policy.backoff(1);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(150));
        let third = policy.backoff(3);
        assert!(third >= Duration::from_millis(400) && third <= Duration::from_millis(600));
        assert_eq!(policy.backoff(12), Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_failures() {
        let sink = Flaky::new(2);
        assert!(deliver_with_retry(&sink, &event("alpha"), fast()).await);
        assert_eq!(sink.delivered.lock().len(), 1);
    }

    #[tokio::test]
    async fn retry_gives_up_after_budget() {
        let sink = Flaky::new(10);
        assert!(!deliver_with_retry(&sink, &event("alpha"), fast()).await);
        assert!(sink.delivered.lock().is_empty());
    }

    #[tokio::test]
    async fn failing_sink_does_not_starve_others() {
        let broken = Arc::new(Flaky::new(u32::MAX));
        let healthy = Arc::new(Flaky::new(0));
        let sinks: Vec<Arc<dyn NotificationSink>> = vec![broken.clone(), healthy.clone()];
        let (notifier, handle) = TransitionNotifier::spawn(sinks, fast());

        notifier.notify(event("alpha"));
        notifier.notify(event("beta"));
        drop(notifier);
        handle.await.unwrap();

        assert_eq!(
            *healthy.delivered.lock(),
            vec![event("alpha"), event("beta")]
        );
        assert!(broken.delivered.lock().is_empty());
    }
}
