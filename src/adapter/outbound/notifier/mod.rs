//! Notification sinks.
//!
//! Implements `port::NotificationSink` for the backends driven by the
//! transition notifier worker.

mod leaderboard;
mod log;
mod subscriber;

pub use leaderboard::LeaderboardSink;
pub use log::LogSink;
pub use subscriber::SubscriberSink;
