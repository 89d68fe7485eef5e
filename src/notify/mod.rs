//! Alert delivery.
//!
//! Notifications are fire-and-forget: the scheduler calls `notify` and
//! moves on, logging (never propagating) any delivery failure. The trait
//! is the seam for plugging in a real desktop or webhook backend; the
//! default implementation surfaces alerts as prominent log events.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier {
    /// Best-effort delivery of one alert.
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes alerts to the log stream at info level.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(title = %title, body = %body, "ALERT");
        Ok(())
    }
}
