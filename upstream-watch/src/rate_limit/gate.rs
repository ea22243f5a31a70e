//! Fixed-interval request gate.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces upstream requests at least `interval` apart.
///
/// The gate is shared by every concurrent check, so the spacing holds for
/// the whole run no matter how many declarations are in flight.
#[derive(Debug)]
pub struct RequestGate {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestGate {
    /// Creates a gate that admits one request per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Returns the spacing that spreads `limit` requests evenly over an hour.
    ///
    /// GitHub documents 5000 requests per hour for authenticated clients.
    #[must_use]
    pub fn hourly_interval(limit: u32) -> Duration {
        Duration::from_secs(3600) / limit.max(1)
    }

    /// Returns the spacing enforced between requests.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the next request slot opens, then claims it.
    pub async fn wait(&self) {
        let mut next_slot = self.next_slot.lock().await;
        if let Some(slot) = *next_slot {
            if slot > Instant::now() {
                sleep_until(slot).await;
            }
        }
        *next_slot = Some(Instant::now() + self.interval);
    }
}
