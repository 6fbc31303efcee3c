//! One-shot, cancelable tick timer
//!
//! The game loop arms the clock after every tick it wants to follow up on
//! and disarms it on game over or reset. Disarming an idle clock is a no-op.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Instant, Sleep};

#[derive(Debug, Default)]
pub struct TickClock {
    pending: Option<Pin<Box<Sleep>>>,
}

impl TickClock {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Arm the clock to fire once after `period`, replacing any pending tick
    pub fn schedule(&mut self, period: Duration) {
        self.pending = Some(Box::pin(sleep(period)));
    }

    /// Disarm the clock. Returns whether a tick was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|sleep| sleep.deadline())
    }

    /// Wait for the pending tick; never resolves while the clock is disarmed.
    ///
    /// Cancel safe: dropping the future before it resolves keeps the tick
    /// pending, so this can sit in a `select!` next to input handling.
    pub async fn fired(&mut self) {
        match self.pending.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.pending = None;
            }
            None => future::pending::<()>().await,
        }
    }
}
