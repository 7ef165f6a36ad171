//! Timer abstraction for the collection window
//!
//! Waiting is always a scheduled resumption, never a blocked thread. Tests
//! run on tokio's paused clock, so the window elapses deterministically.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Timer: Send + Sync {
    /// Resolve once `duration` has elapsed
    async fn sleep(&self, duration: Duration);
}

/// Timer backed by the tokio runtime clock
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
