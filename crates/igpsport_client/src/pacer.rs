//! Fixed-interval pacing between consecutive requests.
//!
//! Pagination and download batches call [`Pacer::pause`] between requests.
//! Production code sleeps on the tokio timer; tests swap in
//! [`RecordingPacer`] to observe the requested delays without waiting.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps for the requested delay on the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Records every requested pause and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delay);
    }
}
