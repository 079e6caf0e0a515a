//! Fire-and-forget delayed tasks (deferred deletions, summary refreshes).
//!
//! The delay source is injected so tests run without wall-clock waits, and
//! every task races a cancellation token. Nothing cancels scheduled work
//! today; the token exists so shutdown can drop pending deletions cleanly.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::Result;

#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                clock,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Run `task` after `delay`. Failures are logged and dropped; there is
    /// no retry and no backpressure.
    pub fn schedule_after<F>(&self, delay: Duration, label: &'static str, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let clock = Arc::clone(&self.inner.clock);
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = clock.sleep(delay) => {
                    if let Err(e) = task.await {
                        warn!("scheduled task '{label}' failed: {e}");
                    }
                }
            }
        });
    }

    /// Drop all pending scheduled work.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }
}

/// Clock that returns immediately; keeps tests off the wall clock.
#[cfg(any(test, feature = "test-support"))]
pub struct InstantClock;

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _delay: Duration) {}
}
