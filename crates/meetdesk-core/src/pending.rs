//! Single-slot pending operations.
//!
//! One engine request awaits exactly one terminal callback. The slot holds
//! the completion sender between issuing the request and the callback (or
//! timeout) resolving it. The engine offers no liveness guarantee of its
//! own, so every wait is bounded here.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::errors::SessionError;

pub struct PendingOp {
    kind: &'static str,
    slot: Mutex<Option<oneshot::Sender<bool>>>,
}

impl PendingOp {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slot: Mutex::new(None),
        }
    }

    /// Arm the slot for a new request.
    ///
    /// Arming while a request is outstanding violates the single-flight
    /// invariant and is rejected: that is a caller bug, not a runtime
    /// condition to recover from.
    pub fn arm(&self) -> Result<oneshot::Receiver<bool>, SessionError> {
        let mut slot = self.slot.lock().unwrap();
        if slot.is_some() {
            return Err(SessionError::OperationInFlight(self.kind));
        }
        let (tx, rx) = oneshot::channel();
        *slot = Some(tx);
        Ok(rx)
    }

    /// Resolve the in-flight request with its terminal outcome.
    ///
    /// Returns `false` when nothing was armed: a duplicate terminal
    /// callback, or one arriving after the wait already gave up. Callers
    /// log and discard that case.
    pub fn resolve(&self, outcome: bool) -> bool {
        match self.slot.lock().unwrap().take() {
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Drop the in-flight request without resolving it, so a late engine
    /// callback finds nothing to complete.
    pub fn cancel(&self) {
        self.slot.lock().unwrap().take();
    }

    pub fn is_armed(&self) -> bool {
        self.slot.lock().unwrap().is_some()
    }

    /// Await the outcome, bounded by `limit`. Timeout and a dropped sender
    /// both count as failure.
    pub async fn wait(&self, rx: oneshot::Receiver<bool>, limit: Duration) -> bool {
        match tokio::time::timeout(limit, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => {
                tracing::warn!(op = self.kind, "completion channel dropped");
                false
            }
            Err(_) => {
                tracing::warn!(op = self.kind, timeout_ms = limit.as_millis() as u64, "operation timed out");
                self.cancel();
                false
            }
        }
    }
}
