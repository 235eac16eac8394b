//! Live input orchestrator
//!
//! Turns a stream of keystrokes into debounced analysis requests and
//! publishes at most one accepted outcome at a time.
//!
//! Every input change advances the generation counter, which retires any
//! request already in flight. When the quiescence window elapses without a
//! further change, the timer advances the generation once more and tags the
//! request with it. A response is applied only if its tag is still the
//! latest generation when it arrives, so late replies for older input are
//! dropped even if they arrive after a newer result was shown. Superseded
//! requests are never aborted at the transport level, only ignored.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{AnalysisOutcome, AnalysisService, CONNECTIVITY_ERROR_MESSAGE};
use crate::models::{AnalysisResult, AnalysisSnapshot, AnalysisStatus};
use crate::OrchestratorConfig;

#[derive(Debug)]
struct Inner {
    generation: u64,
    closed: bool,
}

/// State shared with the timer and request tasks
struct Shared {
    inner: Mutex<Inner>,
    snapshots: watch::Sender<AnalysisSnapshot>,
}

enum ResultUpdate {
    Keep,
    Clear,
    Replace(AnalysisResult),
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a transition; callers hold the lock so check and publish are atomic
    fn publish(&self, inner: &Inner, status: AnalysisStatus, update: ResultUpdate) {
        self.snapshots.send_modify(|snapshot| {
            snapshot.generation = inner.generation;
            snapshot.status = status;
            match update {
                ResultUpdate::Keep => {}
                ResultUpdate::Clear => snapshot.result = None,
                ResultUpdate::Replace(result) => snapshot.result = Some(result),
            }
            snapshot.updated_at = Utc::now();
        });
    }

    /// Debounce timer callback. A no-op unless `ticket` is still current.
    fn fire(self: &Arc<Self>, service: &Arc<dyn AnalysisService>, ticket: u64, text: String) {
        let generation = {
            let mut inner = self.lock();
            if inner.closed || inner.generation != ticket {
                return;
            }
            inner.generation += 1;
            self.publish(&inner, AnalysisStatus::Loading, ResultUpdate::Keep);
            inner.generation
        };

        tracing::debug!(generation, input_len = text.chars().count(), "analysis request issued");

        let shared = Arc::clone(self);
        let service = Arc::clone(service);
        tokio::spawn(async move {
            let outcome = service.analyze(&text).await;
            shared.apply(generation, outcome);
        });
    }

    fn apply(&self, generation: u64, outcome: AnalysisOutcome) {
        let inner = self.lock();
        if inner.closed {
            tracing::debug!(generation, "response after shutdown ignored");
            return;
        }
        if inner.generation != generation {
            tracing::debug!(generation, latest = inner.generation, "stale response discarded");
            return;
        }

        let outcome = outcome.and_then(|result| {
            result
                .validate()
                .map(|()| result)
                .map_err(crate::client::AnalysisError::Malformed)
        });

        match outcome {
            Ok(result) => {
                tracing::debug!(generation, verdict = %result.verdict, "analysis accepted");
                self.publish(&inner, AnalysisStatus::Success, ResultUpdate::Replace(result));
            }
            Err(error) => {
                tracing::warn!(generation, %error, "analysis request failed");
                self.publish(
                    &inner,
                    AnalysisStatus::Error(CONNECTIVITY_ERROR_MESSAGE.to_string()),
                    ResultUpdate::Clear,
                );
            }
        }
    }
}

/// Single owner of the current input and its analysis lifecycle.
///
/// Must be used from within a tokio runtime. Dropping the orchestrator tears
/// it down: the pending timer is cancelled and responses still in flight
/// are ignored when they arrive.
pub struct LiveOrchestrator {
    service: Arc<dyn AnalysisService>,
    debounce: Duration,
    input: String,
    shared: Arc<Shared>,
    pending: Option<JoinHandle<()>>,
}

impl LiveOrchestrator {
    pub fn new(service: Arc<dyn AnalysisService>, config: &OrchestratorConfig) -> Self {
        Self::with_debounce(service, config.debounce())
    }

    pub fn with_debounce(service: Arc<dyn AnalysisService>, debounce: Duration) -> Self {
        let (snapshots, _) = watch::channel(AnalysisSnapshot::idle(0));
        Self {
            service,
            debounce,
            input: String::new(),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    generation: 0,
                    closed: false,
                }),
                snapshots,
            }),
            pending: None,
        }
    }

    /// Record new input and (re)schedule its analysis.
    ///
    /// Empty input goes straight to `Idle` and never reaches the service.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cancel_pending();

        let ticket = {
            let mut inner = self.shared.lock();
            if inner.closed {
                return;
            }
            inner.generation += 1;

            if self.input.is_empty() {
                self.shared
                    .publish(&inner, AnalysisStatus::Idle, ResultUpdate::Clear);
                tracing::debug!(generation = inner.generation, "input cleared");
                return;
            }

            self.shared
                .publish(&inner, AnalysisStatus::Debouncing, ResultUpdate::Keep);
            inner.generation
        };

        let shared = Arc::clone(&self.shared);
        let service = Arc::clone(&self.service);
        let window = self.debounce;
        let text = self.input.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            shared.fire(&service, ticket, text);
        }));
    }

    /// Latest issued generation
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.lock().closed
    }

    /// Cancel pending work and ignore every outstanding response
    pub fn shutdown(&mut self) {
        self.cancel_pending();
        let mut inner = self.shared.lock();
        if !inner.closed {
            inner.closed = true;
            inner.generation += 1;
            tracing::debug!(generation = inner.generation, "orchestrator shut down");
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for LiveOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for LiveOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the input itself
        f.debug_struct("LiveOrchestrator")
            .field("debounce", &self.debounce)
            .field("input_len", &self.input.chars().count())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
