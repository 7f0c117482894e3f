//! Background analysis off the async executor
//!
//! Analysis is CPU-bound, so each run goes to Tokio's blocking pool. The worker
//! tracks only the most recent run: submitting new input cancels the previous
//! one, and a cancelled run never delivers a result even if it had already
//! finished computing.

use crate::error::{AnalysisError, Result};
use crate::session::{AnalysisResult, AnalysisSession};
use lull_core::SampleBuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug)]
struct RunFlags {
    id: u64,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

/// Runs one analysis at a time on the blocking pool
#[derive(Debug)]
pub struct AnalysisWorker {
    runtime: Handle,
    current: Option<RunFlags>,
    next_id: u64,
}

impl AnalysisWorker {
    /// Create a worker that spawns onto `runtime`
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            current: None,
            next_id: 0,
        }
    }

    /// Create a worker bound to the runtime of the calling context
    ///
    /// # Errors
    /// Returns [`AnalysisError::WorkerFailed`] outside a Tokio runtime
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| AnalysisError::WorkerFailed(e.to_string()))
    }

    /// Start analyzing `buffer`, superseding any run still in flight
    pub fn submit(&mut self, buffer: SampleBuffer) -> AnalysisTicket {
        self.cancel();

        let id = self.next_id;
        self.next_id += 1;

        let session = AnalysisSession::new(buffer);
        let cancelled = session.cancel_flag();
        let finished = Arc::new(AtomicBool::new(false));

        let done = Arc::clone(&finished);
        let handle = self.runtime.spawn_blocking(move || {
            let outcome = session.run();
            done.store(true, Ordering::Release);
            outcome
        });

        debug!(run = id, "Analysis submitted");

        self.current = Some(RunFlags {
            id,
            cancelled: Arc::clone(&cancelled),
            finished,
        });

        AnalysisTicket {
            id,
            handle,
            cancelled,
        }
    }

    /// Cancel the run in flight, if any
    pub fn cancel(&mut self) {
        if let Some(run) = self.current.take() {
            if !run.finished.load(Ordering::Acquire) {
                info!(run = run.id, "Cancelling analysis in progress");
            }
            run.cancelled.store(true, Ordering::Release);
        }
    }

    /// Whether the latest run is still computing
    pub fn is_busy(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|run| !run.finished.load(Ordering::Acquire))
    }
}

/// Pending outcome of one submitted run
#[derive(Debug)]
pub struct AnalysisTicket {
    id: u64,
    handle: JoinHandle<Result<AnalysisResult>>,
    cancelled: Arc<AtomicBool>,
}

impl AnalysisTicket {
    /// Submission sequence number
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the run to succeed or fail
    ///
    /// # Errors
    /// - [`AnalysisError::Cancelled`] if the run was superseded or cancelled,
    ///   regardless of how far it got
    /// - [`AnalysisError::WorkerFailed`] if the blocking task panicked
    /// - any error the pipeline itself raised
    pub async fn wait(self) -> Result<AnalysisResult> {
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => return Err(AnalysisError::Cancelled),
            Err(e) => return Err(AnalysisError::WorkerFailed(e.to_string())),
        };

        if self.cancelled.load(Ordering::Acquire) {
            return Err(AnalysisError::Cancelled);
        }
        outcome
    }
}
