//! Polling scheduler.
//!
//! # Data Flow
//! ```text
//! Scheduler::spawn(target)
//!     → job.rs (own ticker, own result stream)
//!     → ProbeExecutor on every tick
//!     → ResultStream drained by the metrics sink
//!
//! Scheduler::shutdown()
//!     → broadcast cancellation once
//!     → wait for every job's acknowledgment (barrier)
//! ```
//!
//! # Design Decisions
//! - Jobs share nothing but the cancellation signal and the HTTP client
//! - Only the scheduler triggers cancellation and reads acknowledgments

pub mod job;

use futures_util::future::join_all;

use crate::lifecycle::Shutdown;
use crate::probe::{ProbeExecutor, Target};

pub use job::{JobHandle, JobState, ResultStream};

use job::Job;

/// Outcome of the shutdown barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Jobs that acknowledged termination.
    pub acknowledged: usize,
    /// Jobs whose task ended without acknowledging (panicked).
    pub lost: usize,
}

/// Owns every job and the cancellation signal they observe.
pub struct Scheduler {
    shutdown: Shutdown,
    executor: ProbeExecutor,
    jobs: Vec<JobHandle>,
}

impl Scheduler {
    pub fn new(executor: ProbeExecutor) -> Self {
        Self {
            shutdown: Shutdown::new(),
            executor,
            jobs: Vec::new(),
        }
    }

    /// Start a job for `target` and return its result stream.
    ///
    /// The stream should be drained continuously; a job waits for its
    /// consumer before scheduling the next probe.
    pub fn spawn(&mut self, target: Target) -> ResultStream {
        let (handle, results) = Job::spawn(target, self.executor.clone(), self.shutdown.subscribe());
        self.jobs.push(handle);
        results
    }

    pub fn jobs(&self) -> &[JobHandle] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Cancel every job and wait until all of them have stopped.
    pub async fn shutdown(self) -> ShutdownReport {
        let Scheduler { shutdown, jobs, .. } = self;
        let total = jobs.len();

        if shutdown.trigger() {
            tracing::info!(jobs = total, "Cancelling jobs");
        }

        let acknowledged = join_all(jobs.into_iter().map(JobHandle::stopped))
            .await
            .into_iter()
            .filter(|acked| *acked)
            .count();

        let report = ShutdownReport {
            acknowledged,
            lost: total - acknowledged,
        };
        if report.lost > 0 {
            tracing::error!(lost = report.lost, "Jobs ended without acknowledging shutdown");
        }
        report
    }
}
