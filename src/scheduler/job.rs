//! Per-target polling job.
//!
//! # States
//! - Waiting: idle until the next tick or cancellation
//! - Running: probe in flight, then result delivery
//! - Stopped: terminal, acknowledgment sent
//!
//! # State Transitions
//! ```text
//! Waiting → Running: ticker fires
//! Running → Waiting: result delivered (or dropped because nobody listens)
//! Waiting → Stopped: cancellation observed before the tick
//! Running → Stopped: cancellation aborts the probe or interrupts delivery
//! ```
//!
//! # Design Decisions
//! - At most one probe in flight; a slow probe delays the next tick instead
//!   of stacking up behind it
//! - Cancellation wins every race at the top of the wait
//! - The result stream is closed before termination is acknowledged

use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::lifecycle::ShutdownSignal;
use crate::probe::{ProbeExecutor, ProbeResult, Target};

/// Receiving half of a job's results.
pub type ResultStream = mpsc::Receiver<ProbeResult>;

/// Observable state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Waiting,
    Running,
    Stopped,
}

enum Delivery {
    Sent,
    Closed,
    Cancelled,
}

/// Long-lived task probing one target.
pub(crate) struct Job {
    target: Target,
    executor: ProbeExecutor,
    shutdown: ShutdownSignal,
    results: mpsc::Sender<ProbeResult>,
    state: watch::Sender<JobState>,
    done: oneshot::Sender<()>,
}

impl Job {
    /// Spawn a job onto the runtime.
    pub(crate) fn spawn(
        target: Target,
        executor: ProbeExecutor,
        shutdown: ShutdownSignal,
    ) -> (JobHandle, ResultStream) {
        // Capacity 1: a result waits for the consumer instead of queueing
        let (results_tx, results_rx) = mpsc::channel(1);
        let (state_tx, state_rx) = watch::channel(JobState::Waiting);
        let (done_tx, done_rx) = oneshot::channel();

        let job = Job {
            target: target.clone(),
            executor,
            shutdown,
            results: results_tx,
            state: state_tx,
            done: done_tx,
        };
        let task = tokio::spawn(job.run());

        let handle = JobHandle {
            target,
            state: state_rx,
            done: done_rx,
            task,
        };
        (handle, results_rx)
    }

    async fn run(mut self) {
        let interval = ticker_period(self.target.interval());
        tracing::info!(
            url = %self.target,
            interval_secs = interval.as_secs_f64(),
            "Job started"
        );

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut consumer_gone = false;

        loop {
            self.state.send_replace(JobState::Waiting);
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            self.state.send_replace(JobState::Running);
            let result = self.executor.execute(&self.target, &mut self.shutdown).await;

            match self.deliver(result).await {
                Delivery::Sent => {}
                Delivery::Closed => {
                    if !consumer_gone {
                        tracing::warn!(url = %self.target, "Result consumer gone, discarding results");
                        consumer_gone = true;
                    }
                }
                Delivery::Cancelled => break,
            }
        }

        let Job {
            target,
            results,
            state,
            done,
            ..
        } = self;
        state.send_replace(JobState::Stopped);
        drop(results);
        tracing::info!(url = %target, "Job stopped");
        let _ = done.send(());
    }

    /// Hand a result to the consumer.
    ///
    /// A ready consumer always gets the result, even during shutdown, so an
    /// aborted probe is still reported. Waiting for a busy consumer gives
    /// way to cancellation.
    async fn deliver(&mut self, result: ProbeResult) -> Delivery {
        let result = match self.results.try_send(result) {
            Ok(()) => return Delivery::Sent,
            Err(TrySendError::Closed(_)) => return Delivery::Closed,
            Err(TrySendError::Full(result)) => result,
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Delivery::Cancelled,
            permit = self.results.reserve() => match permit {
                Ok(permit) => {
                    permit.send(result);
                    Delivery::Sent
                }
                Err(_) => Delivery::Closed,
            },
        }
    }
}

/// Longest period the ticker is armed with. Larger intervals never fire
/// within the life of a process anyway.
const MAX_TICKER_PERIOD: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Clamp an interval into what `tokio::time::interval_at` accepts: a
/// non-zero period whose first deadline doesn't overflow `Instant`.
fn ticker_period(interval: Duration) -> Duration {
    interval.clamp(Duration::from_millis(1), MAX_TICKER_PERIOD)
}

/// Scheduler-side handle to a running job.
#[derive(Debug)]
pub struct JobHandle {
    target: Target,
    state: watch::Receiver<JobState>,
    done: oneshot::Receiver<()>,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Current state of the job.
    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    /// Wait for the termination acknowledgment.
    ///
    /// Returns `false` if the job ended without acknowledging.
    pub(crate) async fn stopped(self) -> bool {
        match self.done.await {
            Ok(()) => {
                let _ = self.task.await;
                true
            }
            Err(_) => {
                if let Err(e) = self.task.await {
                    tracing::error!(url = %self.target, error = %e, "Job task failed");
                }
                false
            }
        }
    }
}
