//! Fixed-interval ticker. Each tick starts one bounded run of a job; a tick
//! that lands while the previous run is still going is skipped.

use crate::errors::JobError;
use crate::jobs::Job;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Succeeded,
    Failed(String),
    TimedOut,
}

pub struct Ticker {
    every: Duration,
    job_timeout: Duration,
}

/// Outcome counts of one `run_until`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerReport {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub panicked: u64,
    pub last_error: Option<String>,
}

impl TickerReport {
    fn record(&mut self, job: &str, finished: Result<RunStatus, JoinError>) {
        match finished {
            Ok(RunStatus::Succeeded) => self.succeeded += 1,
            Ok(RunStatus::Failed(reason)) => {
                self.failed += 1;
                self.last_error = Some(reason);
            }
            Ok(RunStatus::TimedOut) => self.timed_out += 1,
            Err(e) => {
                error!(job, "job task panicked: {e}");
                self.panicked += 1;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

impl Ticker {
    pub fn new(every: Duration, job_timeout: Duration) -> Self {
        Self { every, job_timeout }
    }

    /// Ticks until `shutdown` resolves, then waits for the in-flight run.
    pub async fn run_until<F>(&self, job: Arc<dyn Job>, shutdown: F) -> TickerReport
    where
        F: Future<Output = ()>,
    {
        let mut ticks = interval(self.every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut running: Option<JoinHandle<RunStatus>> = None;
        let mut report = TickerReport::default();

        info!(job = job.name(), every = ?self.every, "scheduler started");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticks.tick() => {
                    if let Some(handle) = running.take() {
                        if !handle.is_finished() {
                            warn!(job = job.name(), "previous run still in progress, skipping tick");
                            running = Some(handle);
                            continue;
                        }
                        report.record(job.name(), handle.await);
                    }

                    let job = Arc::clone(&job);
                    let limit = self.job_timeout;
                    running = Some(tokio::spawn(async move { run_bounded(job.as_ref(), limit).await }));
                    report.started += 1;
                }
            }
        }

        if let Some(handle) = running {
            report.record(job.name(), handle.await);
        }

        info!(
            job = job.name(),
            runs = report.started,
            succeeded = report.succeeded,
            failed = report.failed,
            timed_out = report.timed_out,
            panicked = report.panicked,
            last_error = report.last_error.as_deref(),
            "scheduler stopped"
        );
        report
    }
}

/// Runs the job once under `limit`. Failures are logged, never propagated.
pub async fn run_bounded(job: &dyn Job, limit: Duration) -> RunStatus {
    match timeout(limit, job.run()).await {
        Ok(Ok(())) => {
            info!(job = job.name(), "job finished");
            RunStatus::Succeeded
        }
        Ok(Err(e)) => {
            error!(job = job.name(), "job failed: {e}");
            RunStatus::Failed(e.to_string())
        }
        Err(_) => {
            let e = JobError::TimedOut(limit);
            error!(job = job.name(), "{e}");
            RunStatus::TimedOut
        }
    }
}
