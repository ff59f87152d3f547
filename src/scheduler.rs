// src/scheduler.rs

//! Fixed-interval job scheduling.
//!
//! Each registered job runs in its own tokio task. The job executes
//! inline in its timer loop, so runs of the same job are serialized: a
//! run that outlasts the interval delays the next tick instead of
//! overlapping it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;

/// A periodic job.
#[async_trait]
pub trait SchedulerJob: Send + Sync {
    /// Stable name used in log output.
    fn name(&self) -> &'static str;

    /// Wall-clock interval between runs.
    fn interval(&self) -> std::time::Duration;

    /// Execute one run.
    async fn execute(&self) -> Result<()>;
}

/// Owns the timer tasks driving registered jobs.
///
/// The scheduler handle is constructor-injected into the process
/// lifecycle; dropping or stopping it tears the timers down.
pub struct Scheduler {
    jobs: Vec<Arc<dyn SchedulerJob>>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Create a scheduler with no jobs.
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
        }
    }

    /// Register a job. Jobs are not started until [`start`](Self::start).
    pub fn with_job<J: SchedulerJob + 'static>(mut self, job: J) -> Self {
        self.jobs.push(Arc::new(job));
        self
    }

    /// Spawn one timer task per registered job and return immediately.
    pub fn start(&mut self) {
        for job in &self.jobs {
            let job = Arc::clone(job);
            self.handles.push(tokio::spawn(async move {
                Self::run_job_loop(job).await;
            }));
        }
    }

    /// Drive a single job forever.
    async fn run_job_loop(job: Arc<dyn SchedulerJob>) {
        let name = job.name();
        let interval = job.interval();
        tracing::info!("Job '{}' scheduled every {:?}", name, interval);

        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately; consume it so the first
        // run happens one full interval after startup.
        timer.tick().await;

        loop {
            timer.tick().await;

            match job.execute().await {
                Ok(()) => {
                    tracing::debug!("Job '{}' completed successfully", name);
                }
                Err(e) => {
                    tracing::error!("Job '{}' failed: {}", name, e);
                }
            }
        }
    }

    /// Abort all timer tasks.
    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        tracing::info!("Scheduler stopped");
    }

    /// Number of registered jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    struct CountingJob {
        runs: Arc<AtomicU32>,
    }

    #[async_trait]
    impl SchedulerJob for CountingJob {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn interval(&self) -> Duration {
            Duration::from_millis(5)
        }

        async fn execute(&self) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_job_runs_repeatedly() {
        let runs = Arc::new(AtomicU32::new(0));
        let mut scheduler = Scheduler::new().with_job(CountingJob {
            runs: Arc::clone(&runs),
        });
        assert_eq!(scheduler.job_count(), 1);

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.stop();

        assert!(runs.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_stop_halts_execution() {
        let runs = Arc::new(AtomicU32::new(0));
        let mut scheduler = Scheduler::new().with_job(CountingJob {
            runs: Arc::clone(&runs),
        });

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(30)).await;
        scheduler.stop();

        let after_stop = runs.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    }
}
