//! Fixed-period job trigger
//!
//! The job sits in a single slot (`Arc<Mutex<J>>`). On every tick the
//! scheduler tries to take the slot without waiting; if a previous run still
//! holds it the tick is dropped. Nothing is ever queued, so ticks missed
//! during a long run collapse into nothing and the next run starts on the
//! next regular tick.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Unit of scheduled work
#[async_trait]
pub trait Job: Send + 'static {
    async fn tick(&mut self);
}

pub struct Scheduler {
    period: Duration,
    shutdown_grace: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    /// How long shutdown waits for an in-flight run before aborting it
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Spawn the tick loop; the first tick fires one period from now
    pub fn start<J: Job>(&self, job: J) -> SchedulerHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(tick_loop(
            self.period,
            self.shutdown_grace,
            Arc::new(Mutex::new(job)),
            cancel.clone(),
        ));
        tracing::info!("Scheduler started, period {:?}", self.period);
        SchedulerHandle { cancel, task }
    }
}

pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<usize>,
}

impl SchedulerHandle {
    /// Stop ticking and wait for an in-flight run (bounded by the grace period)
    ///
    /// Returns how many runs completed or panicked over the scheduler's life.
    pub async fn shutdown(self) -> usize {
        self.cancel.cancel();
        match self.task.await {
            Ok(runs) => {
                tracing::info!("Scheduler stopped after {} runs", runs);
                runs
            }
            Err(e) => {
                tracing::error!("Scheduler task failed: {}", e);
                0
            }
        }
    }
}

/// Returns the number of runs joined, aborted runs excluded
async fn tick_loop<J: Job>(
    period: Duration,
    grace: Duration,
    job: Arc<Mutex<J>>,
    cancel: CancellationToken,
) -> usize {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<JoinHandle<()>> = None;
    let mut joined = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let mut slot = match job.clone().try_lock_owned() {
                    Ok(slot) => slot,
                    Err(_) => {
                        tracing::debug!("Previous run still in progress, skipping tick");
                        continue;
                    }
                };

                // the slot is free, so the previous task is done or about to return
                if let Some(handle) = in_flight.take() {
                    report(handle.await);
                    joined += 1;
                }
                in_flight = Some(tokio::spawn(async move {
                    slot.tick().await;
                }));
            }
        }
    }

    let Some(mut handle) = in_flight else {
        return joined;
    };
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(result) => {
            report(result);
            joined += 1;
        }
        Err(_) => {
            tracing::warn!("Run did not finish within {:?}, aborting", grace);
            handle.abort();
        }
    }
    joined
}

/// A panicking run is logged; the loop keeps ticking
fn report(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!("Scheduled run panicked: {}", e);
        }
    }
}
