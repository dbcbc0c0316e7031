//! The scan scheduler: one periodic loop per scan kind, a shared
//! cancellation token, and a grace-bounded shutdown.
//!
//! Each loop walks Idle -> Running -> Waiting and back, until the token
//! moves it to Cancelled. Cancellation is cooperative: it is observed
//! between iterations, never mid-call, so an in-flight pass always runs
//! to completion.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, timeout_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use k8s_inventory::{ConfigError, ScanConfig, ScanResult};

use super::*;

/// One unit of scan work. Implementations are read-only over shared
/// state; every invocation is independent of the previous one.
pub trait ScanTask: Send + Sync + 'static {
    fn kind(&self) -> ScanKind;

    /// Perform one scan pass, returning the number of items found.
    fn scan(&self) -> impl Future<Output = Result<usize, ScanError>> + Send;
}

/// Drives periodic scan loops and coordinates graceful shutdown.
///
/// Every spawned loop performs an immediate first pass, then one pass
/// per interval tick. Ticks never overlap within a loop: a slow pass
/// delays the next tick instead of running concurrently with it. A
/// failed pass is logged and retried at the next natural tick only.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Fails with [`ConfigError::NonPositiveInterval`] for a zero
    /// interval; the configured kinds and grace period are the caller's
    /// concern.
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            interval: config.interval,
            cancel: CancellationToken::new(),
            handles: Vec::new(),
        })
    }

    /// Start a scan loop for `task`. The first pass begins immediately.
    pub fn spawn<T: ScanTask>(&mut self, task: T) {
        let every = self.interval;
        let cancel = self.cancel.clone();
        self.handles.push(tokio::spawn(scan_loop(task, every, cancel)));
    }

    /// Signal cancellation to every loop, then wait up to `grace` for
    /// in-flight passes to finish.
    ///
    /// Nothing is interrupted mid-call: loops observe the token at
    /// iteration boundaries, and a loop still running when the deadline
    /// passes is left for process exit to reap. A zero grace period
    /// still guarantees no new pass begins.
    pub async fn shutdown(mut self, grace: Duration) {
        self.cancel.cancel();
        let deadline = Instant::now() + grace;
        for mut handle in self.handles.drain(..) {
            match timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::error!(%err, "scan loop panicked"),
                Err(_) => tracing::warn!("scan loop still running at grace deadline"),
            }
        }
    }
}

async fn scan_loop<T: ScanTask>(task: T, every: Duration, cancel: CancellationToken) {
    let kind = task.kind();
    tracing::info!(%kind, interval = ?every, "scan loop started");

    // The first tick completes immediately; Delay keeps ticks from
    // bunching up behind a pass that overruns the interval.
    let mut ticks = interval(every);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!(%kind, "scan loop cancelled");
                return;
            }
            _ = ticks.tick() => {}
        }

        let started = Instant::now();
        match task.scan().await {
            Ok(items) => {
                let result = ScanResult {
                    kind,
                    items,
                    duration: started.elapsed(),
                };
                tracing::info!(
                    %kind,
                    items = result.items,
                    duration_ms = result.duration.as_millis() as u64,
                    "scan pass completed"
                );
            }
            Err(err) => tracing::error!(%kind, %err, "scan pass failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use time::ext::NumericalStdDuration as _;

    use super::*;

    #[derive(Clone)]
    struct CountingTask {
        kind: ScanKind,
        started: Arc<AtomicUsize>,
        finished: Arc<AtomicUsize>,
        delay: Duration,
        fail_on_first: bool,
    }

    impl CountingTask {
        fn new(kind: ScanKind) -> Self {
            Self {
                kind,
                started: Arc::new(AtomicUsize::new(0)),
                finished: Arc::new(AtomicUsize::new(0)),
                delay: Duration::ZERO,
                fail_on_first: false,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn failing_on_first(mut self) -> Self {
            self.fail_on_first = true;
            self
        }

        fn started(&self) -> usize {
            self.started.load(Ordering::SeqCst)
        }

        fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    impl ScanTask for CountingTask {
        fn kind(&self) -> ScanKind {
            self.kind
        }

        async fn scan(&self) -> Result<usize, ScanError> {
            let pass = self.started.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_first && pass == 1 {
                return Err(ScanError::Client(kube::Error::Api(Box::new(
                    kube::core::Status::failure("transient", "ServiceUnavailable")
                        .with_code(503),
                ))));
            }
            Ok(pass)
        }
    }

    fn config(every: Duration) -> ScanConfig {
        ScanConfig {
            interval: every,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Scheduler::new(&config(Duration::ZERO)).unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveInterval);
    }

    #[tokio::test(start_paused = true)]
    async fn first_pass_runs_immediately() {
        let task = CountingTask::new(ScanKind::Namespaces);
        let mut scheduler = Scheduler::new(&config(5.std_minutes())).unwrap();
        scheduler.spawn(task.clone());

        tokio::time::sleep(1.std_milliseconds()).await;
        assert_eq!(task.started(), 1, "first pass must not wait for a tick");

        scheduler.shutdown(Duration::ZERO).await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_mid_wait_prevents_further_passes() {
        let task = CountingTask::new(ScanKind::Pods);
        let mut scheduler = Scheduler::new(&config(100.std_milliseconds())).unwrap();
        scheduler.spawn(task.clone());

        tokio::time::sleep(10.std_milliseconds()).await;
        assert_eq!(task.started(), 1);

        scheduler.shutdown(1.std_seconds()).await;
        tokio::time::sleep(1.std_seconds()).await;
        assert_eq!(task.started(), 1, "no pass may begin after cancellation");
    }

    #[tokio::test(start_paused = true)]
    async fn failing_pass_does_not_stop_the_loop() {
        let task = CountingTask::new(ScanKind::Secrets).failing_on_first();
        let mut scheduler = Scheduler::new(&config(100.std_milliseconds())).unwrap();
        scheduler.spawn(task.clone());

        tokio::time::sleep(250.std_milliseconds()).await;
        scheduler.shutdown(1.std_seconds()).await;

        // Pass 1 failed at t=0; passes at t=100 and t=200 still ran, on
        // the unmodified interval.
        assert_eq!(task.started(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn two_loops_tick_independently() {
        let pods = CountingTask::new(ScanKind::Pods);
        let secrets = CountingTask::new(ScanKind::Secrets);
        let mut scheduler = Scheduler::new(&config(100.std_milliseconds())).unwrap();
        scheduler.spawn(pods.clone());
        scheduler.spawn(secrets.clone());

        tokio::time::sleep(250.std_milliseconds()).await;
        scheduler.shutdown(2.std_seconds()).await;

        assert_eq!(pods.started(), 3);
        assert_eq!(secrets.started(), 3);

        tokio::time::sleep(1.std_seconds()).await;
        assert_eq!(pods.started(), 3, "loops must stay stopped after shutdown");
        assert_eq!(secrets.started(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_grace_shutdown_stops_new_passes() {
        let task = CountingTask::new(ScanKind::Pods).with_delay(500.std_milliseconds());
        let mut scheduler = Scheduler::new(&config(100.std_milliseconds())).unwrap();
        scheduler.spawn(task.clone());

        tokio::time::sleep(10.std_milliseconds()).await;
        assert_eq!(task.started(), 1);
        assert_eq!(task.finished(), 0, "pass should still be in flight");

        scheduler.shutdown(Duration::ZERO).await;

        // The in-flight pass may finish on its own, but nothing new starts.
        tokio::time::sleep(2.std_seconds()).await;
        assert_eq!(task.started(), 1);
        assert_eq!(task.finished(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn grace_period_lets_in_flight_pass_finish() {
        let task = CountingTask::new(ScanKind::Namespaces).with_delay(300.std_milliseconds());
        let mut scheduler = Scheduler::new(&config(1.std_seconds())).unwrap();
        scheduler.spawn(task.clone());

        tokio::time::sleep(10.std_milliseconds()).await;
        assert_eq!(task.finished(), 0);

        scheduler.shutdown(1.std_seconds()).await;
        assert_eq!(task.finished(), 1, "shutdown should wait out the pass");
    }
}
