//! The polling loop behind every wait handler
//!
//! An [`AsyncWait`] is built from two pieces:
//!
//! - a *probe*, which performs one read-only status call and yields a snapshot
//!   or an [`ApiError`]
//! - an *evaluation* function, which classifies a snapshot as an [`Outcome`]
//!
//! The engine calls the probe, evaluates the snapshot, and either returns or
//! sleeps for the interval and tries again. Probe errors end the wait
//! immediately and unchanged: only "not in a terminal state yet" is retried.
//! The whole loop, including the sleep and any in-flight probe, is raced
//! against the timeout and the caller's cancellation token.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use stackctl_core::ApiError;
//! use stackctl_core::wait::{AsyncWait, Outcome};
//!
//! # async fn run() {
//! let handle = AsyncWait::new(
//!     "wait for answer",
//!     || async { Ok::<_, ApiError>(42u32) },
//!     |answer| if answer == 42 { Outcome::Succeeded(answer) } else { Outcome::Pending },
//! )
//! .with_interval(Duration::from_secs(1))
//! .with_timeout(Duration::from_secs(30));
//!
//! let answer = handle.wait().await.unwrap();
//! assert_eq!(answer, 42);
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::outcome::Outcome;
use super::progress::{ProgressCallback, WaitEvent, emit};
use crate::error::{ApiError, ApiResult, WaitError, WaitFailure, WaitResult};

/// Default time between two probes (5 seconds)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default overall timeout when a handler does not pick its own (10 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

type Tick<'a, T> = Box<dyn FnMut() -> BoxFuture<'a, ApiResult<Outcome<T>>> + Send + 'a>;

/// A single-use wait on one asynchronous operation
///
/// Configure it with the `with_*` methods, then consume it with
/// [`wait`](AsyncWait::wait) or
/// [`wait_with_cancellation`](AsyncWait::wait_with_cancellation).
pub struct AsyncWait<'a, T> {
    operation: String,
    tick: Tick<'a, T>,
    interval: Duration,
    timeout: Duration,
    sleep_before_wait: Duration,
    on_progress: Option<ProgressCallback>,
}

impl<'a, T: Send + 'a> AsyncWait<'a, T> {
    /// Build a wait from a probe and an evaluation function
    ///
    /// `operation` is a human readable label used in logs and progress events.
    pub fn new<S, P, F, E>(operation: impl Into<String>, mut probe: P, evaluate: E) -> Self
    where
        P: FnMut() -> F + Send + 'a,
        F: Future<Output = ApiResult<S>> + Send + 'a,
        E: Fn(S) -> Outcome<T> + Send + Sync + 'a,
    {
        let evaluate = Arc::new(evaluate);
        let tick = move || -> BoxFuture<'a, ApiResult<Outcome<T>>> {
            let observation = probe();
            let evaluate = Arc::clone(&evaluate);
            Box::pin(async move { observation.await.map(evaluate.as_ref()) })
        };

        Self {
            operation: operation.into(),
            tick: Box::new(tick),
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            sleep_before_wait: Duration::ZERO,
            on_progress: None,
        }
    }

    /// Set the time between two probes
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the overall deadline, measured from the start of the wait
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay the first probe, for APIs that do not show a new resource right away
    pub fn with_sleep_before_wait(mut self, delay: Duration) -> Self {
        self.sleep_before_wait = delay;
        self
    }

    /// Receive [`WaitEvent`]s while the wait runs
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll until a terminal outcome or the timeout
    pub async fn wait(self) -> WaitResult<T> {
        self.wait_with_cancellation(&CancellationToken::new()).await
    }

    /// Poll until a terminal outcome, the timeout, or `cancel` fires
    pub async fn wait_with_cancellation(self, cancel: &CancellationToken) -> WaitResult<T> {
        let AsyncWait {
            operation,
            mut tick,
            interval,
            timeout,
            sleep_before_wait,
            on_progress,
        } = self;

        let start = Instant::now();
        let attempts = AtomicU32::new(0);

        debug!(operation = %operation, ?interval, ?timeout, "Starting wait");
        emit(
            &on_progress,
            WaitEvent::Started {
                operation: operation.clone(),
            },
        );

        let polling = async {
            if !sleep_before_wait.is_zero() {
                tokio::time::sleep(sleep_before_wait).await;
            }

            loop {
                let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
                let elapsed = start.elapsed();

                trace!(operation = %operation, attempt, ?elapsed, "Probing");
                emit(
                    &on_progress,
                    WaitEvent::Polling {
                        operation: operation.clone(),
                        attempt,
                        elapsed,
                    },
                );

                match tick().await {
                    Ok(Outcome::Pending) => tokio::time::sleep(interval).await,
                    Ok(Outcome::Succeeded(snapshot)) => return Ok(snapshot),
                    Ok(Outcome::Failed { reason, snapshot }) => {
                        return Err(WaitFailure::new(WaitError::Failed(reason), snapshot));
                    }
                    Err(err) => return Err(probe_failure(err)),
                }
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WaitFailure::from(WaitError::Cancelled)),
            polled = tokio::time::timeout(timeout, polling) => match polled {
                Ok(result) => result,
                Err(_) => Err(WaitFailure::from(WaitError::Timeout(timeout))),
            },
        };

        let attempts = attempts.load(Ordering::Relaxed);
        let elapsed = start.elapsed();
        match &result {
            Ok(_) => {
                debug!(operation = %operation, attempts, ?elapsed, "Wait completed");
                emit(
                    &on_progress,
                    WaitEvent::Completed {
                        operation,
                        attempts,
                        elapsed,
                    },
                );
            }
            Err(failure) => {
                debug!(operation = %operation, attempts, ?elapsed, error = %failure, "Wait ended without success");
                emit(
                    &on_progress,
                    WaitEvent::Failed {
                        operation,
                        error: failure.to_string(),
                    },
                );
            }
        }

        result
    }
}

fn probe_failure<T>(err: ApiError) -> WaitFailure<T> {
    WaitFailure::from(WaitError::Api(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    const PENDING: &str = "pending";
    const DONE: &str = "done";
    const BROKEN: &str = "broken";

    /// Probe that replays `script`, then keeps reporting pending
    fn scripted(
        script: Vec<ApiResult<&'static str>>,
        calls: Arc<AtomicUsize>,
    ) -> impl FnMut() -> std::future::Ready<ApiResult<&'static str>> + Send + 'static {
        let mut script = VecDeque::from(script);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(script.pop_front().unwrap_or(Ok(PENDING)))
        }
    }

    fn evaluate(snapshot: &'static str) -> Outcome<&'static str> {
        match snapshot {
            DONE => Outcome::Succeeded(snapshot),
            BROKEN => Outcome::failed_with("resource is broken", snapshot),
            _ => Outcome::Pending,
        }
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_pending_ticks() {
        for pending in 0..4 {
            let calls = Arc::new(AtomicUsize::new(0));
            let mut script: Vec<ApiResult<&'static str>> = vec![Ok(PENDING); pending];
            script.push(Ok(DONE));

            let result = AsyncWait::new("test", scripted(script, calls.clone()), evaluate)
                .with_interval(Duration::from_millis(10))
                .with_timeout(Duration::from_secs(60))
                .wait()
                .await;

            assert_eq!(result.unwrap(), DONE);
            assert_eq!(calls.load(Ordering::SeqCst), pending + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_domain_failure_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let script = vec![Ok(PENDING), Ok(BROKEN), Ok(DONE)];

        let failure = AsyncWait::new("test", scripted(script, calls.clone()), evaluate)
            .with_interval(Duration::from_millis(10))
            .wait()
            .await
            .unwrap_err();

        assert!(failure.error().is_failed());
        assert_eq!(failure.snapshot(), Some(&BROKEN));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_on_first_tick_returns_without_sleeping() {
        let calls = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let failure = AsyncWait::new(
            "test",
            scripted(vec![Err(server_error()), Ok(DONE)], calls.clone()),
            evaluate,
        )
        .with_interval(Duration::from_secs(3600))
        .wait()
        .await
        .unwrap_err();

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(failure.snapshot().is_none());
        assert_eq!(failure.error().api_error(), Some(&server_error()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_after_pending_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let script = vec![Ok(PENDING), Err(server_error()), Ok(DONE)];

        let failure = AsyncWait::new("test", scripted(script, calls.clone()), evaluate)
            .with_interval(Duration::from_millis(10))
            .wait()
            .await
            .unwrap_err();

        assert_eq!(failure.error().status_code(), Some(500));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_at_deadline_and_not_before() {
        let calls = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let failure = AsyncWait::new("test", scripted(vec![], calls.clone()), evaluate)
            .with_interval(Duration::from_millis(100))
            .with_timeout(Duration::from_secs(1))
            .wait()
            .await
            .unwrap_err();

        let elapsed = start.elapsed();
        assert!(failure.error().is_timeout());
        assert!(failure.snapshot().is_none());
        assert!(elapsed >= Duration::from_secs(1), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1100), "returned late: {elapsed:?}");
        assert!(calls.load(Ordering::SeqCst) >= 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_spacing_between_ticks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();
        let script = vec![Ok(PENDING), Ok(PENDING), Ok(DONE)];

        AsyncWait::new("test", scripted(script, calls.clone()), evaluate)
            .with_interval(Duration::from_secs(5))
            .with_timeout(Duration::from_secs(60))
            .wait()
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_sleep() {
        let calls = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let failure = AsyncWait::new("test", scripted(vec![], calls.clone()), evaluate)
            .with_interval(Duration::from_secs(3600))
            .with_timeout(Duration::from_secs(7200))
            .wait_with_cancellation(&token)
            .await
            .unwrap_err();

        assert!(failure.error().is_cancelled());
        assert!(!failure.error().is_timeout());
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_hung_probe() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let failure = AsyncWait::new(
            "test",
            std::future::pending::<ApiResult<&'static str>>,
            evaluate,
        )
        .with_timeout(Duration::from_secs(3600))
        .wait_with_cancellation(&token)
        .await
        .unwrap_err();

        let elapsed = start.elapsed();
        assert!(failure.error().is_cancelled());
        assert!(elapsed >= Duration::from_millis(50), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(100), "returned late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_interrupts_hung_probe() {
        let start = Instant::now();
        let failure = AsyncWait::new(
            "test",
            std::future::pending::<ApiResult<&'static str>>,
            evaluate,
        )
        .with_timeout(Duration::from_secs(2))
        .wait()
        .await
        .unwrap_err();

        assert!(failure.error().is_timeout());
        assert!(failure.snapshot().is_none());
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2010), "returned late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_skips_probe() {
        let calls = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        token.cancel();

        let failure = AsyncWait::new("test", scripted(vec![Ok(DONE)], calls.clone()), evaluate)
            .wait_with_cancellation(&token)
            .await
            .unwrap_err();

        assert!(failure.error().is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_before_wait_delays_first_probe() {
        let calls = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let result = AsyncWait::new("test", scripted(vec![Ok(DONE)], calls.clone()), evaluate)
            .with_sleep_before_wait(Duration::from_secs(30))
            .wait()
            .await;

        assert_eq!(result.unwrap(), DONE);
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_events() {
        let calls = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        AsyncWait::new(
            "create thing",
            scripted(vec![Ok(PENDING), Ok(DONE)], calls),
            evaluate,
        )
        .with_interval(Duration::from_secs(1))
        .with_progress(Box::new(move |event| sink.lock().unwrap().push(event)))
        .wait()
        .await
        .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            WaitEvent::Started {
                operation: "create thing".to_string()
            }
        );
        assert!(matches!(events[1], WaitEvent::Polling { attempt: 1, .. }));
        assert!(matches!(events[2], WaitEvent::Polling { attempt: 2, .. }));
        assert!(matches!(
            events[3],
            WaitEvent::Completed { attempts: 2, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_event_carries_error_text() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let _ = AsyncWait::new(
            "create thing",
            scripted(vec![Ok(BROKEN)], Arc::new(AtomicUsize::new(0))),
            evaluate,
        )
        .with_progress(Box::new(move |event| sink.lock().unwrap().push(event)))
        .wait()
        .await;

        let events = events.lock().unwrap();
        match events.last() {
            Some(WaitEvent::Failed { error, .. }) => assert_eq!(error, "resource is broken"),
            other => panic!("unexpected last event: {:?}", other),
        }
    }

    #[test]
    fn test_defaults_and_overrides() {
        let handle = AsyncWait::new("test", || async { Ok::<_, ApiError>(DONE) }, evaluate);
        assert_eq!(handle.interval(), DEFAULT_INTERVAL);
        assert_eq!(handle.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(handle.operation(), "test");

        let handle = handle
            .with_interval(Duration::from_millis(1))
            .with_timeout(Duration::from_millis(10));
        assert_eq!(handle.interval(), Duration::from_millis(1));
        assert_eq!(handle.timeout(), Duration::from_millis(10));
    }
}
