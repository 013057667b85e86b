//! Predicate waits.
//!
//! A wait evaluates a script on the element until it returns `true`,
//! sleeping between attempts according to the session's
//! [`PollPolicy`](crate::PollPolicy). Errors from the script are never
//! retried. Waits end only through success, an error, or the element's
//! scope (cancel or [`Element::timeout`]).

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::browser::eval::Arg;
use crate::browser::geometry::BoundingBox;
use crate::error::{Error, Result};
use crate::scripts::Helper;

use super::Element;

// ============================================================================
// Element - Waiting
// ============================================================================

impl Element {
    /// Waits until `script` returns a set flag: `true`, a nonzero number or
    /// a `"true"` string. See [`RemoteObject::as_bool`](crate::protocol::RemoteObject::as_bool).
    ///
    /// # Errors
    ///
    /// - the first error raised by the script, unchanged
    /// - [`Error::Cancelled`] or [`Error::Timeout`] when the scope ends
    pub async fn wait(&self, script: &str, args: Vec<Arg>) -> Result<()> {
        let mut delays = self.options().poll.delays();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let result = self.eval(true, script, args.clone()).await?;
            if result.as_bool() {
                debug!(element_id = %self.inner.id, attempts = attempt, "Wait satisfied");
                return Ok(());
            }

            let delay = delays.next().unwrap_or_default();
            trace!(element_id = %self.inner.id, attempt, ?delay, "Wait not satisfied, retrying");
            self.scope.sleep(delay).await?;
        }
    }

    /// Waits until the element is visible.
    pub async fn wait_visible(&self) -> Result<()> {
        self.wait(Helper::Visible.source(), vec![]).await
    }

    /// Waits until the element is not visible.
    pub async fn wait_invisible(&self) -> Result<()> {
        self.wait(Helper::Invisible.source(), vec![]).await
    }

    /// Waits until the element is visible and its box stops moving.
    ///
    /// The box is sampled every `interval`; the wait ends when two
    /// consecutive samples are equal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a zero interval.
    pub async fn wait_stable(&self, every: Duration) -> Result<()> {
        if every.is_zero() {
            return Err(Error::invalid_argument("stability interval must be positive"));
        }

        self.wait_visible().await?;

        let mut previous: BoundingBox = self.bounding_box().await?;
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            self.scope
                .run(async {
                    ticker.tick().await;
                    Ok(())
                })
                .await?;

            let current = self.bounding_box().await?;
            if current == previous {
                debug!(element_id = %self.inner.id, ?current, "Element is stable");
                return Ok(());
            }
            previous = current;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::time::Instant;

    use crate::error::{Error, Result};
    use crate::identifiers::ObjectId;
    use crate::session::{Options, PollPolicy};
    use crate::testing::{Harness, init_tracing};

    fn boolean(value: bool) -> Result<Value> {
        Ok(json!({"result": {"type": "boolean", "value": value}}))
    }

    fn quad(left: f64) -> Result<Value> {
        Ok(json!({"model": {"content": [left, 0.0, left + 10.0, 0.0, left + 10.0, 10.0, left, 10.0]}}))
    }

    fn element(harness: &Harness) -> crate::Element {
        harness.session.page("S1").element_from_object(ObjectId::new("el"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_retries_with_backoff() {
        init_tracing();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let harness = Harness::new(move |_, _| boolean(counter.fetch_add(1, Ordering::SeqCst) >= 3));
        let started = Instant::now();

        element(&harness).wait("this.ready", vec![]).await.expect("wait");

        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        // 100 + 200 + 400
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(700) && elapsed < Duration::from_millis(710));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_uses_fixed_policy() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let harness = Harness::with_options(
            move |_, _| boolean(counter.fetch_add(1, Ordering::SeqCst) >= 2),
            Options::new().with_poll_policy(PollPolicy::fixed(Duration::from_millis(30))),
        );
        let started = Instant::now();

        element(&harness).wait_visible().await.expect("wait");

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(60) && elapsed < Duration::from_millis(70));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_accepts_nonzero_number() {
        let lengths = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&lengths);
        let harness = Harness::new(move |_, _| {
            let length = counter.fetch_add(1, Ordering::SeqCst) * 2;
            Ok(json!({"result": {"type": "number", "value": length}}))
        });

        element(&harness).wait("this.value.length", vec![]).await.expect("wait");

        assert_eq!(lengths.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_wait_propagates_script_error() {
        let harness = Harness::new(|_, _| {
            Ok(json!({
                "result": {"type": "undefined"},
                "exceptionDetails": {"text": "Uncaught", "exception": {"type": "object", "description": "ReferenceError: x"}}
            }))
        });

        let err = element(&harness).wait("x", vec![]).await.unwrap_err();

        assert!(err.is_evaluation_error());
        assert_eq!(harness.client.count("Runtime.callFunctionOn"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ends_on_timeout() {
        let harness = Harness::new(|_, _| boolean(false));

        let err = element(&harness)
            .timeout(Duration::from_millis(500))
            .wait_visible()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout { timeout_ms: 500, .. }));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_long_sleep() {
        let harness = Harness::with_options(
            |_, _| boolean(false),
            Options::new().with_poll_policy(PollPolicy::fixed(Duration::from_secs(3600))),
        );
        let element = element(&harness);
        let started = std::time::Instant::now();
        let waiter = {
            let element = element.clone();
            tokio::spawn(async move { element.wait_invisible().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        element.scope().cancel();
        let result = waiter.await.expect("join");

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_stable_after_two_equal_samples() {
        let boxes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&boxes);
        let harness = Harness::new(move |method, _| match method {
            "DOM.getBoxModel" => {
                let lefts = [0.0, 5.0, 9.0, 9.0];
                let n = counter.fetch_add(1, Ordering::SeqCst);
                quad(lefts[n.min(3)])
            }
            _ => boolean(true),
        });
        let started = Instant::now();

        element(&harness)
            .wait_stable(Duration::from_millis(50))
            .await
            .expect("stable");

        assert_eq!(boxes.load(Ordering::SeqCst), 4);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(150) && elapsed < Duration::from_millis(160));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_stable_runs_until_cancelled() {
        let boxes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&boxes);
        let harness = Harness::new(move |method, _| match method {
            "DOM.getBoxModel" => quad(counter.fetch_add(1, Ordering::SeqCst) as f64),
            _ => boolean(true),
        });

        let err = element(&harness)
            .timeout(Duration::from_secs(1))
            .wait_stable(Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(boxes.load(Ordering::SeqCst) >= 10);
    }

    #[tokio::test]
    async fn test_wait_stable_rejects_zero_interval() {
        let harness = Harness::new(|_, _| boolean(true));

        let err = element(&harness).wait_stable(Duration::ZERO).await.unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(harness.client.calls().is_empty());
    }
}
