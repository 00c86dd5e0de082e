use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::error::{HarnessError, HarnessResult};

/// Re-evaluate `check` every `interval` until it reports `true`.
///
/// A missing element counts as "not yet". Any other error ends the wait
/// immediately. Running out of `timeout` yields [`HarnessError::UiTimeout`].
pub async fn poll_until<F, Fut>(
    condition: &str,
    timeout: Duration,
    interval: Duration,
    mut check: F,
) -> HarnessResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HarnessResult<bool>>,
{
    let started = Instant::now();
    let deadline = started + timeout;

    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) | Err(HarnessError::NoSuchElement { .. }) => {}
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(condition, "wait timed out");
            return Err(HarnessError::UiTimeout {
                condition: condition.to_string(),
                waited: now - started,
            });
        }
        sleep(interval.min(deadline - now)).await;
    }
}
