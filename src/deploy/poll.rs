//! Fixed-interval readiness polling

use crate::deploy::DeployError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Outcome of one poll attempt
#[derive(Debug)]
pub enum Poll<T> {
    Ready(T),
    Pending,
}

/// Call `attempt` until it reports [`Poll::Ready`], sleeping `interval`
/// between attempts.
///
/// With `max_attempts` set to `None` the loop never gives up. Errors returned
/// by `attempt` abort the loop immediately.
pub async fn poll_until<T, F, Fut>(
    what: &'static str,
    interval: Duration,
    max_attempts: Option<u32>,
    mut attempt: F,
) -> Result<T, DeployError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Poll<T>, DeployError>>,
{
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        if let Poll::Ready(value) = attempt().await? {
            debug!("{} ready after {} attempt(s)", what, attempts);
            return Ok(value);
        }

        if let Some(max) = max_attempts {
            if attempts >= max {
                return Err(DeployError::PollExhausted { what, attempts });
            }
        }

        debug!("{} not ready (attempt {}), retrying in {:?}", what, attempts, interval);
        tokio::time::sleep(interval).await;
    }
}
