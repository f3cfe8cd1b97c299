// ── Bounded retry with fixed delay ──
//
// Sequential chain of delayed attempts. Each attempt either confirms,
// signals `RetryUnsuccessful` to go again, or fails fatally and stops the
// loop. The sleep happens before every attempt.

use std::time::Duration;

use tracing::trace;

use crate::error::CoreError;

pub(crate) const ARM_RETRY_ATTEMPTS: u32 = 2;
pub(crate) const ARM_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub(crate) const ARMING: Self = Self {
        attempts: ARM_RETRY_ATTEMPTS,
        delay: ARM_RETRY_DELAY,
    };
}

/// An attempt ran but did not observe the expected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryUnsuccessful {
    pub attempt: u32,
}

#[derive(Debug)]
pub(crate) enum AttemptError {
    Retry(RetryUnsuccessful),
    Fatal(CoreError),
}

#[derive(Debug)]
pub(crate) enum RetryError {
    Exhausted { attempts: u32 },
    Fatal(CoreError),
}

pub(crate) async fn retry<T, F, Fut>(policy: RetryPolicy, mut attempt: F) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    for n in 1..=policy.attempts {
        tokio::time::sleep(policy.delay).await;
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Retry(signal)) => {
                trace!(attempt = signal.attempt, of = policy.attempts, "attempt unconfirmed");
            }
            Err(AttemptError::Fatal(e)) => return Err(RetryError::Fatal(e)),
        }
    }
    Err(RetryError::Exhausted {
        attempts: policy.attempts,
    })
}
