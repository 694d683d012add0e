//! Single retry policy abstraction with pluggable backoff.
//!
//! The render function, like the other remote calls in this system,
//! gets a fixed attempt budget; only the backoff shape varies per
//! call site.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

/// Wait strategy between attempts
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// `attempt * step` (1s, 2s, 3s, ... for a 1s step)
    Linear { step: Duration },
    /// Same delay after every failed attempt
    Fixed { delay: Duration },
}

impl Backoff {
    /// Delay after the given 1-based attempt number failed
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Linear { step } => *step * attempt,
            Backoff::Fixed { delay } => *delay,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn linear(attempts: u32, step: Duration) -> Self {
        Self {
            attempts,
            backoff: Backoff::Linear { step },
        }
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    ///
    /// Errors classified as fatal (`is_fatal_for_retry`) propagate
    /// immediately: a request the remote definitively rejected will
    /// fail identically on every attempt.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_fatal_for_retry() => {
                    log::error!("{}: non-retryable error: {}", label, err);
                    return Err(err);
                }
                Err(err) if attempt >= self.attempts => {
                    log::error!("{}: giving up after {} attempts: {}", label, attempt, err);
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.backoff.delay_after(attempt);
                    log::warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:?}",
                        label,
                        attempt,
                        self.attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
