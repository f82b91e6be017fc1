//! Bounded fixed-delay retry for transient transport failures.
//!
//! Only `TransportError::Unavailable` is retried. A command the platform
//! rejected fails identically on every attempt, so it is returned at once.

use super::traits::{Transport, TransportError, TransportResult};
use crate::account::Account;
use crate::platform::{Command, Receipt};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry settings (`[retry]` in the operator config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts, e.g. `"10s"`.
    #[serde(default = "default_delay", with = "humantime_serde")]
    pub delay: Duration,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_delay() -> Duration {
    Duration::from_secs(10)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: default_delay(),
        }
    }
}

impl RetryPolicy {
    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or `max_attempts` is used up. Zero attempts is treated as one.
    pub async fn run<F, Fut, T, E>(&self, mut operation: F, is_retryable: fn(&E) -> bool) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !is_retryable(&err) || attempt >= max_attempts {
                        return Err(err);
                    }

                    warn!(
                        attempt,
                        max_attempts,
                        delay = %humantime::format_duration(self.delay),
                        error = %err,
                        "attempt failed, retrying"
                    );

                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

pub fn is_transport_error_retryable(err: &TransportError) -> bool {
    matches!(err, TransportError::Unavailable(_))
}

/// Submit a command, retrying while the transport is unavailable.
pub async fn submit_with_retry<T: Transport + ?Sized>(
    transport: &T,
    policy: &RetryPolicy,
    caller: &Account,
    command: Command,
) -> TransportResult<Receipt> {
    policy
        .run(
            || transport.submit(caller, command.clone()),
            is_transport_error_retryable,
        )
        .await
}
