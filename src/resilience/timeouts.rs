//! Deadline enforcement for callers.
//!
//! Uses Tokio's timeout facilities. Expiry drops the wrapped future, which
//! cancels any in-flight request it owns.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The wrapped operation did not finish in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation did not complete within {0:?}")]
pub struct DeadlineExceeded(pub Duration);

/// Run `fut` with an upper bound on its duration.
pub async fn with_deadline<F: Future>(
    deadline: Duration,
    fut: F,
) -> Result<F::Output, DeadlineExceeded> {
    tokio::time::timeout(deadline, fut).await.map_err(|_| {
        tracing::warn!(deadline_ms = deadline.as_millis() as u64, "Deadline exceeded");
        DeadlineExceeded(deadline)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let out = with_deadline(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let out = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .await;
        assert_eq!(out, Err(DeadlineExceeded(Duration::from_millis(20))));
    }
}
