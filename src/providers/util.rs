use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often a request is re-sent after a transport error.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first one (total runs = 1 + retries)
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: usize, delay: Duration) -> Self {
        Self { retries, delay }
    }

    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// Only `Err` results are retried; a response with an error status is a
    /// successful send and comes back as is.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, reqwest::Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(err) => {
                    if attempt > self.retries {
                        return Err(err);
                    }
                    debug!(
                        "Attempt {}/{} failed: {}. Retrying...",
                        attempt,
                        self.retries + 1,
                        err
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn refused_request() -> Result<reqwest::Response, reqwest::Error> {
        // Port 1 is reserved and closed on test machines.
        reqwest::Client::new().get("http://127.0.0.1:1/").send().await
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));

        let result = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                refused_request()
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_success_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));

        let result = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, reqwest::Error>(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
