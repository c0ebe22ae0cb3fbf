use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::NotifyError;

/// Run `attempt` until it succeeds, retrying only rate-limit failures, at
/// most `max_attempts` times in total. The delay grows with each attempt.
pub async fn send_with_retry<F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<(), NotifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), NotifyError>>,
{
    let max_attempts = max_attempts.max(1);

    for n in 1..=max_attempts {
        match attempt().await {
            Ok(()) => return Ok(()),
            Err(NotifyError::RateLimited) if n < max_attempts => {
                warn!("Rate limited on attempt {}/{}, retrying", n, max_attempts);
                tokio::time::sleep(base_delay * n).await;
            }
            Err(e) => return Err(e),
        }
    }

    Err(NotifyError::RateLimited)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    async fn run_with(responses: Vec<Result<(), NotifyError>>, max: u32) -> (Result<(), NotifyError>, u32) {
        let calls = AtomicU32::new(0);
        let result = send_with_retry(max, Duration::ZERO, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as usize;
            let response = responses
                .get(n)
                .cloned()
                .unwrap_or(Err(NotifyError::RateLimited));
            async move { response }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let (result, calls) = run_with(vec![Ok(())], 3).await;
        assert_eq!(result, Ok(()));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_retries_rate_limits_then_succeeds() {
        let (result, calls) = run_with(
            vec![Err(NotifyError::RateLimited), Err(NotifyError::RateLimited), Ok(())],
            3,
        )
        .await;
        assert_eq!(result, Ok(()));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (result, calls) = run_with(vec![], 3).await;
        assert_eq!(result, Err(NotifyError::RateLimited));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_other_failures_are_not_retried() {
        let (result, calls) = tokio_test::block_on(run_with(
            vec![Err(NotifyError::Failed("missing access".to_string())), Ok(())],
            3,
        ));
        assert_eq!(result, Err(NotifyError::Failed("missing access".to_string())));
        assert_eq!(calls, 1);
    }
}
