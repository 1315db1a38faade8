use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Fixed-backoff retry: up to `retries` extra attempts after the first, sleeping
/// `delay` between each. `should_retry` decides whether a given error is transient.
pub async fn retry<T, E, Fut>(
    retries: u32,
    delay: Duration,
    should_retry: impl Fn(&E) -> bool,
    mut attempt: impl FnMut() -> Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts_made = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(error) if attempts_made < retries && should_retry(&error) => {
                attempts_made += 1;
                warn!(attempt = attempts_made, "attempt failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn retries_until_success_within_the_budget() {
        let attempts = Cell::new(0);
        let result: Result<i32, &str> = retry(3, Duration::from_millis(1), |_| true, || async {
            let count = attempts.get() + 1;
            attempts.set(count);
            if count < 3 {
                Err("transient")
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_exhausting_retries() {
        let attempts = Cell::new(0);
        let result: Result<i32, &str> = retry(2, Duration::from_millis(1), |_| true, || async {
            attempts.set(attempts.get() + 1);
            Err("always fails")
        })
        .await;
        assert_eq!(result, Err("always fails"));
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test]
    async fn does_not_retry_errors_the_predicate_rejects() {
        let attempts = Cell::new(0);
        let result: Result<i32, &str> = retry(3, Duration::from_millis(1), |_| false, || async {
            attempts.set(attempts.get() + 1);
            Err("permanent")
        })
        .await;
        assert_eq!(result, Err("permanent"));
        assert_eq!(attempts.get(), 1);
    }
}
