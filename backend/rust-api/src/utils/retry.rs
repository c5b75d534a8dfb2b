use std::time::Duration;

#[derive(Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_max: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(500),
            jitter_max: Some(Duration::from_millis(50)),
        }
    }
}

impl RetryConfig {
    /// For writes that must not be dropped lightly (submission records).
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(1000),
            jitter_max: Some(Duration::from_millis(100)),
        }
    }
}

/// Runs `f` until it succeeds or `max_attempts` is exhausted, sleeping with
/// doubling backoff (plus jitter) between attempts. Returns the last error.
pub async fn retry_with_config<F, Fut, T, E>(config: RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempts_left = config.max_attempts;
    let mut backoff = config.base_backoff;

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempts_left = attempts_left.saturating_sub(1);
                if attempts_left == 0 {
                    return Err(err);
                }

                let jitter = match config.jitter_max {
                    Some(max) if max.as_millis() > 0 => {
                        Duration::from_millis(rand::random::<u64>() % (max.as_millis() as u64 + 1))
                    }
                    _ => Duration::ZERO,
                };
                tokio::time::sleep(backoff + jitter).await;
                backoff = std::cmp::min(backoff * 2, config.max_backoff);
            }
        }
    }
}
