// Retry wrapper for Drive API calls

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::types::AppResult;

/// Run `operation` up to `max_attempts` times with a fixed delay between
/// attempts. Only transient errors are retried; permanent rejections
/// (validation, auth, 4xx) surface immediately.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    max_attempts: u32,
    delay: Duration,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) if error.is_transient() && attempt < max_attempts => {
                warn!(attempt, %error, "attempt failed, retrying");
                sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
