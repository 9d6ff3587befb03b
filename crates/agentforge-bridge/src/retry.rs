//! Bootstrap-time connect retry (spec §4.5): 3 attempts, 1s/2s/4s backoff,
//! used when wiring a bridge or cross-resource client backed by a real
//! network dial. `InProcessExecutionBridge` never needs this itself — it's
//! exposed here for `agentforge-server`'s bootstrap sequence.

use agentforge_errors::ForgeError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

pub async fn connect_with_retry<F, Fut, T>(what: &str, mut attempt: F) -> Result<T, ForgeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ForgeError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut last_err = None;

    for attempt_number in 1..=MAX_ATTEMPTS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(target = what, attempt = attempt_number, error = %err, "connect attempt failed");
                last_err = Some(err);
                if attempt_number < MAX_ATTEMPTS {
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    Err(ForgeError::failed_precondition(format!(
        "{what} unavailable after {MAX_ATTEMPTS} attempts: {}",
        last_err.map(|e| e.to_string()).unwrap_or_default()
    )))
}
