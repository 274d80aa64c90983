//! Fixed-delay retry for address-search attempts.
//!
//! Unresolved addresses are common in the upstream feed (legacy lot-number
//! forms, typos), and the provider occasionally answers a valid address on a
//! second attempt. [`retry_until_resolved`] therefore retries BOTH transient
//! transport errors and empty (not-found) results, with a short fixed delay,
//! and settles on the last outcome once the budget is spent.

use std::future::Future;
use std::time::Duration;

use crate::error::GeocodeError;

/// Returns `true` for errors that are worth retrying after the fixed delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429: the provider has asked us to back off.
/// - HTTP 5xx: transient server/infrastructure errors.
///
/// **Not retriable (returned immediately):**
/// - Other HTTP statuses (401/403 key problems, 400 bad request).
/// - [`GeocodeError::Deserialize`] / [`GeocodeError::InvalidCoordinate`] —
///   malformed responses; retrying won't fix them.
pub(crate) fn is_retriable(err: &GeocodeError) -> bool {
    match err {
        GeocodeError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
        }
        GeocodeError::Deserialize { .. }
        | GeocodeError::InvalidCoordinate { .. }
        | GeocodeError::InvalidBaseUrl(_) => false,
    }
}

/// Runs `operation` until it yields a value, retrying not-found results and
/// transient errors up to `max_retries` additional attempts with a fixed
/// `delay` between attempts.
///
/// After the budget is exhausted the last outcome is returned as-is:
/// `Ok(None)` when the address simply did not resolve, or the final error
/// for a persistent transport failure. Non-retriable errors short-circuit.
pub(crate) async fn retry_until_resolved<T, F, Fut>(
    max_retries: u32,
    delay: Duration,
    mut operation: F,
) -> Result<Option<T>, GeocodeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, GeocodeError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {
                if attempt >= max_retries {
                    return Ok(None);
                }
                tracing::debug!(attempt, max_retries, "address not resolved — retrying");
            }
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_retries,
                    error = %err,
                    "transient geocoder error — retrying after fixed delay"
                );
            }
        }
        attempt += 1;
        tokio::time::sleep(delay).await;
    }
}
