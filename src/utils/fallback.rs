//! Ordered fallback over independent attempts
//!
//! Each attempt gets its own deadline. The first success wins; timeouts and
//! errors move on to the next candidate. There is no retry of a candidate.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::debug;

/// Try `attempt` on every candidate in order and return the first success.
///
/// `None` means every candidate failed or timed out.
pub async fn first_success<C, T, E, F, Fut>(
    candidates: &[C],
    per_call_timeout: Duration,
    mut attempt: F,
) -> Option<T>
where
    C: Display,
    E: Display,
    F: FnMut(&C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for candidate in candidates {
        match tokio::time::timeout(per_call_timeout, attempt(candidate)).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(e)) => debug!("{} failed: {}", candidate, e),
            Err(_) => debug!("{} timed out after {:?}", candidate, per_call_timeout),
        }
    }
    None
}
