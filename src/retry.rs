//! Bounded retries around a whole training attempt.
use crate::*;
use std::future::Future;

/// How a retried run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An attempt returned normally.
    Completed { attempts: usize },
    /// Every attempt failed with a retryable error.
    Exhausted { attempts: usize },
}

/// Run `attempt` up to `num_retries + 1` times.
///
/// Unavailable and internal errors are logged and retried. Any other error
/// is returned at once. Running out of attempts is not an error: the caller
/// gets [`Outcome::Exhausted`] and decides what to do with it.
pub async fn retry<F, Fut>(num_retries: usize, mut attempt: F) -> TrainResult<Outcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TrainResult<()>>,
{
    for attempts in 1..=num_retries + 1 {
        match attempt().await {
            Ok(()) => return Ok(Outcome::Completed { attempts }),
            Err(e @ TrainError::Unavailable(_)) => {
                log::error!("caught unavailable error {}; will retry", e)
            }
            Err(e @ TrainError::Internal(_)) => {
                log::error!("caught internal error {}; will retry", e)
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Outcome::Exhausted {
        attempts: num_retries + 1,
    })
}
