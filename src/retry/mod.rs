use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Attempt ceiling for a single step. Counts every attempt, the first one
/// included, and is never shared between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryBudget {
    max_attempts: u32,
}

impl RetryBudget {
    /// A budget of `max_attempts` total attempts; zero is raised to one.
    pub const fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// One initial attempt plus `retries` more.
    pub const fn with_retries(retries: u32) -> Self {
        Self::attempts(retries.saturating_add(1))
    }

    pub const fn max_attempts(self) -> u32 {
        self.max_attempts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    /// The predicate accepted `value` on attempt number `attempts`.
    Accepted { value: T, attempts: u32 },
    /// Every attempt was rejected; `last` is what the final attempt produced.
    Exhausted { last: T, attempts: u32 },
}

impl<T> RetryOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Accepted { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The accepted value, or the last rejected one.
    pub fn into_value(self) -> T {
        match self {
            Self::Accepted { value, .. } => value,
            Self::Exhausted { last, .. } => last,
        }
    }
}

/// Runs `action` until `accept` approves its output or the budget runs out.
///
/// `action` receives the 1-based attempt number. An `Err` from `action` ends
/// the loop at once and is returned unchanged; only rejected values are
/// retried. Attempts run strictly one after another.
pub async fn retry_until<T, E, Act, Fut, Pred>(
    step: &'static str,
    budget: RetryBudget,
    mut action: Act,
    mut accept: Pred,
) -> Result<RetryOutcome<T>, E>
where
    Act: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Pred: FnMut(&T) -> bool,
{
    let max_attempts = budget.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let value = action(attempt).await?;

        if accept(&value) {
            return Ok(RetryOutcome::Accepted {
                value,
                attempts: attempt,
            });
        }

        if attempt >= max_attempts {
            warn!(step, attempt, max_attempts, "retry budget exhausted");
            return Ok(RetryOutcome::Exhausted {
                last: value,
                attempts: attempt,
            });
        }

        warn!(step, attempt, max_attempts, "attempt rejected, retrying");
    }
}
