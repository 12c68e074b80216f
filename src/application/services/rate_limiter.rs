//! Sliding-window request admission.
//!
//! Counts requests in a trailing time window, avoiding the boundary bursts
//! of fixed windows. One limiter instance guards the whole service; there
//! is no per-caller partitioning.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::clock::Clock;

/// Admission failure.
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Capacity is exhausted; retry once `retry_after` has elapsed.
    #[error("rate limit exhausted, retry after {retry_after:?}")]
    Exhausted { retry_after: Duration },

    /// The counter state is unusable. Callers must decide a fail-open or
    /// fail-closed policy; the middleware in this service fails closed.
    #[error("rate limiter internal failure")]
    Internal,
}

/// Admits unit-weight requests against a capacity budget over a trailing
/// window.
///
/// The purge-count-record sequence runs under one mutex, so concurrent
/// callers can never jointly exceed the capacity.
pub struct SlidingWindowLimiter<C> {
    capacity: usize,
    window: chrono::Duration,
    clock: C,
    hits: Mutex<VecDeque<DateTime<Utc>>>,
}

impl<C: Clock> SlidingWindowLimiter<C> {
    /// Creates a limiter admitting `capacity` requests per `window`.
    pub fn new(capacity: usize, window: Duration, clock: C) -> Self {
        Self {
            capacity,
            window: chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX),
            clock,
            hits: Mutex::new(VecDeque::new()),
        }
    }

    /// Admits or rejects one request.
    ///
    /// # Errors
    ///
    /// - [`RateLimitError::Exhausted`] with the minimum wait until the next
    ///   admissible slot when over capacity
    /// - [`RateLimitError::Internal`] when the counter state is poisoned
    pub fn check(&self) -> Result<(), RateLimitError> {
        let now = self.clock.now();
        let cutoff = now - self.window;

        let mut hits = self.hits.lock().map_err(|_| RateLimitError::Internal)?;

        while hits.front().is_some_and(|t| *t <= cutoff) {
            hits.pop_front();
        }

        if hits.len() < self.capacity {
            hits.push_back(now);
            return Ok(());
        }

        // The oldest in-window hit determines when a slot frees up.
        let retry_after = match hits.front() {
            Some(oldest) => (*oldest + self.window - now)
                .to_std()
                .unwrap_or(Duration::ZERO),
            None => self.window.to_std().unwrap_or(Duration::ZERO),
        };

        Err(RateLimitError::Exhausted { retry_after })
    }
}
