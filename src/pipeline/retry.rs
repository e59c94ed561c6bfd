//! Retry policy: which failures are retried and how long to back off between attempts.

// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, http::ResponseMetadata};

/// Per-call declaration of whether a request may be repeated.
///
/// Retry-safety is a property of the logical operation, not of its verb: a search issued as
/// POST is read-only and may be marked [`Retryability::Safe`], while a mutating POST keeps the
/// default and is attempted exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Retryability {
	/// Retry idempotent verbs (GET, HEAD, OPTIONS, PUT, DELETE, PATCH, TRACE); never POST.
	#[default]
	ByMethod,
	/// Caller vouches that repeating the request has no further side effect.
	Safe,
	/// Never retry, whatever the verb.
	Never,
}
impl Retryability {
	/// Returns `true` if a request with `method` may be retried under this declaration.
	pub fn allows(self, method: &Method) -> bool {
		match self {
			Self::ByMethod => matches!(
				*method,
				Method::GET
					| Method::HEAD
					| Method::OPTIONS
					| Method::PUT
					| Method::DELETE
					| Method::PATCH
					| Method::TRACE
			),
			Self::Safe => true,
			Self::Never => false,
		}
	}
}

/// Bounded backoff applied to retryable failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Retries after the first attempt.
	pub limit: u32,
	/// Delay before the first retry; doubled for each further retry.
	pub base_delay: Duration,
	/// Upper bound for random noise added to computed delays.
	pub jitter: Duration,
	/// Upper bound for any single delay, including server-provided `Retry-After` hints.
	pub max_delay: Duration,
	/// Response statuses treated as transient.
	pub statuses: Vec<u16>,
}
impl RetryPolicy {
	/// Default retry limit.
	pub const DEFAULT_LIMIT: u32 = 10;
	/// Individual delays never exceed ten minutes, even if the server asks for more.
	pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10 * 60);
	/// Statuses retried by default.
	pub const DEFAULT_STATUSES: [u16; 10] = [408, 413, 429, 500, 502, 503, 504, 521, 522, 524];
	/// Statuses whose `Retry-After` hint is honored.
	pub const RETRY_AFTER_STATUSES: [u16; 3] = [413, 429, 503];

	/// Policy that never retries.
	pub fn none() -> Self {
		Self { limit: 0, ..Self::default() }
	}

	/// Overrides the retry limit.
	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = limit;

		self
	}

	/// Overrides the base delay and disables jitter; intended for tests and tight loops.
	pub fn with_base_delay(mut self, delay: Duration) -> Self {
		self.base_delay = delay;
		self.jitter = Duration::ZERO;

		self
	}

	/// Overrides the cap applied to every delay.
	pub fn with_max_delay(mut self, delay: Duration) -> Self {
		self.max_delay = delay;

		self
	}

	/// Returns `true` if the status is considered transient.
	pub fn retries_status(&self, status: u16) -> bool {
		self.statuses.contains(&status)
	}

	/// Returns `true` if a transport error is worth another attempt.
	pub fn retries_transport(&self, error: &ReqwestError) -> bool {
		error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
	}

	/// Computes the delay before retry number `retry` (1-based).
	pub fn delay_for(&self, retry: u32, meta: Option<&ResponseMetadata>) -> Duration {
		let hinted = meta.and_then(|meta| match (meta.status, meta.retry_after) {
			(Some(status), Some(after)) if Self::RETRY_AFTER_STATUSES.contains(&status) => Some(after),
			_ => None,
		});
		let delay = hinted.unwrap_or_else(|| {
			let exponent = retry.saturating_sub(1).min(31);
			let backoff = self.base_delay.saturating_mul(1_u32 << exponent);

			backoff.saturating_add(self.noise())
		});

		delay.min(self.max_delay)
	}

	fn noise(&self) -> Duration {
		if self.jitter.is_zero() {
			return Duration::ZERO;
		}

		let max = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);

		Duration::from_millis(rand::rng().random_range(0..=max))
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			limit: Self::DEFAULT_LIMIT,
			base_delay: Duration::from_secs(1),
			jitter: Duration::from_millis(100),
			max_delay: Self::DEFAULT_MAX_DELAY,
			statuses: Self::DEFAULT_STATUSES.to_vec(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retryability_is_declared_not_inferred() {
		assert!(Retryability::ByMethod.allows(&Method::GET));
		assert!(Retryability::ByMethod.allows(&Method::PATCH));
		assert!(!Retryability::ByMethod.allows(&Method::POST));
		assert!(Retryability::Safe.allows(&Method::POST));
		assert!(!Retryability::Never.allows(&Method::GET));
	}

	#[test]
	fn backoff_doubles_and_is_capped() {
		let policy = RetryPolicy::default()
			.with_base_delay(Duration::from_secs(1))
			.with_max_delay(Duration::from_secs(60));

		assert_eq!(policy.delay_for(1, None), Duration::from_secs(1));
		assert_eq!(policy.delay_for(2, None), Duration::from_secs(2));
		assert_eq!(policy.delay_for(4, None), Duration::from_secs(8));
		assert_eq!(policy.delay_for(10, None), Duration::from_secs(60));
	}

	#[test]
	fn retry_after_hint_is_honored_but_capped() {
		let policy = RetryPolicy::default().with_base_delay(Duration::from_millis(5));
		let throttled =
			ResponseMetadata { status: Some(429), retry_after: Some(Duration::from_secs(30)) };
		let too_long =
			ResponseMetadata { status: Some(503), retry_after: Some(Duration::from_secs(3_600)) };
		let ignored =
			ResponseMetadata { status: Some(500), retry_after: Some(Duration::from_secs(30)) };

		assert_eq!(policy.delay_for(1, Some(&throttled)), Duration::from_secs(30));
		assert_eq!(policy.delay_for(1, Some(&too_long)), RetryPolicy::DEFAULT_MAX_DELAY);
		assert_eq!(policy.delay_for(1, Some(&ignored)), Duration::from_millis(5));
	}

	#[test]
	fn jitter_stays_within_bounds() {
		let policy = RetryPolicy::default();

		for _ in 0..32 {
			let delay = policy.delay_for(1, None);

			assert!(delay >= Duration::from_secs(1));
			assert!(delay <= Duration::from_millis(1_100));
		}
	}

	#[test]
	fn default_statuses_cover_throttling_and_gateway_errors() {
		let policy = RetryPolicy::default();

		assert!(policy.retries_status(429));
		assert!(policy.retries_status(503));
		assert!(!policy.retries_status(400));
		assert!(!policy.retries_status(404));
	}
}
