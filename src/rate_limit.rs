//! Fixed-window admission gate for outbound requests.
//!
//! The limiter combines three independent constraints, all enforced inside one serialized
//! admission routine:
//!
//! - a reservoir of `reservoir` admissions that is replaced (not topped up) once per
//!   `window`; when it is empty callers wait for the next window boundary,
//! - an optional cap on requests in flight, released when the [`Ticket`] is dropped,
//! - an optional minimum spacing between consecutive admissions.
//!
//! Admission is FIFO: waiters queue on a fair async mutex, and only the head of the queue
//! inspects and decrements the budget. The fixed window is an approximation of the remote
//! quota; if the remote actually enforces a sliding window, up to twice the reservoir can
//! be admitted across a window boundary.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use tokio::{
	sync::{Mutex as FairMutex, OwnedSemaphorePermit, Semaphore},
	time::{self, Instant},
};
// self
use crate::{_prelude::*, obs};

/// Limits applied by a [`RateLimiter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
	/// Admissions granted per window.
	pub reservoir: u32,
	/// Length of one fixed window.
	pub window: Duration,
	/// Maximum requests in flight, if bounded.
	pub max_concurrent: Option<usize>,
	/// Minimum delay between the starts of consecutive admissions.
	pub min_spacing: Duration,
}
impl RateLimitConfig {
	/// Remote allows 40 requests per 2 s window; stay a few below to absorb clock skew.
	pub const DEFAULT_RESERVOIR: u32 = 35;
	/// Length of the remote quota window.
	pub const DEFAULT_WINDOW: Duration = Duration::from_millis(2_000);
	/// The remote throttles aggressively above this many parallel requests.
	pub const DEFAULT_MAX_CONCURRENT: usize = 20;
	/// Spacing applied between queued requests.
	pub const DEFAULT_MIN_SPACING: Duration = Duration::from_millis(200);

	/// Creates a config with only the fixed-window reservoir enabled.
	pub fn new(reservoir: u32, window: Duration) -> Self {
		Self { reservoir, window, max_concurrent: None, min_spacing: Duration::ZERO }
	}

	/// Bounds the number of requests in flight.
	pub fn with_max_concurrent(mut self, max: usize) -> Self {
		self.max_concurrent = Some(max);

		self
	}

	/// Sets the minimum spacing between admissions.
	pub fn with_min_spacing(mut self, spacing: Duration) -> Self {
		self.min_spacing = spacing;

		self
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self::new(Self::DEFAULT_RESERVOIR, Self::DEFAULT_WINDOW)
			.with_max_concurrent(Self::DEFAULT_MAX_CONCURRENT)
			.with_min_spacing(Self::DEFAULT_MIN_SPACING)
	}
}

#[derive(Debug)]
struct Budget {
	available: u32,
	window_start: Instant,
	last_admission: Option<Instant>,
}
impl Budget {
	fn refill(&mut self, now: Instant, config: &RateLimitConfig) {
		if config.window.is_zero() {
			self.available = config.reservoir;
			self.window_start = now;

			return;
		}

		let elapsed = now.saturating_duration_since(self.window_start);

		if elapsed < config.window {
			return;
		}

		// Align to the most recent window boundary so refills happen exactly once per window.
		let into_window = elapsed.as_nanos() % config.window.as_nanos();

		self.window_start = now - Duration::from_nanos(into_window as u64);
		self.available = config.reservoir;
	}
}

/// Proof of admission; holds a concurrency slot until dropped.
#[derive(Debug)]
pub struct Ticket {
	_slot: Option<OwnedSemaphorePermit>,
}

/// Admission gate shared by every request issued through a pipeline.
#[derive(Debug)]
pub struct RateLimiter {
	config: RateLimitConfig,
	budget: FairMutex<Budget>,
	slots: Option<Arc<Semaphore>>,
	admitted: AtomicU64,
}
impl RateLimiter {
	/// Creates a limiter whose first window starts now with a full reservoir.
	pub fn new(config: RateLimitConfig) -> Self {
		let budget = Budget {
			available: config.reservoir,
			window_start: Instant::now(),
			last_admission: None,
		};
		let slots = config.max_concurrent.map(|max| Arc::new(Semaphore::new(max)));

		Self { config, budget: FairMutex::new(budget), slots, admitted: AtomicU64::new(0) }
	}

	/// Returns the active limits.
	pub fn config(&self) -> &RateLimitConfig {
		&self.config
	}

	/// Total admissions granted since construction.
	pub fn admitted(&self) -> u64 {
		self.admitted.load(Ordering::Relaxed)
	}

	/// Free concurrency slots, or `None` when concurrency is unbounded.
	pub fn available_slots(&self) -> Option<usize> {
		self.slots.as_ref().map(|slots| slots.available_permits())
	}

	/// Suspends until one request may proceed. Never rejects; only delays.
	pub async fn admit(&self) -> Ticket {
		// Holding the fair mutex for the whole routine keeps check-and-decrement atomic with
		// respect to every other queued caller and preserves FIFO order.
		let mut budget = self.budget.lock().await;
		let slot = match &self.slots {
			Some(slots) => slots.clone().acquire_owned().await.ok(),
			None => None,
		};

		loop {
			let now = Instant::now();

			budget.refill(now, &self.config);

			if let Some(last) = budget.last_admission {
				let ready_at = last + self.config.min_spacing;

				if ready_at > now {
					time::sleep_until(ready_at).await;

					continue;
				}
			}
			if budget.available == 0 {
				let next_window = budget.window_start + self.config.window;

				obs::debug_event(
					"rate limit reservoir exhausted; waiting for next window",
					&format!("{:?}", next_window.saturating_duration_since(now)),
				);
				time::sleep_until(next_window).await;

				continue;
			}

			budget.available -= 1;
			budget.last_admission = Some(now);

			break;
		}

		self.admitted.fetch_add(1, Ordering::Relaxed);

		Ticket { _slot: slot }
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(RateLimitConfig::default())
	}
}
