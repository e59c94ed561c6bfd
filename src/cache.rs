//! Time-bounded memoization with request coalescing.
//!
//! One generic [`Memoized`] cache backs every slow-changing lookup; instances differ only in
//! TTL and key/value types. Concurrent callers for the same key join one in-flight lookup: the
//! first performs it and the rest wait on the flight's guard, then take its value from the cache
//! or its failure from the flight. Failures are never cached; a caller arriving after the flight
//! has landed retries the lookup.

// crates.io
use tokio::time::Instant;
// self
use crate::{
	_prelude::*,
	obs::{self, CacheOutcome},
};

/// Identity mappings (user id ↔ e-mail) rarely change.
pub const EMAIL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Pipeline configuration changes occasionally.
pub const PIPELINE_TTL: Duration = Duration::from_secs(60);
/// Profile images change rarely but are cheap to refetch.
pub const IMAGE_URL_TTL: Duration = Duration::from_secs(24 * 60);
/// Project staffing changes frequently.
pub const TEAM_MATES_TTL: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Entry<V> {
	value: V,
	expires_at: Instant,
}

#[derive(Debug, Default)]
struct Flight {
	lock: AsyncMutex<()>,
	failure: Mutex<Option<Arc<Error>>>,
}

#[derive(Debug, Default)]
struct Slot {
	flight: Arc<Flight>,
	riders: usize,
}

/// One caller's seat on a flight; leaving drops the flight from the map once the last rider is
/// gone, whether that rider finished or was cancelled.
struct Landing<'a, K, V>
where
	K: Clone + Eq + Hash,
	V: Clone,
{
	cache: &'a Memoized<K, V>,
	key: K,
	flight: Arc<Flight>,
}
impl<K, V> Drop for Landing<'_, K, V>
where
	K: Clone + Eq + Hash,
	V: Clone,
{
	fn drop(&mut self) {
		let mut flights = self.cache.flights.lock();
		let Some(slot) = flights.get_mut(&self.key) else { return };

		if !Arc::ptr_eq(&slot.flight, &self.flight) {
			return;
		}

		slot.riders -= 1;

		if slot.riders == 0 {
			flights.remove(&self.key);
		}
	}
}

/// Generic coalescing cache keyed by `K` with a fixed time-to-live.
pub struct Memoized<K, V> {
	name: &'static str,
	ttl: Duration,
	entries: Mutex<HashMap<K, Entry<V>>>,
	flights: Mutex<HashMap<K, Slot>>,
}
impl<K, V> Memoized<K, V>
where
	K: Clone + Eq + Hash,
	V: Clone,
{
	/// Creates an empty cache; `name` labels observability output.
	pub fn new(name: &'static str, ttl: Duration) -> Self {
		Self { name, ttl, entries: Default::default(), flights: Default::default() }
	}

	/// Label used in logs and metrics.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Time-to-live applied to freshly stored values.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Returns the cached value for `key`, or computes and stores it.
	///
	/// Concurrent calls for the same key share one computation and its outcome. When the
	/// computation fails and other callers were waiting on it, everyone (the caller that ran it
	/// included) receives the failure as [`Error::Shared`]; a lone caller gets the error as is.
	/// The key stays uncached either way.
	pub async fn get_or_try_insert_with<F, Fut>(&self, key: K, compute: F) -> Result<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V>>,
	{
		if let Some(value) = self.fresh(&key) {
			obs::record_cache_outcome(self.name, CacheOutcome::Hit);

			return Ok(value);
		}

		let landing = self.board(&key);
		let flight = &landing.flight;
		let _singleflight = flight.lock.lock().await;

		if let Some(value) = self.fresh(&key) {
			obs::record_cache_outcome(self.name, CacheOutcome::Coalesced);

			return Ok(value);
		}

		let failure = flight.failure.lock().clone();

		if let Some(failure) = failure {
			obs::record_cache_outcome(self.name, CacheOutcome::Coalesced);

			return Err(Error::Shared(failure));
		}

		obs::record_cache_outcome(self.name, CacheOutcome::Miss);

		match compute().await {
			Ok(value) => {
				self.entries.lock().insert(
					key,
					Entry { value: value.clone(), expires_at: Instant::now() + self.ttl },
				);

				Ok(value)
			},
			Err(e) => {
				self.entries.lock().remove(&key);
				obs::debug_event("memoized lookup failed; not caching", self.name);

				if self.ground(&key, flight) {
					let failure = Arc::new(e);

					*flight.failure.lock() = Some(failure.clone());

					Err(Error::Shared(failure))
				} else {
					Err(e)
				}
			},
		}
	}

	/// Returns the cached value if it has not expired, evicting it otherwise.
	pub fn peek(&self, key: &K) -> Option<V> {
		self.fresh(key)
	}

	/// Drops the entry for `key`.
	pub fn invalidate(&self, key: &K) {
		self.entries.lock().remove(key);
	}

	/// Drops every entry.
	pub fn clear(&self) {
		self.entries.lock().clear();
	}

	/// Number of stored entries, including expired ones not yet evicted.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Returns `true` if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	fn fresh(&self, key: &K) -> Option<V> {
		let mut entries = self.entries.lock();

		match entries.get(key) {
			Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	fn board(&self, key: &K) -> Landing<'_, K, V> {
		let mut flights = self.flights.lock();
		let slot = flights.entry(key.clone()).or_default();

		slot.riders += 1;

		Landing { cache: self, key: key.clone(), flight: slot.flight.clone() }
	}

	/// Detaches a failed flight so later callers start over; returns `true` when other callers
	/// already boarded it.
	fn ground(&self, key: &K, flight: &Arc<Flight>) -> bool {
		let mut flights = self.flights.lock();

		match flights.get(key) {
			Some(slot) if Arc::ptr_eq(&slot.flight, flight) => {
				let shared = slot.riders > 1;

				flights.remove(key);

				shared
			},
			_ => false,
		}
	}
}
impl<K, V> Debug for Memoized<K, V> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Memoized")
			.field("name", &self.name)
			.field("ttl", &self.ttl)
			.field("entries", &self.entries.lock().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use tokio::time;
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn concurrent_lookups_for_one_key_are_coalesced() {
		let cache = Arc::new(Memoized::<String, u64>::new("test", Duration::from_secs(60)));
		let calls = Arc::new(AtomicUsize::new(0));
		let mut handles = Vec::new();

		for _ in 0..8 {
			let cache = cache.clone();
			let calls = calls.clone();

			handles.push(tokio::spawn(async move {
				cache
					.get_or_try_insert_with("a@example.com".to_owned(), || async {
						calls.fetch_add(1, Ordering::SeqCst);
						time::sleep(Duration::from_millis(100)).await;

						Ok(42)
					})
					.await
			}));
		}

		for handle in handles {
			let value = handle.await.expect("Lookup task should not panic.");

			assert_eq!(value.expect("Lookup should succeed."), 42);
		}

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(cache.flights.lock().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn entries_expire_after_ttl() {
		let cache = Memoized::<(), &'static str>::new("pipelines", Duration::from_secs(60));
		let calls = AtomicUsize::new(0);
		let lookup = || async {
			calls.fetch_add(1, Ordering::SeqCst);

			Ok("pipelines")
		};

		cache.get_or_try_insert_with((), lookup).await.expect("First lookup should succeed.");
		time::advance(Duration::from_secs(30)).await;
		cache.get_or_try_insert_with((), lookup).await.expect("Cached lookup should succeed.");

		assert_eq!(calls.load(Ordering::SeqCst), 1);

		time::advance(Duration::from_secs(31)).await;

		assert_eq!(cache.peek(&()), None);

		cache.get_or_try_insert_with((), lookup).await.expect("Expired lookup should succeed.");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn failures_are_not_cached() {
		let cache = Memoized::<u64, String>::new("emails", Duration::from_secs(60));
		let err = cache
			.get_or_try_insert_with(1, || async {
				Err(Error::NotFound { what: "user 1".into() })
			})
			.await
			.expect_err("First lookup should fail.");

		assert!(matches!(err, Error::NotFound { .. }));
		assert!(cache.is_empty());

		let value = cache
			.get_or_try_insert_with(1, || async { Ok("a@example.com".to_owned()) })
			.await
			.expect("Retry should succeed.");

		assert_eq!(value, "a@example.com");
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_failing_lookups_share_one_failure() {
		let cache = Arc::new(Memoized::<u64, String>::new("emails", Duration::from_secs(60)));
		let calls = Arc::new(AtomicUsize::new(0));
		let mut handles = Vec::new();

		for _ in 0..5 {
			let cache = cache.clone();
			let calls = calls.clone();

			handles.push(tokio::spawn(async move {
				cache
					.get_or_try_insert_with(1, || async {
						calls.fetch_add(1, Ordering::SeqCst);
						time::sleep(Duration::from_millis(100)).await;

						Err(Error::NotFound { what: "user 1".into() })
					})
					.await
			}));
		}

		for handle in handles {
			let result = handle.await.expect("Lookup task should not panic.");
			let err = result.expect_err("Every waiter should see the failure.");

			assert!(matches!(err, Error::Shared(_)));
			assert!(matches!(err.root(), Error::NotFound { .. }));
		}

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(cache.is_empty());
		assert!(cache.flights.lock().is_empty());

		let value = cache
			.get_or_try_insert_with(1, || async { Ok("a@example.com".to_owned()) })
			.await
			.expect("A later lookup should start over.");

		assert_eq!(value, "a@example.com");
	}

	#[tokio::test(start_paused = true)]
	async fn cancelled_waiters_leave_no_flight_behind() {
		let cache = Arc::new(Memoized::<u64, u64>::new("ids", Duration::from_secs(60)));
		let owner = {
			let cache = cache.clone();

			tokio::spawn(async move {
				cache
					.get_or_try_insert_with(1, || async {
						time::sleep(Duration::from_millis(100)).await;

						Ok(10)
					})
					.await
			})
		};
		let waiter = {
			let cache = cache.clone();

			tokio::spawn(async move { cache.get_or_try_insert_with(1, || async { Ok(11) }).await })
		};

		time::sleep(Duration::from_millis(10)).await;

		assert_eq!(cache.flights.lock().get(&1).map(|slot| slot.riders), Some(2));

		waiter.abort();

		assert!(waiter.await.expect_err("Waiter should be cancelled.").is_cancelled());
		assert_eq!(owner.await.expect("Owner should not panic.").expect("Owner should succeed."), 10);
		assert!(cache.flights.lock().is_empty());

		let owner = {
			let cache = cache.clone();

			tokio::spawn(async move {
				cache
					.get_or_try_insert_with(2, || async {
						time::sleep(Duration::from_millis(100)).await;

						Ok(20)
					})
					.await
			})
		};

		time::sleep(Duration::from_millis(10)).await;
		owner.abort();

		assert!(owner.await.expect_err("Owner should be cancelled.").is_cancelled());
		assert!(cache.flights.lock().is_empty());
		assert_eq!(cache.peek(&2), None);
	}

	#[tokio::test]
	async fn keys_are_independent() {
		let cache = Memoized::<u64, u64>::new("ids", Duration::from_secs(60));

		for key in 0..3 {
			let value = cache
				.get_or_try_insert_with(key, || async move { Ok(key * 10) })
				.await
				.expect("Lookup should succeed.");

			assert_eq!(value, key * 10);
		}

		cache.invalidate(&1);

		assert_eq!(cache.peek(&0), Some(0));
		assert_eq!(cache.peek(&1), None);
		assert_eq!(cache.peek(&2), Some(20));
	}
}
