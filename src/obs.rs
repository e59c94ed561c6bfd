//! Optional observability helpers for the request pipeline and memoized lookups.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cinode_client.request` with the `method`
//!   and `path` fields, plus debug/warn events for retries, rate-limit waits, token exchanges
//!   and cache outcomes.
//! - Enable `metrics` to increment `cinode_client_request_total` (labeled by `outcome`),
//!   `cinode_client_retry_total` (labeled by `method`) and `cinode_client_cache_total`
//!   (labeled by `cache` + `outcome`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each pipeline execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to the pipeline.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for memoized lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
	/// Value served from the cache.
	Hit,
	/// Value computed by the underlying lookup.
	Miss,
	/// Value produced by a concurrent caller while this one waited.
	Coalesced,
}
impl CacheOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheOutcome::Hit => "hit",
			CacheOutcome::Miss => "miss",
			CacheOutcome::Coalesced => "coalesced",
		}
	}
}
impl Display for CacheOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
