// self
use crate::{
	_prelude::*,
	obs::{CacheOutcome, RequestOutcome},
};

/// Records a pipeline outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("cinode_client_request_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a retry for the given method.
pub fn record_retry(method: &Method) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("cinode_client_retry_total", "method" => method.as_str().to_owned())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = method;
	}
}

/// Records a memoized lookup outcome for the named cache.
pub fn record_cache_outcome(cache: &'static str, outcome: CacheOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cinode_client_cache_total",
			"cache" => cache,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (cache, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_request_outcome(RequestOutcome::Failure);
		record_retry(&Method::GET);
		record_cache_outcome("emails", CacheOutcome::Hit);
	}
}
