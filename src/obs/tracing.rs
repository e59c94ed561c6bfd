// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span wrapping one pipeline execution, including all of its retries.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the request method + path.
	pub fn new(method: &Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("cinode_client.request", method = %method, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event with a short detail string.
pub fn debug_event(message: &'static str, detail: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(detail, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (message, detail);
	}
}

/// Emits a warning when an attempt failed and is about to be retried.
pub fn warn_retry(method: &Method, url: &str, attempt: u32, delay: Duration, reason: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%method, url, attempt, delay_ms = delay.as_millis() as u64, reason, "retrying request");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, url, attempt, delay, reason);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new(&Method::GET, "/v0.1/companies/1/users");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn events_are_noops_without_subscriber() {
		debug_event("test", "detail");
		warn_retry(&Method::POST, "https://example.com", 1, Duration::from_millis(5), "503");
	}
}
