//! Transport primitives shared by the pipeline and the session.
//!
//! The client never follows redirects on its own terms; it relies on reqwest's default
//! policy. Response metadata is extracted once per attempt so the retry policy can
//! consult the status and any `Retry-After` hint without holding the response.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Response,
	header::{HeaderMap, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::ConfigError};

/// Metadata captured from the most recent HTTP response of an attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the remote service.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Extracts status and retry hint from a response.
	pub fn from_response(response: &Response) -> Self {
		Self {
			status: Some(response.status().as_u16()),
			retry_after: parse_retry_after(response.headers()),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with an overall per-request timeout.
	///
	/// Without a timeout a hung transport is bounded by nothing; callers that need a bound
	/// must configure one here or impose it externally.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

/// Parses a `Retry-After` header given either as delta-seconds or as an HTTP date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return delta.try_into().ok();
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	fn headers(value: &str) -> HeaderMap {
		let mut map = HeaderMap::new();

		map.insert(RETRY_AFTER, HeaderValue::from_str(value).expect("Header value should parse."));

		map
	}

	#[test]
	fn retry_after_accepts_delta_seconds() {
		assert_eq!(parse_retry_after(&headers("120")), Some(Duration::from_secs(120)));
		assert_eq!(parse_retry_after(&headers(" 7 ")), Some(Duration::from_secs(7)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		assert_eq!(parse_retry_after(&headers("Wed, 21 Oct 2015 07:28:00 +0000")), None);
		assert_eq!(parse_retry_after(&headers("soon")), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}
}
