//! Client-level error types shared across the pipeline, lookups, and aggregates.

// self
use crate::{_prelude::*, pipeline::CallSite};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any request is attempted.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Bearer credential is no longer valid; the request was not sent.
	#[error("Cinode API token is expired.")]
	CredentialExpired,
	/// Token endpoint refused to issue credentials.
	#[error("Cinode token endpoint rejected the credentials: {reason}.")]
	Authentication {
		/// Status line or message describing the rejection.
		reason: String,
	},
	/// Remote service answered with a non-success status.
	#[error(transparent)]
	Http(#[from] HttpError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error("Response from {url} could not be decoded.")]
	Decode {
		/// URL that produced the body.
		url: String,
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// Lookup yielded no match.
	#[error("Not found: {what}.")]
	NotFound {
		/// Description of the missing entity.
		what: String,
	},
	/// Lookup yielded more than one match where exactly one was required.
	#[error("Found too many matches for {what} (hits {hits}).")]
	TooManyMatches {
		/// Description of the ambiguous lookup.
		what: String,
		/// Number of matches reported by the remote service.
		hits: u64,
	},
	/// A cross-reference field that must be present was absent from a response.
	#[error("{context} is missing required field `{field}`.")]
	MissingRequiredField {
		/// Name of the absent field.
		field: &'static str,
		/// Entity description that lacked the field.
		context: String,
	},
	/// One failure handed to every caller that awaited the same memoized lookup.
	#[error(transparent)]
	Shared(Arc<Error>),
}
impl Error {
	/// Returns the HTTP status code when the error originates from a remote response.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Http(e) => Some(e.status),
			Self::Shared(e) => e.status(),
			_ => None,
		}
	}

	/// Returns the underlying error, looking through [`Error::Shared`].
	pub fn root(&self) -> &Error {
		match self {
			Self::Shared(e) => e.root(),
			e => e,
		}
	}

	pub(crate) fn missing_field(field: &'static str, context: impl Into<String>) -> Self {
		Self::MissingRequiredField { field, context: context.into() }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required setting is absent or empty.
	#[error("{key} environment variable is required.")]
	MissingSetting {
		/// Setting key.
		key: &'static str,
	},
	/// Setting is present but cannot be used.
	#[error("{key} is invalid: {reason}.")]
	InvalidSetting {
		/// Setting key.
		key: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
	/// Base URL cannot be parsed or joined.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Search query must be a JSON object so a page selector can be merged in.
	#[error("Search query must be a JSON object.")]
	InvalidQuery,
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Body(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Non-success response enriched with request details and the originating call site.
#[derive(Debug, ThisError)]
#[error("{status} {method} {url}\n---Source---\n{origin}")]
pub struct HttpError {
	/// HTTP status code returned by the remote service.
	pub status: u16,
	/// Request method.
	pub method: Method,
	/// Fully resolved request URL.
	pub url: String,
	/// Number of attempts made before giving up.
	pub attempts: u32,
	/// Call site captured before the request was suspended.
	pub origin: CallSite,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error on {method} {url}.\n---Source---\n{origin}")]
	Network {
		/// Request method.
		method: Method,
		/// Fully resolved request URL.
		url: String,
		/// Call site captured before the request was suspended.
		origin: CallSite,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Network failure while talking to the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	TokenEndpoint {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport failure observed on the token endpoint.
	pub fn token_endpoint(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::TokenEndpoint { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn http_error_message_leads_with_status_method_and_url() {
		let err = HttpError {
			status: 404,
			method: Method::GET,
			url: "https://api.cinode.app/v0.1/companies/1/users/2".into(),
			attempts: 1,
			origin: CallSite::capture(),
		};
		let message = err.to_string();

		assert!(message.starts_with("404 GET https://api.cinode.app/v0.1/companies/1/users/2"));
		assert!(message.contains("---Source---"));
		assert!(message.contains(file!()));
	}

	#[test]
	fn lookup_failures_stay_distinct() {
		let none = Error::NotFound { what: "user a@b.c".into() };
		let many = Error::TooManyMatches { what: "user a@b.c".into(), hits: 2 };

		assert_eq!(none.to_string(), "Not found: user a@b.c.");
		assert_eq!(many.to_string(), "Found too many matches for user a@b.c (hits 2).");
	}

	#[test]
	fn shared_failures_keep_the_underlying_error() {
		let shared = Error::Shared(Arc::new(Error::Shared(Arc::new(Error::NotFound {
			what: "user a@b.c".into(),
		}))));

		assert_eq!(shared.to_string(), "Not found: user a@b.c.");
		assert!(matches!(shared.root(), Error::NotFound { .. }));
		assert_eq!(shared.status(), None);
	}
}
