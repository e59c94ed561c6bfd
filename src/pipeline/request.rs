//! Declarative description of one logical API call.

// self
use crate::{_prelude::*, pipeline::Retryability};

/// Media type used by endpoints that accept JSON-patch style payloads.
pub const JSON_PATCH: &str = "application/json-patch+json";

/// Method, path, body, and per-call policy for a single request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the API base URL (no leading slash).
	pub path: String,
	/// Optional JSON body.
	pub body: Option<Value>,
	/// Overrides the `Content-Type` header sent with the body.
	pub content_type: Option<&'static str>,
	/// Whether the pipeline may repeat this call on transient failures.
	pub retry: Retryability,
}
impl RequestSpec {
	/// Creates a spec with the default, method-derived retry policy.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		let path = path.into();
		let path = path.trim_start_matches('/').to_owned();

		Self { method, path, body: None, content_type: None, retry: Retryability::default() }
	}

	/// `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// `POST` request; not retried unless marked with [`RequestSpec::retry_safe`].
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Attaches a JSON body.
	pub fn json(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Overrides the body content type.
	pub fn content_type(mut self, content_type: &'static str) -> Self {
		self.content_type = Some(content_type);

		self
	}

	/// Declares the call read-only so it is retried regardless of its verb.
	pub fn retry_safe(self) -> Self {
		self.with_retry(Retryability::Safe)
	}

	/// Sets the retry declaration explicitly.
	pub fn with_retry(mut self, retry: Retryability) -> Self {
		self.retry = retry;

		self
	}

	/// Returns `true` if the pipeline may retry this call.
	pub fn is_retryable(&self) -> bool {
		self.retry.allows(&self.method)
	}
}

/// Successful response with its body fully read.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Final request URL.
	pub url: Url,
	/// Raw body bytes.
	pub body: Vec<u8>,
	/// Attempts made, including the successful one.
	pub attempts: u32,
}
impl ApiResponse {
	/// Decodes the body as JSON with path-aware error reporting.
	///
	/// An empty body decodes as JSON `null`, so `()` and `Option<T>` targets accept it.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let bytes: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &self.body };
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { url: self.url.to_string(), source })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(body: &str) -> ApiResponse {
		ApiResponse {
			status: 200,
			url: Url::parse("https://api.cinode.app/v0.1/x").expect("Fixture URL should parse."),
			body: body.as_bytes().to_vec(),
			attempts: 1,
		}
	}

	#[test]
	fn search_posts_can_be_marked_retry_safe() {
		let plain = RequestSpec::post("/v0.1/companies/1/projects/search");
		let search = plain.clone().retry_safe();

		assert_eq!(plain.path, "v0.1/companies/1/projects/search");
		assert!(!plain.is_retryable());
		assert!(search.is_retryable());
		assert!(RequestSpec::delete("x").is_retryable());
	}

	#[test]
	fn decode_errors_carry_the_failing_path() {
		#[derive(Debug, Deserialize)]
		struct User {
			#[allow(dead_code)]
			id: u64,
		}

		let err = response(r#"{"id":"abc"}"#).json::<User>().expect_err("Wrong type should fail.");

		match err {
			Error::Decode { source, .. } => assert_eq!(source.path().to_string(), "id"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn empty_bodies_decode_as_null() {
		response("").json::<()>().expect("Empty body should decode as unit.");

		assert_eq!(response(" ").json::<Option<u64>>().expect("Null should decode."), None);
	}
}
