//! Request pipeline: admission, authentication, dispatch, retry, and error enrichment.
//!
//! Every outbound call goes through [`RequestPipeline::execute`], which performs the
//! following steps for each attempt:
//!
//! 1. capture the call site (once, before any suspension),
//! 2. wait for [`RateLimiter::admit`],
//! 3. resolve a valid bearer credential or fail with [`Error::CredentialExpired`],
//! 4. inject the `Authorization` header and dispatch,
//! 5. on failure, consult the [`RetryPolicy`] and the call's [`Retryability`]; once retries are
//!    exhausted, surface the error enriched with status, method, URL, and call site.

mod origin;
mod request;
mod retry;

pub use origin::*;
pub use request::*;
pub use retry::*;

// crates.io
use reqwest::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	auth::{CredentialSource, Session},
	config::CinodeConfig,
	error::{ConfigError, HttpError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata},
	obs::{self, RequestOutcome, RequestSpan},
	rate_limit::{RateLimitConfig, RateLimiter},
};

/// Boxed future returned by pipeline operations.
pub type PipelineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.cinode.app/";

enum Failure {
	Status(ResponseMetadata),
	Transport(ReqwestError),
}

/// Governs every outbound call made by the client.
#[derive(Clone, Debug)]
pub struct RequestPipeline {
	http: ReqwestHttpClient,
	base_url: Url,
	credentials: CredentialSource,
	limiter: Arc<RateLimiter>,
	retry: RetryPolicy,
}
impl RequestPipeline {
	/// Starts a builder for the given credential source.
	pub fn builder(credentials: impl Into<CredentialSource>) -> PipelineBuilder {
		PipelineBuilder::new(credentials)
	}

	/// Builds a pipeline from environment-style configuration using a refreshable session.
	pub fn from_config(config: &CinodeConfig) -> Result<Self> {
		let session = Arc::new(Session::new(&config.app_id, config.app_secret.expose()));

		Self::builder(session).base_url(config.base_url.clone()).build()
	}

	/// API base URL (always ends with `/`).
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Shared rate limiter.
	pub fn limiter(&self) -> &Arc<RateLimiter> {
		&self.limiter
	}

	/// Active retry policy.
	pub fn retry_policy(&self) -> &RetryPolicy {
		&self.retry
	}

	/// Credential source used for each attempt.
	pub fn credentials(&self) -> &CredentialSource {
		&self.credentials
	}

	/// Executes the request and returns the fully read response.
	#[track_caller]
	pub fn execute(&self, spec: RequestSpec) -> PipelineFuture<'_, ApiResponse> {
		let origin = CallSite::capture();

		Box::pin(self.run(spec, origin))
	}

	/// Executes the request and decodes the JSON body.
	#[track_caller]
	pub fn execute_json<T>(&self, spec: RequestSpec) -> PipelineFuture<'_, T>
	where
		T: 'static + Send + DeserializeOwned,
	{
		let origin = CallSite::capture();

		Box::pin(async move { self.run(spec, origin).await?.json() })
	}

	/// Executes the request and discards the body.
	#[track_caller]
	pub fn execute_unit(&self, spec: RequestSpec) -> PipelineFuture<'_, ()> {
		let origin = CallSite::capture();

		Box::pin(async move {
			self.run(spec, origin).await?;

			Ok(())
		})
	}

	/// Resolves a path against the base URL.
	pub fn url_for(&self, path: &str) -> Result<Url> {
		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidBaseUrl { source }.into())
	}

	async fn run(&self, spec: RequestSpec, origin: CallSite) -> Result<ApiResponse> {
		let url = self.url_for(&spec.path)?;
		let span = RequestSpan::new(&spec.method, url.path());

		obs::record_request_outcome(RequestOutcome::Attempt);

		let result = span.instrument(self.attempts(&spec, url, origin)).await;

		match &result {
			Ok(_) => obs::record_request_outcome(RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(RequestOutcome::Failure),
		}

		result
	}

	async fn attempts(&self, spec: &RequestSpec, url: Url, origin: CallSite) -> Result<ApiResponse> {
		let retryable = spec.is_retryable();
		let mut attempt = 0_u32;

		loop {
			attempt += 1;

			let ticket = self.limiter.admit().await;
			let credential = self.credentials.bearer(&self.http, &self.base_url).await?;
			let mut request = self
				.http
				.request(spec.method.clone(), url.clone())
				.bearer_auth(credential.expose());

			// Set before the body: `json` only fills in a content type when none is present.
			if let Some(content_type) = spec.content_type {
				request = request.header(CONTENT_TYPE, content_type);
			}
			if let Some(body) = &spec.body {
				request = request.json(body);
			}

			let failure = match request.send().await {
				Ok(response) if response.status().is_success() => {
					let status = response.status().as_u16();
					let final_url = response.url().clone();

					match response.bytes().await {
						Ok(body) =>
							return Ok(ApiResponse {
								status,
								url: final_url,
								body: body.to_vec(),
								attempts: attempt,
							}),
						Err(e) => Failure::Transport(e),
					}
				},
				Ok(response) => Failure::Status(ResponseMetadata::from_response(&response)),
				Err(e) => Failure::Transport(e),
			};

			// Release the concurrency slot before backing off.
			drop(ticket);

			let transient = match &failure {
				Failure::Status(meta) => meta.status.is_some_and(|s| self.retry.retries_status(s)),
				Failure::Transport(e) => self.retry.retries_transport(e),
			};

			if !(retryable && transient && attempt <= self.retry.limit) {
				return Err(self.enrich(failure, spec, url, attempt, origin));
			}

			let meta = match &failure {
				Failure::Status(meta) => Some(meta),
				Failure::Transport(_) => None,
			};
			let delay = self.retry.delay_for(attempt, meta);
			let reason = match &failure {
				Failure::Status(meta) =>
					meta.status.map(|s| s.to_string()).unwrap_or_else(|| "unknown status".into()),
				Failure::Transport(e) => e.to_string(),
			};

			obs::warn_retry(&spec.method, url.as_str(), attempt, delay, &reason);
			obs::record_retry(&spec.method);
			tokio::time::sleep(delay).await;
		}
	}

	fn enrich(
		&self,
		failure: Failure,
		spec: &RequestSpec,
		url: Url,
		attempts: u32,
		origin: CallSite,
	) -> Error {
		match failure {
			Failure::Status(meta) => HttpError {
				status: meta.status.unwrap_or_default(),
				method: spec.method.clone(),
				url: url.into(),
				attempts,
				origin,
			}
			.into(),
			Failure::Transport(e) => TransportError::Network {
				method: spec.method.clone(),
				url: url.into(),
				origin,
				source: Box::new(e),
			}
			.into(),
		}
	}
}

/// Builder for [`RequestPipeline`] values.
#[derive(Debug)]
pub struct PipelineBuilder {
	credentials: CredentialSource,
	base_url: Option<Url>,
	rate_limit: RateLimitConfig,
	limiter: Option<Arc<RateLimiter>>,
	retry: RetryPolicy,
	http_client: Option<ReqwestHttpClient>,
}
impl PipelineBuilder {
	/// Creates a builder with default limits and retry policy.
	pub fn new(credentials: impl Into<CredentialSource>) -> Self {
		Self {
			credentials: credentials.into(),
			base_url: None,
			rate_limit: RateLimitConfig::default(),
			limiter: None,
			retry: RetryPolicy::default(),
			http_client: None,
		}
	}

	/// Overrides the API base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the rate limits.
	pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
		self.rate_limit = config;

		self
	}

	/// Shares an existing limiter, e.g. across pipelines that hit the same quota.
	pub fn limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
		self.limiter = Some(limiter);

		self
	}

	/// Overrides the retry policy.
	pub fn retry(mut self, policy: RetryPolicy) -> Self {
		self.retry = policy;

		self
	}

	/// Supplies a pre-configured HTTP client (timeouts, proxies, TLS settings).
	pub fn http_client(mut self, client: ReqwestHttpClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Validates settings and builds the pipeline.
	pub fn build(self) -> Result<RequestPipeline> {
		let mut base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL)
				.map_err(|source| ConfigError::InvalidBaseUrl { source })?,
		};

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidSetting {
				key: "base_url",
				reason: format!("`{base_url}` cannot be used as a base URL"),
			}
			.into());
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let limiter = self.limiter.unwrap_or_else(|| Arc::new(RateLimiter::new(self.rate_limit)));

		Ok(RequestPipeline {
			http: self.http_client.unwrap_or_default(),
			base_url,
			credentials: self.credentials,
			limiter,
			retry: self.retry,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Credential;

	#[test]
	fn builder_normalizes_the_base_url() {
		let pipeline = RequestPipeline::builder(Credential::new("token"))
			.base_url(Url::parse("http://localhost:8080/api").expect("Fixture URL should parse."))
			.build()
			.expect("Pipeline should build.");

		assert_eq!(pipeline.base_url().as_str(), "http://localhost:8080/api/");
		assert_eq!(
			pipeline.url_for("/v0.1/companies/1/users").expect("Path should join.").as_str(),
			"http://localhost:8080/api/v0.1/companies/1/users"
		);
	}

	#[test]
	fn builder_defaults_to_the_public_api() {
		let pipeline =
			RequestPipeline::builder(Credential::new("token")).build().expect("Pipeline should build.");

		assert_eq!(pipeline.base_url().as_str(), DEFAULT_BASE_URL);
		assert_eq!(pipeline.retry_policy().limit, RetryPolicy::DEFAULT_LIMIT);
		assert_eq!(pipeline.limiter().config(), &RateLimitConfig::default());
	}
}
