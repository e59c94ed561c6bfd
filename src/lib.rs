//! Typed Cinode API client with a request-governance core: fixed-window rate limiting,
//! bearer credential validation and refresh, declarative retry policy, memoized lookups,
//! and paginated search materialization.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
pub mod pagination;
pub mod pipeline;
pub mod rate_limit;
pub mod service;
pub mod urls;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::time::{SystemTime, UNIX_EPOCH};
	// crates.io
	use base64::{
		Engine,
		engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
	};
	// self
	use crate::{
		api::Api,
		auth::{Credential, CredentialSource, Session},
		model::CompanyBase,
		pipeline::{RequestPipeline, RetryPolicy},
		rate_limit::RateLimitConfig,
		service::Service,
	};

	/// Company id every test client is scoped to.
	pub const COMPANY_ID: u64 = 1234;
	/// Company name used in web URLs.
	pub const COMPANY_NAME: &str = "acme";
	/// App id presented to the token endpoint.
	pub const APP_ID: &str = "app-id";
	/// App secret presented to the token endpoint.
	pub const APP_SECRET: &str = "app-secret";

	/// Mints an unsigned JWT whose `exp` claim lies `offset_secs` from now.
	pub fn jwt_expiring_in(offset_secs: i64) -> String {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System clock should be after the Unix epoch.")
			.as_secs() as i64;
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, now + offset_secs));

		format!("{header}.{payload}.signature")
	}

	/// Bearer credential valid for the next hour.
	pub fn valid_token() -> Credential {
		Credential::new(jwt_expiring_in(3_600))
	}

	/// Bearer credential that expired a minute ago.
	pub fn expired_token() -> Credential {
		Credential::new(jwt_expiring_in(-60))
	}

	/// `Authorization` header value the session sends to the login endpoint.
	pub fn basic_auth_header() -> String {
		format!("Basic {}", STANDARD.encode(format!("{APP_ID}:{APP_SECRET}")))
	}

	/// Company the test clients are scoped to.
	pub fn company() -> CompanyBase {
		CompanyBase { id: COMPANY_ID, name: COMPANY_NAME.into() }
	}

	/// Mock path of a company-scoped endpoint.
	pub fn company_path(tail: &str) -> String {
		format!("/v0.1/companies/{COMPANY_ID}/{tail}")
	}

	/// Three quick retries without jitter.
	pub fn fast_retry() -> RetryPolicy {
		RetryPolicy::default().with_limit(3).with_base_delay(Duration::from_millis(5))
	}

	/// Parses a mock server's base URL.
	pub fn base_url(base: &str) -> Url {
		Url::parse(base).expect("Mock server URL should parse.")
	}

	/// Builds a pipeline against `base` with a limiter loose enough to stay out of the way.
	pub fn pipeline_with(
		base: &str,
		credentials: impl Into<CredentialSource>,
		retry: RetryPolicy,
	) -> RequestPipeline {
		RequestPipeline::builder(credentials)
			.base_url(base_url(base))
			.rate_limit(RateLimitConfig::new(1_000, Duration::from_secs(1)))
			.retry(retry)
			.build()
			.expect("Test pipeline should build.")
	}

	/// [`Api`] against `base` with a valid bearer token and the given retry policy.
	pub fn api_with(base: &str, retry: RetryPolicy) -> Api {
		Api::new(company(), pipeline_with(base, valid_token(), retry))
	}

	/// [`Api`] against `base` with [`fast_retry`].
	pub fn api(base: &str) -> Api {
		api_with(base, fast_retry())
	}

	/// Session holding the test app credentials and no tokens yet.
	pub fn session() -> Arc<Session> {
		Arc::new(Session::new(APP_ID, APP_SECRET))
	}

	/// [`Service`] over [`api`].
	pub fn service(base: &str) -> Service {
		Service::new(api(base))
	}
}

mod _prelude {
	pub use std::{
		collections::{HashMap, HashSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Value, json};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {cinode_client as _, color_eyre as _, httpmock as _};
