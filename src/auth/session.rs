//! Refreshable session that exchanges app credentials for an access/refresh token pair.
//!
//! The session is an explicitly owned object shared by reference with the pipeline.
//! Concurrent requests that observe an expired access token queue on a single refresh
//! guard; the first one performs the exchange and the rest re-check the stored pair
//! after acquiring the guard, so exactly one token call is made per expiry.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::TransportError,
	http::ReqwestHttpClient,
	obs,
};

/// Access/refresh pair issued by the token endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer token.
	pub access_token: Credential,
	/// Long-lived token used to mint a new access token.
	#[serde(default)]
	pub refresh_token: Option<Credential>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

/// Shared session state for username/password authentication.
pub struct Session {
	app_id: String,
	app_secret: Credential,
	tokens: RwLock<Option<TokenPair>>,
	refresh_guard: AsyncMutex<()>,
	exchanges: AtomicU64,
}
impl Session {
	/// Path of the credential exchange endpoint, relative to the API base URL.
	pub const TOKEN_PATH: &str = "token";
	/// Path of the refresh endpoint, relative to the API base URL.
	pub const REFRESH_PATH: &str = "token/refresh";

	/// Creates a session that logs in lazily on first use.
	pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
		Self {
			app_id: app_id.into(),
			app_secret: Credential::new(app_secret),
			tokens: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			exchanges: AtomicU64::new(0),
		}
	}

	/// Seeds the session with an already issued pair.
	pub fn with_tokens(self, tokens: TokenPair) -> Self {
		*self.tokens.write() = Some(tokens);

		self
	}

	/// Returns a copy of the currently stored pair, if any.
	pub fn tokens(&self) -> Option<TokenPair> {
		self.tokens.read().clone()
	}

	/// Number of token endpoint exchanges (logins and refreshes) performed so far.
	pub fn exchanges(&self) -> u64 {
		self.exchanges.load(Ordering::Relaxed)
	}

	/// Returns a valid access token, refreshing or logging in when necessary.
	pub async fn bearer(&self, http: &ReqwestHttpClient, base_url: &Url) -> Result<Credential> {
		if let Some(access) = self.current_valid() {
			return Ok(access);
		}

		let _singleflight = self.refresh_guard.lock().await;

		// Another caller may have refreshed while this one waited.
		if let Some(access) = self.current_valid() {
			return Ok(access);
		}

		let refresh_token =
			self.tokens.read().as_ref().and_then(|pair| pair.refresh_token.clone());
		let pair = match refresh_token {
			Some(refresh_token) => match self.refresh(http, base_url, &refresh_token).await {
				Ok(pair) => pair,
				Err(Error::Authentication { reason }) => {
					obs::debug_event("refresh token rejected; logging in again", &reason);

					self.login(http, base_url).await?
				},
				Err(e) => return Err(e),
			},
			None => self.login(http, base_url).await?,
		};

		if !pair.access_token.is_valid() {
			return Err(Error::CredentialExpired);
		}

		let access = pair.access_token.clone();

		*self.tokens.write() = Some(pair);

		Ok(access)
	}

	fn current_valid(&self) -> Option<Credential> {
		self.tokens
			.read()
			.as_ref()
			.map(|pair| pair.access_token.clone())
			.filter(Credential::is_valid)
	}

	async fn login(&self, http: &ReqwestHttpClient, base_url: &Url) -> Result<TokenPair> {
		let url = join(base_url, Self::TOKEN_PATH)?;
		let request =
			http.get(url.clone()).basic_auth(&self.app_id, Some(self.app_secret.expose()));

		self.exchange(request, &url).await
	}

	async fn refresh(
		&self,
		http: &ReqwestHttpClient,
		base_url: &Url,
		refresh_token: &Credential,
	) -> Result<TokenPair> {
		let url = join(base_url, Self::REFRESH_PATH)?;
		let request = http
			.post(url.clone())
			.json(&RefreshRequest { refresh_token: refresh_token.expose() });

		self.exchange(request, &url).await
	}

	async fn exchange(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<TokenPair> {
		self.exchanges.fetch_add(1, Ordering::Relaxed);
		obs::debug_event("exchanging credentials", url.path());

		let response = request.send().await.map_err(TransportError::token_endpoint)?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::Authentication { reason: format!("{status} from {url}") });
		}

		let bytes = response.bytes().await.map_err(TransportError::token_endpoint)?;
		let mut de = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { url: url.to_string(), source })
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("app_id", &self.app_id)
			.field("tokens_set", &self.tokens.read().is_some())
			.finish()
	}
}

fn join(base_url: &Url, path: &str) -> Result<Url> {
	base_url
		.join(path)
		.map_err(|source| crate::error::ConfigError::InvalidBaseUrl { source }.into())
}
