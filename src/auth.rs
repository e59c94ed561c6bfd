//! Bearer credentials, expiry validation, and refreshable sessions.

pub mod credential;
pub mod session;

pub use credential::*;
pub use session::*;

// self
use crate::{_prelude::*, http::ReqwestHttpClient};

/// Where the pipeline obtains the bearer credential for each attempt.
#[derive(Clone, Debug)]
pub enum CredentialSource {
	/// Fixed token supplied at construction; never refreshed.
	Static(Credential),
	/// Username/password exchanged for an access/refresh pair on demand.
	Session(Arc<Session>),
}
impl CredentialSource {
	/// Resolves a credential that is valid right now.
	///
	/// A static token that has expired fails with [`Error::CredentialExpired`] instead of
	/// being sent, since the remote would answer 401 anyway.
	pub async fn bearer(&self, http: &ReqwestHttpClient, base_url: &Url) -> Result<Credential> {
		match self {
			Self::Static(credential) =>
				if credential.is_valid() {
					Ok(credential.clone())
				} else {
					Err(Error::CredentialExpired)
				},
			Self::Session(session) => session.bearer(http, base_url).await,
		}
	}
}
impl From<Credential> for CredentialSource {
	fn from(credential: Credential) -> Self {
		Self::Static(credential)
	}
}
impl From<Arc<Session>> for CredentialSource {
	fn from(session: Arc<Session>) -> Self {
		Self::Session(session)
	}
}
