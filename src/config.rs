//! Environment-style configuration required at startup.
//!
//! Every required key must be present and non-empty; otherwise construction fails with
//! [`ConfigError::MissingSetting`] before any request can be attempted.

// self
use crate::{_prelude::*, auth::Credential, error::ConfigError, model::CompanyBase, pipeline};

/// Company identifier.
pub const COMPANY_ID: &str = "CINODE_COMPANY_ID";
/// Company display name, as used in web URLs.
pub const COMPANY_NAME: &str = "CINODE_COMPANY_NAME";
/// Application identifier used for the token exchange.
pub const APP_ID: &str = "CINODE_APP_ID";
/// Application secret used for the token exchange.
pub const APP_SECRET: &str = "CINODE_APP_SECRET";
/// Optional API base URL override.
pub const API_URL: &str = "CINODE_API_URL";

/// Settings needed to reach one company's data.
#[derive(Clone)]
pub struct CinodeConfig {
	/// Company identifier.
	pub company_id: u64,
	/// Company display name.
	pub company_name: String,
	/// Application identifier.
	pub app_id: String,
	/// Application secret; redacted in debug output.
	pub app_secret: Credential,
	/// API base URL.
	pub base_url: Url,
}
impl CinodeConfig {
	/// Reads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads configuration through an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |key: &'static str| {
			lookup(key)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ConfigError::MissingSetting { key })
		};
		let company_id = required(COMPANY_ID)?;
		let company_id = company_id.trim().parse::<u64>().map_err(|e| {
			ConfigError::InvalidSetting { key: COMPANY_ID, reason: e.to_string() }
		})?;
		let company_name = required(COMPANY_NAME)?;
		let app_id = required(APP_ID)?;
		let app_secret = Credential::new(required(APP_SECRET)?);
		let base_url = match lookup(API_URL).filter(|value| !value.trim().is_empty()) {
			Some(raw) => Url::parse(raw.trim()),
			None => Url::parse(pipeline::DEFAULT_BASE_URL),
		}
		.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self { company_id, company_name, app_id, app_secret, base_url })
	}

	/// Company reference used to scope endpoint paths.
	pub fn company(&self) -> CompanyBase {
		CompanyBase { id: self.company_id, name: self.company_name.clone() }
	}
}
impl Debug for CinodeConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CinodeConfig")
			.field("company_id", &self.company_id)
			.field("company_name", &self.company_name)
			.field("app_id", &self.app_id)
			.field("app_secret", &self.app_secret)
			.field("base_url", &self.base_url.as_str())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		move |key| map.get(key).cloned()
	}

	const COMPLETE: [(&str, &str); 4] = [
		(COMPANY_ID, "1234"),
		(COMPANY_NAME, "acme"),
		(APP_ID, "app"),
		(APP_SECRET, "secret"),
	];

	#[test]
	fn complete_environment_parses() {
		let config = CinodeConfig::from_lookup(lookup(&COMPLETE)).expect("Config should parse.");

		assert_eq!(config.company_id, 1234);
		assert_eq!(config.company_name, "acme");
		assert_eq!(config.base_url.as_str(), pipeline::DEFAULT_BASE_URL);
		assert!(!format!("{config:?}").contains("secret\""));
	}

	#[test]
	fn each_missing_or_empty_key_is_fatal() {
		for missing in [COMPANY_ID, COMPANY_NAME, APP_ID, APP_SECRET] {
			let without = COMPLETE.iter().copied().filter(|(k, _)| *k != missing).collect::<Vec<_>>();
			let err = CinodeConfig::from_lookup(lookup(&without)).expect_err("Missing key must fail.");

			assert!(matches!(err, ConfigError::MissingSetting { key } if key == missing));

			let mut blank = COMPLETE.to_vec();

			blank.retain(|(k, _)| *k != missing);
			blank.push((missing, "  "));

			let err = CinodeConfig::from_lookup(lookup(&blank)).expect_err("Blank key must fail.");

			assert!(matches!(err, ConfigError::MissingSetting { key } if key == missing));
		}
	}

	#[test]
	fn company_id_must_be_numeric() {
		let mut pairs = COMPLETE.to_vec();

		pairs[0] = (COMPANY_ID, "acme");

		let err = CinodeConfig::from_lookup(lookup(&pairs)).expect_err("Non-numeric id must fail.");

		assert!(matches!(err, ConfigError::InvalidSetting { key: COMPANY_ID, .. }));
	}

	#[test]
	fn base_url_can_be_overridden() {
		let mut pairs = COMPLETE.to_vec();

		pairs.push((API_URL, "http://localhost:9000/"));

		let config = CinodeConfig::from_lookup(lookup(&pairs)).expect("Config should parse.");

		assert_eq!(config.base_url.as_str(), "http://localhost:9000/");
	}
}
