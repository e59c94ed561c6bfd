//! Redacted bearer credential and JWT expiry validation.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Redacted bearer token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);
impl Credential {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Decodes the `exp` claim, returning `None` when the token is malformed or lacks it.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let payload = self.0.split('.').nth(1)?;
		let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
		let claims = serde_json::from_slice::<Value>(&bytes).ok()?;
		let exp = claims.get("exp")?;
		let secs = exp.as_i64().or_else(|| exp.as_f64().map(|v| v as i64))?;

		OffsetDateTime::from_unix_timestamp(secs).ok()
	}

	/// Returns `true` iff `instant` is strictly before the token's expiry.
	///
	/// Malformed tokens and tokens without an expiry claim are never valid.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|exp| instant < exp)
	}

	/// Checks validity against the current UTC clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl AsRef<str> for Credential {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::engine::general_purpose::URL_SAFE;
	use time::macros;
	// self
	use super::*;

	fn token_with_claims(claims: Value) -> Credential {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

		Credential::new(format!("{header}.{payload}.signature"))
	}

	#[test]
	fn validity_is_strictly_before_expiry() {
		let exp = macros::datetime!(2030-01-01 00:00 UTC);
		let token = token_with_claims(json!({ "exp": exp.unix_timestamp() }));

		assert_eq!(token.expires_at(), Some(exp));
		assert!(token.is_valid_at(macros::datetime!(2029-12-31 23:59:59 UTC)));
		assert!(!token.is_valid_at(exp));
		assert!(!token.is_valid_at(macros::datetime!(2030-01-01 00:00:01 UTC)));
	}

	#[test]
	fn malformed_tokens_are_never_valid() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(!Credential::new("").is_valid_at(now));
		assert!(!Credential::new("not-a-jwt").is_valid_at(now));
		assert!(!Credential::new("a.%%%.c").is_valid_at(now));
		assert!(!token_with_claims(json!({ "sub": "1" })).is_valid_at(now));
		assert!(!token_with_claims(json!({ "exp": "tomorrow" })).is_valid_at(now));
	}

	#[test]
	fn padded_payloads_are_accepted() {
		let header = URL_SAFE.encode(br#"{"alg":"none"}"#);
		let payload = URL_SAFE.encode(json!({ "exp": 4_102_444_800_i64 }).to_string());
		let token = Credential::new(format!("{header}.{payload}."));

		assert!(token.is_valid_at(macros::datetime!(2025-01-01 00:00 UTC)));
	}

	#[test]
	fn formatters_redact() {
		let token = Credential::new("super-secret");

		assert_eq!(format!("{token:?}"), "Credential(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
	}
}
