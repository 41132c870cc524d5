use std::fmt;

use azure_core::credentials::{AccessToken, Secret, TokenCredential, TokenRequestOptions};
use secrecy::{ExposeSecret, SecretString};
use typespec_client_core::time::{Duration, OffsetDateTime};

#[cfg(test)]
#[path = "statictoken_tests.rs"]
mod tests;

/// Nominal validity reported for static tokens. The token itself is always
/// returned verbatim; the SDK type requires an expiry, and the real
/// lifetime of an externally issued token is owned by whoever issued it.
const STATIC_TOKEN_VALIDITY_SECS: i64 = 3600;

/// Wraps a single externally obtained bearer token behind
/// [`TokenCredential`].
///
/// No refresh, no caching: every request returns the same token. An empty
/// token is accepted at construction and only fails downstream when the
/// API rejects it; callers that require a non-empty token must check
/// before handing the credential out.
pub struct StaticTokenCredential {
	token: SecretString,
}

impl StaticTokenCredential {
	pub fn new(token: impl Into<SecretString>) -> Self {
		Self { token: token.into() }
	}
}

impl fmt::Debug for StaticTokenCredential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StaticTokenCredential").finish_non_exhaustive()
	}
}

#[async_trait::async_trait]
impl TokenCredential for StaticTokenCredential {
	async fn get_token(
		&self,
		_scopes: &[&str],
		_options: Option<TokenRequestOptions<'_>>,
	) -> azure_core::Result<AccessToken> {
		Ok(AccessToken::new(
			Secret::new(self.token.expose_secret().to_string()),
			OffsetDateTime::now_utc() + Duration::seconds(STATIC_TOKEN_VALIDITY_SECS),
		))
	}
}
