use std::fmt;

use azure_core::http::ClientMethodOptions;
use azure_identity::ClientAssertion;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::trace;
use url::Url;

use crate::config::OidcConfig;

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;

/// Default `audience` when the request URL does not already carry one.
const DEFAULT_AUDIENCE: &str = "api://AzureADTokenExchange";

/// Hard cap on the response body, guarding against an endpoint that
/// streams unbounded data.
const MAX_RESPONSE_BODY: usize = 1024 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
	#[error("getAssertion: invalid request URL: {0}")]
	RequestUrl(#[from] url::ParseError),

	#[error("getAssertion: request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("getAssertion: received HTTP status {status}: {body}")]
	Status { status: StatusCode, body: String },

	#[error("getAssertion: cannot parse response: {0}")]
	Parse(#[source] serde_json::Error),

	#[error("getAssertion: no value found in response")]
	MissingValue,
}

#[derive(Deserialize)]
struct AssertionResponse {
	#[serde(default)]
	#[allow(dead_code)]
	count: Option<u64>,
	value: Option<String>,
}

/// Fetches federated identity assertions from a third-party OIDC token
/// endpoint.
///
/// Plugged into the OIDC credential branches as their client-assertion
/// callback, so it runs once per SDK token refresh rather than once per
/// process. The HTTP client is injected so callers control timeouts and
/// tests can point it at a stub endpoint. Holds no mutable state;
/// concurrent fetches are independent.
pub struct TokenExchangeClient {
	http: reqwest::Client,
	request_url: String,
	request_token: SecretString,
	static_token: Option<SecretString>,
}

impl fmt::Debug for TokenExchangeClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenExchangeClient")
			.field("request_url", &self.request_url)
			.finish_non_exhaustive()
	}
}

impl TokenExchangeClient {
	pub fn new(http: reqwest::Client, oidc: &OidcConfig) -> Self {
		Self {
			http,
			request_url: oidc.request_url.clone(),
			request_token: oidc.request_token.clone(),
			static_token: oidc.token.clone(),
		}
	}

	/// Returns a federated JWT assertion.
	///
	/// A statically configured token short-circuits the network round trip
	/// entirely. Every failure is terminal for this call; retry policy
	/// belongs to the SDK credential driving the refresh, and cancellation
	/// to whoever drops the future.
	pub async fn get_assertion(&self) -> Result<String, ExchangeError> {
		if let Some(token) = &self.static_token {
			trace!("using statically configured OIDC token");
			return Ok(token.expose_secret().to_string());
		}

		let mut url = Url::parse(&self.request_url)?;
		if !url.query_pairs().any(|(k, _)| k == "audience") {
			url
				.query_pairs_mut()
				.append_pair("audience", DEFAULT_AUDIENCE);
		}

		let response = self
			.http
			.get(url)
			.bearer_auth(self.request_token.expose_secret())
			.header(ACCEPT, "application/json")
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.send()
			.await?;

		let status = response.status();
		let body = read_capped(response).await?;
		if !(200..=226).contains(&status.as_u16()) {
			return Err(ExchangeError::Status {
				status,
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		let parsed: AssertionResponse =
			serde_json::from_slice(&body).map_err(ExchangeError::Parse)?;
		let Some(value) = parsed.value else {
			return Err(ExchangeError::MissingValue);
		};
		trace!("fetched OIDC assertion");
		Ok(value)
	}
}

/// Reads the response body up to [`MAX_RESPONSE_BODY`], discarding the rest.
async fn read_capped(mut response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
	let mut body = Vec::new();
	while let Some(chunk) = response.chunk().await? {
		let remaining = MAX_RESPONSE_BODY - body.len();
		if chunk.len() >= remaining {
			body.extend_from_slice(&chunk[..remaining]);
			break;
		}
		body.extend_from_slice(&chunk);
	}
	Ok(body)
}

#[async_trait::async_trait]
impl ClientAssertion for TokenExchangeClient {
	async fn secret(&self, _options: Option<ClientMethodOptions<'_>>) -> azure_core::Result<String> {
		self.get_assertion().await.map_err(|e| {
			azure_core::Error::with_message_fn(azure_core::error::ErrorKind::Credential, || {
				e.to_string()
			})
		})
	}
}
