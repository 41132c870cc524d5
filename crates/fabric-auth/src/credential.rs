use std::fmt;
use std::sync::Arc;

use azure_core::credentials::{Secret, TokenCredential};
use azure_core::http::ClientOptions;
use azure_identity::{
	AzureCliCredential, AzureCliCredentialOptions, AzureDeveloperCliCredential,
	AzureDeveloperCliCredentialOptions, AzurePipelinesCredential, AzurePipelinesCredentialOptions,
	ClientAssertionCredential, ClientAssertionCredentialOptions, ClientSecretCredential,
	ClientSecretCredentialOptions, ManagedIdentityCredential, ManagedIdentityCredentialOptions,
	UserAssignedId,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::certs::CertificateAssertion;
use crate::config::{AuthConfig, Environment};
use crate::exchange::TokenExchangeClient;
use crate::method::{self, AuthenticationMethod};
use crate::statictoken::StaticTokenCredential;

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;

#[derive(thiserror::Error, Debug)]
pub enum CredentialError {
	#[error("failed to construct {method} credential: {source}")]
	Construction {
		method: AuthenticationMethod,
		source: azure_core::Error,
	},

	#[error("client certificate and key are required for certificate authentication")]
	MissingCertificateMaterial,

	#[error("{0} credentials are not constructed from provider configuration")]
	UnsupportedMethod(AuthenticationMethod),
}

/// The outcome of one resolve-and-construct pass.
///
/// `credential` owns its own token cache and refresh lifecycle; `info` is
/// the audit rationale from [`method::resolve`] and never contains secret
/// material.
pub struct CredentialResponse {
	pub credential: Arc<dyn TokenCredential>,
	pub auth_method: AuthenticationMethod,
	pub info: String,
}

impl fmt::Debug for CredentialResponse {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CredentialResponse")
			.field("auth_method", &self.auth_method)
			.field("info", &self.info)
			.finish_non_exhaustive()
	}
}

/// Resolves the authentication method for `cfg` and constructs the matching
/// SDK credential.
///
/// Construction performs no network I/O; every branch defers its first
/// token fetch to the credential's own refresh logic. The OIDC branches
/// fetch a fresh federated assertion through `http` on each refresh, which
/// is why the client is injected rather than created here.
///
/// Syntactic validation of tenant and client identifiers is delegated to
/// the SDK constructors; a missing required field surfaces as
/// [`CredentialError::Construction`].
pub fn new_credential(
	cfg: &AuthConfig,
	http: &reqwest::Client,
) -> Result<CredentialResponse, CredentialError> {
	let (auth_method, info) = method::resolve(cfg);
	debug!(method = %auth_method, info, "resolved authentication method");

	let credential: Arc<dyn TokenCredential> = match auth_method {
		AuthenticationMethod::AzureDeveloperCli => {
			AzureDeveloperCliCredential::new(Some(AzureDeveloperCliCredentialOptions {
				tenant_id: non_empty(&cfg.tenant_id),
				..Default::default()
			}))
			.map(|c| c as Arc<dyn TokenCredential>)
		},

		AuthenticationMethod::ManagedServiceIdentityUser => {
			ManagedIdentityCredential::new(Some(ManagedIdentityCredentialOptions {
				user_assigned_id: Some(UserAssignedId::ClientId(cfg.client_id.clone())),
				client_options: client_options(cfg.environment),
				..Default::default()
			}))
			.map(|c| c as Arc<dyn TokenCredential>)
		},

		AuthenticationMethod::ManagedServiceIdentitySystem => {
			ManagedIdentityCredential::new(Some(ManagedIdentityCredentialOptions {
				client_options: client_options(cfg.environment),
				..Default::default()
			}))
			.map(|c| c as Arc<dyn TokenCredential>)
		},

		AuthenticationMethod::AzureDevOpsWorkloadIdentityFederation => {
			AzurePipelinesCredential::new(
				cfg.tenant_id.clone(),
				cfg.client_id.clone(),
				&cfg.oidc.ado_service_connection_id,
				cfg.oidc.request_token.expose_secret().to_string(),
				Some(AzurePipelinesCredentialOptions {
					credential_options: assertion_options(cfg.environment),
					..Default::default()
				}),
			)
			.map(|c| c as Arc<dyn TokenCredential>)
		},

		AuthenticationMethod::ServicePrincipalOidc => {
			let assertion = TokenExchangeClient::new(http.clone(), &cfg.oidc);
			ClientAssertionCredential::new(
				cfg.tenant_id.clone(),
				cfg.client_id.clone(),
				assertion,
				Some(assertion_options(cfg.environment)),
			)
			.map(|c| c as Arc<dyn TokenCredential>)
		},

		AuthenticationMethod::ServicePrincipalCertificate => {
			// resolve() only lands here when a chain is present, but the key
			// travels separately and may still be missing.
			let (Some(chain), Some(key)) = (&cfg.client_certificate, &cfg.client_certificate_key)
			else {
				return Err(CredentialError::MissingCertificateMaterial);
			};
			let assertion = CertificateAssertion::new(
				cfg.environment,
				&cfg.tenant_id,
				&cfg.client_id,
				chain.clone(),
				key.clone_key(),
			);
			ClientAssertionCredential::new(
				cfg.tenant_id.clone(),
				cfg.client_id.clone(),
				assertion,
				Some(assertion_options(cfg.environment)),
			)
			.map(|c| c as Arc<dyn TokenCredential>)
		},

		AuthenticationMethod::ServicePrincipalSecret => ClientSecretCredential::new(
			&cfg.tenant_id,
			cfg.client_id.clone(),
			Secret::new(cfg.client_secret.expose_secret().to_string()),
			Some(ClientSecretCredentialOptions {
				client_options: client_options(cfg.environment),
			}),
		)
		.map(|c| c as Arc<dyn TokenCredential>),

		AuthenticationMethod::AzureCli => AzureCliCredential::new(Some(AzureCliCredentialOptions {
			tenant_id: non_empty(&cfg.tenant_id),
			..Default::default()
		}))
		.map(|c| c as Arc<dyn TokenCredential>),

		AuthenticationMethod::Token => {
			// resolve() never selects this; raw tokens enter through
			// new_static_token_credential.
			return Err(CredentialError::UnsupportedMethod(auth_method));
		},
	}
	.map_err(|source| CredentialError::Construction {
		method: auth_method,
		source,
	})?;

	Ok(CredentialResponse {
		credential,
		auth_method,
		info: info.to_string(),
	})
}

/// Wraps an externally obtained bearer token as a [`CredentialResponse`].
///
/// Not part of the resolution precedence: callers opt in when their
/// configuration carries an already-issued token. The token is used
/// verbatim with no refresh.
pub fn new_static_token_credential(token: SecretString) -> CredentialResponse {
	CredentialResponse {
		credential: Arc::new(StaticTokenCredential::new(token)),
		auth_method: AuthenticationMethod::Token,
		info: "Using static token authentication".to_string(),
	}
}

fn non_empty(value: &str) -> Option<String> {
	(!value.is_empty()).then(|| value.to_string())
}

/// Pipeline options carrying the cloud for `cfg.environment`, so sovereign
/// configurations request tokens from their own authority instead of the
/// public-cloud default. The CLI credentials take no such option; they
/// inherit the cloud from the local CLI login.
fn client_options(environment: Environment) -> ClientOptions {
	ClientOptions {
		cloud: Some(Arc::new(environment.cloud())),
		..Default::default()
	}
}

fn assertion_options(environment: Environment) -> ClientAssertionCredentialOptions {
	ClientAssertionCredentialOptions {
		client_options: client_options(environment),
	}
}
