//! Credential resolution and issuance for the Microsoft Fabric management API.
//!
//! Given one provider configuration, this crate selects exactly one
//! authentication method ([`method::resolve`]) and constructs the matching
//! [`azure_core::credentials::TokenCredential`] via
//! [`credential::new_credential`]. Token caching and refresh live inside the
//! SDK credential; nothing here persists state between calls.
//!
//! The crate owns the security-sensitive pieces of the provider:
//! precedence-based method selection, the OIDC bearer-token exchange,
//! PKCS#12 certificate decoding, and the static-token adapter. Everything
//! else (configuration loading, the API client the credential is handed to)
//! lives upstream.

pub mod certs;
pub mod config;
pub mod credential;
pub mod exchange;
pub mod method;
pub mod statictoken;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{AuthConfig, Environment, OidcConfig};
pub use credential::{CredentialError, CredentialResponse, new_credential, new_static_token_credential};
pub use method::{AuthenticationMethod, resolve};
pub use statictoken::StaticTokenCredential;
