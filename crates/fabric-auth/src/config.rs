use azure_core::cloud::CloudConfiguration;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use secrecy::SecretString;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Cloud the provider talks to. Selects the Entra ID authority and the
/// management-API scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
	#[default]
	Public,
	UsGovernment,
	China,
}

impl Environment {
	/// Entra ID authority host for this cloud.
	pub fn authority_host(&self) -> &'static str {
		match self {
			Environment::Public => "https://login.microsoftonline.com",
			Environment::UsGovernment => "https://login.microsoftonline.us",
			Environment::China => "https://login.chinacloudapi.cn",
		}
	}

	/// SDK cloud configuration for this cloud. Passed to every credential
	/// constructor that takes client options so sovereign configurations
	/// never fall back to the public authority.
	pub fn cloud(&self) -> CloudConfiguration {
		match self {
			Environment::Public => CloudConfiguration::AzurePublic,
			Environment::UsGovernment => CloudConfiguration::AzureGovernment,
			Environment::China => CloudConfiguration::AzureChina,
		}
	}

	/// Default scope for management-API token requests.
	pub fn default_scope(&self) -> &'static str {
		match self {
			Environment::Public => "https://api.fabric.microsoft.com/.default",
			Environment::UsGovernment => "https://api.fabric.microsoft.us/.default",
			Environment::China => "https://api.fabric.microsoft.cn/.default",
		}
	}
}

/// OpenID Connect settings for the federated credential branches.
#[derive(Clone, Debug)]
pub struct OidcConfig {
	/// Endpoint of the OIDC provider to request an ID token from.
	pub request_url: String,
	/// Bearer token authorizing the request to the OIDC provider.
	pub request_token: SecretString,
	/// Statically configured assertion. When present, no network exchange
	/// happens at all.
	pub token: Option<SecretString>,
	/// Azure DevOps service connection to federate through, if any.
	pub ado_service_connection_id: String,
}

impl Default for OidcConfig {
	fn default() -> Self {
		Self {
			request_url: String::new(),
			request_token: SecretString::from(""),
			token: None,
			ado_service_connection_id: String::new(),
		}
	}
}

/// One resolution pass worth of authentication settings.
///
/// Populated and validated by the provider configuration layer; this crate
/// only reads it. At most one of the `use_*` flags is expected to be set,
/// but [`crate::method::resolve`] stays deterministic even when that
/// upstream validation did not run.
#[derive(Debug)]
pub struct AuthConfig {
	pub use_cli: bool,
	pub use_dev_cli: bool,
	pub use_oidc: bool,
	pub use_msi: bool,

	pub tenant_id: String,
	pub client_id: String,
	pub client_secret: SecretString,
	/// Decoded certificate chain, leaf first. See
	/// [`crate::certs::decode_certificate`].
	pub client_certificate: Option<Vec<CertificateDer<'static>>>,
	pub client_certificate_key: Option<PrivateKeyDer<'static>>,

	/// Additional tenants from the provider configuration. Carried for the
	/// upstream contract; the SDK's credential options currently expose no
	/// additionally-allowed-tenants setting to wire it into.
	pub auxiliary_tenant_ids: Vec<String>,
	pub environment: Environment,
	pub oidc: OidcConfig,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			use_cli: false,
			use_dev_cli: false,
			use_oidc: false,
			use_msi: false,
			tenant_id: String::new(),
			client_id: String::new(),
			client_secret: SecretString::from(""),
			client_certificate: None,
			client_certificate_key: None,
			auxiliary_tenant_ids: Vec::new(),
			environment: Environment::default(),
			oidc: OidcConfig::default(),
		}
	}
}
