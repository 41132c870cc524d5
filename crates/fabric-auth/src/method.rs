use std::fmt;

use secrecy::ExposeSecret;

use crate::config::AuthConfig;

#[cfg(test)]
#[path = "method_tests.rs"]
mod tests;

/// The authentication mechanism selected for one provider configuration.
///
/// Closed set: adding a variant forces every dispatch site, most notably
/// [`crate::credential::new_credential`], to handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthenticationMethod {
	ServicePrincipalSecret,
	ServicePrincipalCertificate,
	ServicePrincipalOidc,
	AzureDevOpsWorkloadIdentityFederation,
	ManagedServiceIdentityUser,
	ManagedServiceIdentitySystem,
	AzureCli,
	AzureDeveloperCli,
	/// Static, externally obtained bearer token
	/// ([`crate::statictoken::StaticTokenCredential`]). Never produced by
	/// [`resolve`].
	Token,
}

impl fmt::Display for AuthenticationMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			AuthenticationMethod::ServicePrincipalSecret => "Service Principal Secret",
			AuthenticationMethod::ServicePrincipalCertificate => "Service Principal Certificate",
			AuthenticationMethod::ServicePrincipalOidc => "Service Principal OpenID Connect",
			AuthenticationMethod::AzureDevOpsWorkloadIdentityFederation => {
				"Azure DevOps Workload Identity Federation"
			},
			AuthenticationMethod::ManagedServiceIdentityUser => "User-Assigned Managed Identity",
			AuthenticationMethod::ManagedServiceIdentitySystem => "System-Assigned Managed Identity",
			AuthenticationMethod::AzureCli => "Azure CLI",
			AuthenticationMethod::AzureDeveloperCli => "Azure Developer CLI",
			AuthenticationMethod::Token => "Static Token",
		};
		f.write_str(name)
	}
}

/// Selects the authentication method for a configuration.
///
/// Pure and infallible: the precedence rules are evaluated top to bottom,
/// first match wins, and the Azure CLI session is the documented fallback
/// so a zero-config local run still authenticates. Tolerant of several
/// `use_*` flags being set at once; upstream validation is expected to
/// reject that, but resolution must not depend on it.
///
/// The returned string is a one-line audit rationale for logs. It names
/// flags and methods only, never secret material.
pub fn resolve(cfg: &AuthConfig) -> (AuthenticationMethod, &'static str) {
	if cfg.use_msi && !cfg.client_id.is_empty() {
		(
			AuthenticationMethod::ManagedServiceIdentityUser,
			"Using User-Assigned Managed Identity (MSI) authentication",
		)
	} else if cfg.use_msi {
		(
			AuthenticationMethod::ManagedServiceIdentitySystem,
			"Using System-Assigned Managed Identity (MSI) authentication",
		)
	} else if cfg.use_oidc && !cfg.oidc.ado_service_connection_id.is_empty() {
		(
			AuthenticationMethod::AzureDevOpsWorkloadIdentityFederation,
			"Using OpenID Connect (OIDC) authentication from the Azure DevOps Workload Identity Federation service connection.",
		)
	} else if cfg.use_oidc {
		(
			AuthenticationMethod::ServicePrincipalOidc,
			"Using OpenID Connect (OIDC) authentication",
		)
	} else if cfg.use_dev_cli {
		(
			AuthenticationMethod::AzureDeveloperCli,
			"Using Azure Developer CLI authentication",
		)
	} else if cfg.use_cli {
		(AuthenticationMethod::AzureCli, "Using Azure CLI authentication")
	} else if !cfg.client_id.is_empty() && cfg.client_certificate.is_some() {
		(
			AuthenticationMethod::ServicePrincipalCertificate,
			"Using Service Principal Certificate authentication",
		)
	} else if !cfg.client_id.is_empty() && !cfg.client_secret.expose_secret().is_empty() {
		(
			AuthenticationMethod::ServicePrincipalSecret,
			"Using Service Principal Secret authentication",
		)
	} else {
		(AuthenticationMethod::AzureCli, "Using Azure CLI authentication")
	}
}
