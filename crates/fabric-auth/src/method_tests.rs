use rustls_pki_types::CertificateDer;
use secrecy::SecretString;

use super::{AuthenticationMethod, resolve};
use crate::config::AuthConfig;

fn dummy_chain() -> Vec<CertificateDer<'static>> {
	vec![CertificateDer::from(vec![0x30, 0x00])]
}

#[test]
fn msi_with_client_id_is_user_assigned() {
	let cfg = AuthConfig {
		use_msi: true,
		client_id: "11111111-1111-1111-1111-111111111111".to_string(),
		..Default::default()
	};
	let (method, info) = resolve(&cfg);
	assert_eq!(method, AuthenticationMethod::ManagedServiceIdentityUser);
	assert_eq!(info, "Using User-Assigned Managed Identity (MSI) authentication");
}

#[test]
fn msi_without_client_id_is_system_assigned() {
	let cfg = AuthConfig {
		use_msi: true,
		..Default::default()
	};
	let (method, _) = resolve(&cfg);
	assert_eq!(method, AuthenticationMethod::ManagedServiceIdentitySystem);
}

#[test]
fn oidc_with_service_connection_is_ado_federation() {
	let mut cfg = AuthConfig {
		use_oidc: true,
		..Default::default()
	};
	cfg.oidc.ado_service_connection_id = "conn-1".to_string();
	let (method, _) = resolve(&cfg);
	assert_eq!(
		method,
		AuthenticationMethod::AzureDevOpsWorkloadIdentityFederation
	);
}

#[test]
fn oidc_without_service_connection_is_service_principal_oidc() {
	let cfg = AuthConfig {
		use_oidc: true,
		..Default::default()
	};
	let (method, info) = resolve(&cfg);
	assert_eq!(method, AuthenticationMethod::ServicePrincipalOidc);
	assert_eq!(info, "Using OpenID Connect (OIDC) authentication");
}

#[test]
fn dev_cli_flag_selects_developer_cli() {
	let cfg = AuthConfig {
		use_dev_cli: true,
		..Default::default()
	};
	assert_eq!(resolve(&cfg).0, AuthenticationMethod::AzureDeveloperCli);
}

#[test]
fn cli_flag_selects_cli() {
	let cfg = AuthConfig {
		use_cli: true,
		..Default::default()
	};
	assert_eq!(resolve(&cfg).0, AuthenticationMethod::AzureCli);
}

#[test]
fn client_id_and_certificate_select_certificate() {
	let cfg = AuthConfig {
		client_id: "client".to_string(),
		client_certificate: Some(dummy_chain()),
		client_secret: SecretString::from("also-set"),
		..Default::default()
	};
	// Certificate wins over secret when both are configured.
	assert_eq!(
		resolve(&cfg).0,
		AuthenticationMethod::ServicePrincipalCertificate
	);
}

#[test]
fn client_id_and_secret_select_secret() {
	let cfg = AuthConfig {
		client_id: "client".to_string(),
		client_secret: SecretString::from("s3cret"),
		..Default::default()
	};
	assert_eq!(resolve(&cfg).0, AuthenticationMethod::ServicePrincipalSecret);
}

#[test]
fn empty_configuration_falls_back_to_cli() {
	let cfg = AuthConfig::default();
	let (method, info) = resolve(&cfg);
	assert_eq!(method, AuthenticationMethod::AzureCli);
	assert_eq!(info, "Using Azure CLI authentication");
}

#[test]
fn certificate_without_client_id_falls_back_to_cli() {
	let cfg = AuthConfig {
		client_certificate: Some(dummy_chain()),
		..Default::default()
	};
	assert_eq!(resolve(&cfg).0, AuthenticationMethod::AzureCli);
}

#[test]
fn precedence_msi_beats_other_flags() {
	// Upstream validation should reject this combination; resolution must
	// still be deterministic when it did not run.
	let cfg = AuthConfig {
		use_msi: true,
		use_oidc: true,
		use_cli: true,
		use_dev_cli: true,
		..Default::default()
	};
	assert_eq!(
		resolve(&cfg).0,
		AuthenticationMethod::ManagedServiceIdentitySystem
	);
}

#[test]
fn precedence_oidc_beats_cli_flags() {
	let cfg = AuthConfig {
		use_oidc: true,
		use_cli: true,
		use_dev_cli: true,
		..Default::default()
	};
	assert_eq!(resolve(&cfg).0, AuthenticationMethod::ServicePrincipalOidc);
}

#[test]
fn resolution_is_idempotent() {
	let cfg = AuthConfig {
		client_id: "client".to_string(),
		client_secret: SecretString::from("s3cret"),
		..Default::default()
	};
	assert_eq!(resolve(&cfg), resolve(&cfg));
}

#[test]
fn rationale_never_contains_the_secret() {
	let cfg = AuthConfig {
		client_id: "client".to_string(),
		client_secret: SecretString::from("super-secret-value"),
		..Default::default()
	};
	let (_, info) = resolve(&cfg);
	assert!(!info.contains("super-secret-value"));
}
