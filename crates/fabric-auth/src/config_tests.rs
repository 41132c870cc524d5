use azure_core::cloud::CloudConfiguration;

use super::Environment;

#[test]
fn environment_selects_the_matching_cloud() {
	assert_eq!(Environment::Public.cloud(), CloudConfiguration::AzurePublic);
	assert_eq!(
		Environment::UsGovernment.cloud(),
		CloudConfiguration::AzureGovernment
	);
	assert_eq!(Environment::China.cloud(), CloudConfiguration::AzureChina);
}

#[test]
fn authority_and_scope_stay_paired() {
	for (environment, authority, scope) in [
		(
			Environment::Public,
			"https://login.microsoftonline.com",
			"https://api.fabric.microsoft.com/.default",
		),
		(
			Environment::UsGovernment,
			"https://login.microsoftonline.us",
			"https://api.fabric.microsoft.us/.default",
		),
		(
			Environment::China,
			"https://login.chinacloudapi.cn",
			"https://api.fabric.microsoft.cn/.default",
		),
	] {
		assert_eq!(environment.authority_host(), authority);
		assert_eq!(environment.default_scope(), scope);
	}
}
