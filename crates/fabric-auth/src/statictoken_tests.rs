use azure_core::credentials::TokenCredential;

use super::StaticTokenCredential;

const SCOPE: &[&str] = &["https://api.fabric.microsoft.com/.default"];

#[tokio::test]
async fn returns_the_token_verbatim() {
	let cred = StaticTokenCredential::new("abc");
	let token = cred.get_token(SCOPE, None).await.unwrap();
	assert_eq!(token.token.secret(), "abc");
}

#[tokio::test]
async fn every_call_returns_the_same_token() {
	let cred = StaticTokenCredential::new("abc");
	let first = cred.get_token(SCOPE, None).await.unwrap();
	let second = cred.get_token(SCOPE, None).await.unwrap();
	assert_eq!(first.token.secret(), second.token.secret());
}

#[tokio::test]
async fn empty_token_is_accepted_at_construction() {
	// Permissive by default: emptiness only surfaces downstream when the
	// API rejects the request.
	let cred = StaticTokenCredential::new("");
	let token = cred.get_token(SCOPE, None).await.unwrap();
	assert!(token.token.secret().is_empty());
}
