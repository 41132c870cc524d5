use std::fmt;
use std::path::Path;

use azure_core::http::ClientMethodOptions;
use azure_identity::ClientAssertion;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rustls_pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use serde::Serialize;
use sha1::{Digest, Sha1};
use x509_parser::prelude::X509Certificate;
use x509_parser::prelude::FromDer;

use crate::config::Environment;

#[cfg(test)]
#[path = "certs_tests.rs"]
mod tests;

/// Validity window of a self-signed client assertion.
const ASSERTION_LIFETIME_SECS: i64 = 600;

#[derive(thiserror::Error, Debug)]
pub enum CertificateError {
	#[error("client certificate data is empty")]
	Empty,

	#[error("client certificate is not valid base64: {0}")]
	Base64(#[from] base64::DecodeError),

	#[error("cannot decode PKCS#12 bundle: {0}")]
	Pkcs12(String),

	#[error("no certificate found in PKCS#12 bundle")]
	NoCertificate,

	#[error("no private key found in PKCS#12 bundle")]
	NoPrivateKey,

	#[error("cannot read certificate file: {0}")]
	File(#[from] std::io::Error),

	#[error("unsupported private key type for client assertion")]
	UnsupportedKey,

	#[error("cannot sign client assertion: {0}")]
	Sign(#[from] jsonwebtoken::errors::Error),
}

/// Decodes a base64-encoded PKCS#12 bundle into its certificate chain and
/// private key. An empty password means the bundle is unprotected.
///
/// The chain holds exactly the certificates stored in the container, leaf
/// first; no chain-of-trust reconstruction is attempted. The decoded key is
/// handed to the caller, no copy is retained.
pub fn decode_certificate(
	b64_pfx: &str,
	password: &str,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), CertificateError> {
	if b64_pfx.trim().is_empty() {
		return Err(CertificateError::Empty);
	}
	let der = STANDARD.decode(b64_pfx.trim())?;

	let pfx = p12::PFX::parse(&der).map_err(|e| CertificateError::Pkcs12(format!("{e:?}")))?;
	if !pfx.verify_mac(password) {
		return Err(CertificateError::Pkcs12("MAC verification failed".to_string()));
	}
	let keys = pfx
		.key_bags(password)
		.map_err(|e| CertificateError::Pkcs12(format!("{e:?}")))?;
	let certs = pfx
		.cert_x509_bags(password)
		.map_err(|e| CertificateError::Pkcs12(format!("{e:?}")))?;

	let key = keys.into_iter().next().ok_or(CertificateError::NoPrivateKey)?;
	let chain: Vec<CertificateDer<'static>> = certs.into_iter().map(CertificateDer::from).collect();
	if chain.is_empty() {
		return Err(CertificateError::NoCertificate);
	}

	Ok((chain, PrivateKeyDer::from(PrivatePkcs8KeyDer::from(key))))
}

/// Reads a file and returns its contents as standard base64. Used for
/// certificate bundles supplied by file path instead of inline.
pub fn file_to_base64(path: impl AsRef<Path>) -> Result<String, CertificateError> {
	let contents = fs_err::read(path.as_ref())?;
	Ok(STANDARD.encode(contents))
}

/// Client assertion signed with a service principal's certificate key.
///
/// Entra ID accepts a JWT signed by the registered certificate in place of
/// a client secret. The assertion is rebuilt on every request so its `exp`
/// window stays short; no crypto or network work happens at construction.
pub struct CertificateAssertion {
	audience: String,
	client_id: String,
	chain: Vec<CertificateDer<'static>>,
	key: PrivateKeyDer<'static>,
}

impl fmt::Debug for CertificateAssertion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CertificateAssertion")
			.field("audience", &self.audience)
			.field("client_id", &self.client_id)
			.finish_non_exhaustive()
	}
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
	aud: &'a str,
	iss: &'a str,
	sub: &'a str,
	jti: String,
	iat: i64,
	nbf: i64,
	exp: i64,
}

impl CertificateAssertion {
	pub fn new(
		environment: Environment,
		tenant_id: &str,
		client_id: &str,
		chain: Vec<CertificateDer<'static>>,
		key: PrivateKeyDer<'static>,
	) -> Self {
		let audience = format!(
			"{}/{}/oauth2/v2.0/token",
			environment.authority_host(),
			tenant_id
		);
		Self {
			audience,
			client_id: client_id.to_string(),
			chain,
			key,
		}
	}

	fn build(&self) -> Result<String, CertificateError> {
		let leaf = self.chain.first().ok_or(CertificateError::NoCertificate)?;

		let (alg, encoding_key) = signing_key(leaf, &self.key)?;
		let mut header = Header::new(alg);
		header.x5t = Some(URL_SAFE_NO_PAD.encode(Sha1::digest(leaf.as_ref())));

		let now = time::OffsetDateTime::now_utc().unix_timestamp();
		let claims = AssertionClaims {
			aud: &self.audience,
			iss: &self.client_id,
			sub: &self.client_id,
			jti: uuid::Uuid::new_v4().to_string(),
			iat: now,
			nbf: now,
			exp: now + ASSERTION_LIFETIME_SECS,
		};
		Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
	}
}

#[async_trait::async_trait]
impl ClientAssertion for CertificateAssertion {
	async fn secret(&self, _options: Option<ClientMethodOptions<'_>>) -> azure_core::Result<String> {
		self.build().map_err(|e| {
			azure_core::Error::with_message_fn(azure_core::error::ErrorKind::Credential, || {
				e.to_string()
			})
		})
	}
}

/// Picks the JWS algorithm from the leaf certificate's public key and
/// prepares the matching signing key. Entra ID requires RS256 for RSA
/// certificates; ES256 covers EC material.
fn signing_key(
	leaf: &CertificateDer<'static>,
	key: &PrivateKeyDer<'static>,
) -> Result<(Algorithm, EncodingKey), CertificateError> {
	let (_, parsed) = X509Certificate::from_der(leaf.as_ref())
		.map_err(|e| CertificateError::Pkcs12(format!("{e:?}")))?;
	let alg_oid = &parsed.tbs_certificate.subject_pki.algorithm.algorithm;

	let pem = key_to_pem(key);
	if *alg_oid == x509_parser::oid_registry::OID_PKCS1_RSAENCRYPTION {
		Ok((Algorithm::RS256, EncodingKey::from_rsa_pem(pem.as_bytes())?))
	} else if *alg_oid == x509_parser::oid_registry::OID_KEY_TYPE_EC_PUBLIC_KEY {
		Ok((Algorithm::ES256, EncodingKey::from_ec_pem(pem.as_bytes())?))
	} else {
		Err(CertificateError::UnsupportedKey)
	}
}

fn key_to_pem(key: &PrivateKeyDer<'_>) -> String {
	let (label, der) = match key {
		PrivateKeyDer::Pkcs1(k) => ("RSA PRIVATE KEY", k.secret_pkcs1_der()),
		PrivateKeyDer::Sec1(k) => ("EC PRIVATE KEY", k.secret_sec1_der()),
		PrivateKeyDer::Pkcs8(k) => ("PRIVATE KEY", k.secret_pkcs8_der()),
		_ => ("PRIVATE KEY", &[][..]),
	};
	let b64 = STANDARD.encode(der);
	let mut pem = format!("-----BEGIN {label}-----\n");
	let mut rest = b64.as_str();
	while !rest.is_empty() {
		let (line, tail) = rest.split_at(rest.len().min(64));
		pem.push_str(line);
		pem.push('\n');
		rest = tail;
	}
	pem.push_str(&format!("-----END {label}-----\n"));
	pem
}
