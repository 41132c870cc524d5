use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Fresh self-signed certificate plus PKCS#8 key, both DER.
pub fn random_cert() -> (Vec<u8>, Vec<u8>) {
	let key = rcgen::KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).expect("generate key");
	let cert = rcgen::CertificateParams::new(vec!["fabric-auth.test".to_string()])
		.expect("certificate params")
		.self_signed(&key)
		.expect("self-sign certificate");
	(cert.der().as_ref().to_vec(), key.serialize_der())
}

/// A random certificate and key bundled as a PKCS#12 container, base64
/// encoded the way the provider configuration supplies it.
pub fn random_p12_b64(password: &str) -> String {
	let (cert_der, key_der) = random_cert();
	let pfx = p12::PFX::new(&cert_der, &key_der, None, password, "fabric-auth-test")
		.expect("build PKCS#12 container");
	STANDARD.encode(pfx.to_der())
}

pub fn random_uuid() -> String {
	uuid::Uuid::new_v4().to_string()
}
