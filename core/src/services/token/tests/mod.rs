//! Unit tests for the token services.

mod key_manager_tests;

use std::sync::OnceLock;

use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;

use super::KeyManager;

static TEST_KEY: OnceLock<RsaPrivateKey> = OnceLock::new();

/// One RSA key per test binary; 2048-bit generation is too slow to repeat
/// in every test.
pub(crate) fn test_rsa_key() -> &'static RsaPrivateKey {
    TEST_KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).expect("failed to generate test RSA key")
    })
}

/// PKCS#1 private + PKIX public PEM pair for the shared test key.
pub(crate) fn test_pem_pair() -> (String, String) {
    let key = test_rsa_key();
    let private_pem = key
        .to_pkcs1_pem(LineEnding::LF)
        .expect("failed to encode private key")
        .to_string();
    let public_pem = key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("failed to encode public key");
    (private_pem, public_pem)
}

pub(crate) fn test_key_manager() -> KeyManager {
    let (private_pem, public_pem) = test_pem_pair();
    KeyManager::from_pem(&private_pem, &public_pem).expect("failed to build key manager")
}
