//! Unit tests for the signing key manager.

use std::time::Duration;

use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};

use crate::errors::{DomainError, TokenError};
use crate::services::token::KeyManager;

use super::{test_key_manager, test_pem_pair, test_rsa_key};

const GRACE: Duration = Duration::from_secs(14 * 24 * 3600);

#[test]
fn seeds_from_pkcs1_private_and_pkix_public() {
    let manager = test_key_manager();

    let (_, kid) = manager.current_signing_key().unwrap();
    assert!(!kid.is_empty());
    assert!(manager.public_key_by_kid(&kid).is_ok());
}

#[test]
fn seeds_from_pkcs8_private_and_pkcs1_public() {
    let key = test_rsa_key();
    let private_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();
    let public_pem = key
        .to_public_key()
        .to_pkcs1_pem(LineEnding::LF)
        .unwrap()
        .to_string();

    let manager = KeyManager::from_pem(&private_pem, &public_pem).unwrap();
    assert!(manager.current_signing_key().is_ok());
}

#[test]
fn rejects_malformed_pem() {
    let (private_pem, public_pem) = test_pem_pair();

    let err = KeyManager::from_pem("not a key", &public_pem).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::BadKey { .. })));

    let err = KeyManager::from_pem(&private_pem, "not a key").unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::BadKey { .. })));
}

#[test]
fn unknown_kid_is_rejected() {
    let manager = test_key_manager();
    let err = match manager.public_key_by_kid("no-such-kid") {
        Err(e) => e,
        Ok(_) => panic!("expected an error"),
    };
    assert!(matches!(
        err,
        DomainError::Token(TokenError::UnknownKey { kid }) if kid == "no-such-kid"
    ));
}

#[test]
fn rotation_switches_current_and_keeps_old_key_inside_grace() {
    let manager = test_key_manager();
    let (_, old_kid) = manager.current_signing_key().unwrap();

    let new_kid = manager.rotate(GRACE).unwrap();
    assert_ne!(new_kid, old_kid);

    let (_, current_kid) = manager.current_signing_key().unwrap();
    assert_eq!(current_kid, new_kid);

    // The retired key stays available for verification until grace ends.
    assert!(manager.public_key_by_kid(&old_kid).is_ok());
    assert!(manager.public_key_by_kid(&new_kid).is_ok());

    let jwks = manager.jwk_set();
    assert_eq!(jwks.keys.len(), 2);
}

#[test]
fn zero_grace_retires_old_key_immediately() {
    let manager = test_key_manager();
    let (_, old_kid) = manager.current_signing_key().unwrap();

    manager.rotate(Duration::ZERO).unwrap();

    let err = match manager.public_key_by_kid(&old_kid) {
        Err(e) => e,
        Ok(_) => panic!("expected an error"),
    };
    assert!(matches!(
        err,
        DomainError::Token(TokenError::UnknownKey { .. })
    ));

    assert_eq!(manager.jwk_set().keys.len(), 1);
    assert_eq!(manager.cleanup(), 1);
    assert_eq!(manager.jwk_set().keys.len(), 1);
}

#[test]
fn jwk_set_entries_carry_rs256_metadata() {
    let manager = test_key_manager();
    let (_, kid) = manager.current_signing_key().unwrap();

    let jwks = manager.jwk_set();
    assert_eq!(jwks.keys.len(), 1);

    let jwk = &jwks.keys[0];
    assert_eq!(jwk.kid, kid);
    assert_eq!(jwk.kty, "RSA");
    assert_eq!(jwk.alg, "RS256");
    assert_eq!(jwk.key_use, "sig");
    assert!(!jwk.n.is_empty());
    assert!(!jwk.e.is_empty());

    // The serialized form must use the reserved `use` member name.
    let json = serde_json::to_value(jwk).unwrap();
    assert_eq!(json["use"], "sig");
}
