//! RSA signing key management: a `kid`-indexed key set with hot rotation,
//! overlapping verification windows, and a JWKS view.
//!
//! The set holds exactly one *current* key (used for signing) plus any
//! retired keys still inside their grace window (used for verification
//! only). Expired keys are purged by [`KeyManager::cleanup`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration as StdDuration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult, TokenError};

/// The only signing algorithm this service mints or accepts.
pub const JWT_ALGORITHM: &str = "RS256";

const RSA_KEY_BITS: usize = 2048;

/// A single signing key and its metadata.
struct SigningKey {
    kid: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key: RsaPublicKey,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    /// `None` until the key is superseded by a rotation.
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("expires_at", &self.expires_at)
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl SigningKey {
    fn build(kid: String, private_key: &RsaPrivateKey, public_key: RsaPublicKey) -> DomainResult<Self> {
        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| bad_key(format!("failed to encode private key: {}", e)))?;
        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| bad_key(format!("unusable private key: {}", e)))?;

        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| bad_key(format!("failed to encode public key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| bad_key(format!("unusable public key: {}", e)))?;

        Ok(Self {
            kid,
            encoding_key,
            decoding_key,
            public_key,
            created_at: Utc::now(),
            expires_at: None,
            is_active: true,
        })
    }

    fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires| expires > now)
    }
}

#[derive(Debug)]
struct KeyState {
    keys: HashMap<String, SigningKey>,
    current_kid: String,
}

/// Manager for the JWT signing key set.
///
/// One read-write lock guards the whole set. Signers and verifiers hold
/// the read lock only long enough to clone a key handle; rotation and
/// cleanup take the write lock.
pub struct KeyManager {
    state: RwLock<KeyState>,
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager").finish_non_exhaustive()
    }
}

impl KeyManager {
    /// Seed the key set from a PEM-encoded key pair.
    ///
    /// The private key may be PKCS#1 or PKCS#8; the public key PKIX or
    /// PKCS#1. The initial key gets a freshly generated `kid` and no
    /// expiry.
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> DomainResult<Self> {
        let private_key = parse_rsa_private_key(private_key_pem)?;
        let public_key = parse_rsa_public_key(public_key_pem)?;

        let kid = Uuid::new_v4().to_string();
        let key = SigningKey::build(kid.clone(), &private_key, public_key)?;

        let mut keys = HashMap::new();
        keys.insert(kid.clone(), key);

        Ok(Self {
            state: RwLock::new(KeyState {
                keys,
                current_kid: kid,
            }),
        })
    }

    /// The current signing key and its `kid`.
    pub fn current_signing_key(&self) -> DomainResult<(EncodingKey, String)> {
        let state = self.read_state();
        state
            .keys
            .get(&state.current_kid)
            .filter(|key| key.is_active)
            .map(|key| (key.encoding_key.clone(), key.kid.clone()))
            .ok_or_else(|| DomainError::Internal {
                message: "no active signing key".to_string(),
            })
    }

    /// The verification key for `kid`, if that key is active and inside
    /// its validity window.
    pub fn public_key_by_kid(&self, kid: &str) -> DomainResult<DecodingKey> {
        let state = self.read_state();
        state
            .keys
            .get(kid)
            .filter(|key| key.is_usable(Utc::now()))
            .map(|key| key.decoding_key.clone())
            .ok_or_else(|| TokenError::UnknownKey { kid: kid.to_string() }.into())
    }

    /// Snapshot of every active, unexpired public key as a JWK set.
    pub fn jwk_set(&self) -> JwkSet {
        let state = self.read_state();
        let now = Utc::now();

        let mut keys: Vec<Jwk> = state
            .keys
            .values()
            .filter(|key| key.is_usable(now))
            .map(|key| Jwk::from_rsa(&key.public_key, &key.kid))
            .collect();
        keys.sort_by(|a, b| a.kid.cmp(&b.kid));

        JwkSet { keys }
    }

    /// Generate a fresh RSA-2048 key, make it current, and stamp the
    /// previous current key to expire after `grace`. Older retired keys
    /// keep their existing expiry.
    pub fn rotate(&self, grace: StdDuration) -> DomainResult<String> {
        // Key generation is CPU-heavy; do it before taking the lock.
        let private_key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(|e| {
            DomainError::Internal {
                message: format!("failed to generate RSA key: {}", e),
            }
        })?;
        let public_key = private_key.to_public_key();

        let kid = Uuid::new_v4().to_string();
        let key = SigningKey::build(kid.clone(), &private_key, public_key)?;

        let mut state = self.write_state();
        let now = Utc::now();
        let previous_kid = state.current_kid.clone();
        if let Some(previous) = state.keys.get_mut(&previous_kid) {
            previous.expires_at = Some(now + Duration::seconds(grace.as_secs() as i64));
        }
        state.keys.insert(kid.clone(), key);
        state.current_kid = kid.clone();

        Ok(kid)
    }

    /// Remove keys whose expiry has passed. Returns how many were purged.
    pub fn cleanup(&self) -> usize {
        let mut state = self.write_state();
        let now = Utc::now();
        let before = state.keys.len();
        state
            .keys
            .retain(|_, key| key.expires_at.map_or(true, |expires| expires > now));
        before - state.keys.len()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, KeyState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, KeyState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A single JSON Web Key in the published key set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub n: String,
    pub e: String,
    pub kid: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: String,
}

impl Jwk {
    fn from_rsa(public_key: &RsaPublicKey, kid: &str) -> Self {
        Self {
            kty: String::from("RSA"),
            n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
            kid: kid.to_string(),
            alg: JWT_ALGORITHM.to_string(),
            key_use: String::from("sig"),
        }
    }
}

/// JWKS document served from the discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

fn bad_key(message: String) -> DomainError {
    TokenError::BadKey { message }.into()
}

/// Parse a PEM-encoded RSA private key, accepting PKCS#1 and PKCS#8.
fn parse_rsa_private_key(pem: &str) -> DomainResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| bad_key(format!("failed to parse private key: {}", e)))
}

/// Parse a PEM-encoded RSA public key, accepting PKIX and PKCS#1.
fn parse_rsa_public_key(pem: &str) -> DomainResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| bad_key(format!("failed to parse public key: {}", e)))
}
