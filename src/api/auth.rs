//! Bearer token verification
//!
//! Tokens are self-contained: `<user_id_b64>.<expires_unix>.<signature>`
//! where the signature is a SHA-256 digest keyed with the server
//! secret. Verifying a token never touches storage.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Resolves a bearer token to a user id, or rejects it
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<String>;
}

/// Signed-token verifier keyed with a shared server secret
pub struct SignedTokenVerifier {
    secret: String,
}

impl SignedTokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Issue a token for a user, valid for `ttl`
    pub fn issue(&self, user_id: &str, ttl: Duration) -> String {
        let user_b64 = URL_SAFE_NO_PAD.encode(user_id);
        let expires = now_unix() + ttl.as_secs();
        let payload = format!("{}.{}", user_b64, expires);
        let signature = self.sign(&payload);
        format!("{}.{}", payload, signature)
    }

    fn sign(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(b".");
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl TokenVerifier for SignedTokenVerifier {
    fn verify(&self, token: &str) -> Option<String> {
        let mut parts = token.splitn(3, '.');
        let user_b64 = parts.next()?;
        let expires_str = parts.next()?;
        let signature = parts.next()?;

        let payload = format!("{}.{}", user_b64, expires_str);
        if self.sign(&payload) != signature {
            return None;
        }

        let expires: u64 = expires_str.parse().ok()?;
        if expires <= now_unix() {
            return None;
        }

        let user_bytes = URL_SAFE_NO_PAD.decode(user_b64).ok()?;
        String::from_utf8(user_bytes).ok()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
