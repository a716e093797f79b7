use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::{Sha256, Sha512};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Result type for signing operations: headers to attach to the request
pub type SignatureResult = Result<HashMap<String, String>, ExchangeError>;

/// Signer trait for request authentication
///
/// Each exchange family decides what the signed payload is; the signer only
/// knows how to authenticate it with the account's secret.
pub trait Signer: Send + Sync {
    /// Sign `payload` and return the authentication headers
    fn sign_request(&self, payload: &str) -> SignatureResult;

    /// Next request nonce, strictly increasing for this signer
    fn nonce(&self) -> Result<u64, ExchangeError>;
}

/// Digest used by [`HmacSigner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmacDigest {
    Sha256,
    Sha512,
}

/// HMAC signer producing a hex signature plus an API-key header
pub struct HmacSigner {
    api_key: String,
    secret_key: Secret<String>,
    digest: HmacDigest,
    key_header: String,
    sign_header: String,
    last_nonce: AtomicU64,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("digest", &self.digest)
            .field("key_header", &self.key_header)
            .field("sign_header", &self.sign_header)
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// # Arguments
    /// * `api_key` - API key sent in `key_header`
    /// * `secret_key` - Secret used as the HMAC key
    /// * `digest` - Hash function for the HMAC
    pub fn new(api_key: String, secret_key: Secret<String>, digest: HmacDigest) -> Self {
        Self {
            api_key,
            secret_key,
            digest,
            key_header: "Key".to_string(),
            sign_header: "Sign".to_string(),
            last_nonce: AtomicU64::new(0),
        }
    }

    /// Hex-encoded HMAC of `payload`
    pub fn signature(&self, payload: &str) -> Result<String, ExchangeError> {
        let secret = self.secret_key.expose_secret().as_bytes();
        let bytes = match self.digest {
            HmacDigest::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(secret)
                    .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
                mac.update(payload.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
            HmacDigest::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(secret)
                    .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
                mac.update(payload.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(hex::encode(bytes))
    }

    fn unix_seconds() -> Result<u64, ExchangeError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| ExchangeError::AuthError(format!("Failed to get timestamp: {}", e)))
    }
}

impl Signer for HmacSigner {
    fn sign_request(&self, payload: &str) -> SignatureResult {
        let signature = self.signature(payload)?;

        let mut headers = HashMap::new();
        headers.insert(self.key_header.clone(), self.api_key.clone());
        headers.insert(self.sign_header.clone(), signature);
        Ok(headers)
    }

    fn nonce(&self) -> Result<u64, ExchangeError> {
        let now = Self::unix_seconds()?;
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        Ok(now.max(previous + 1))
    }
}
