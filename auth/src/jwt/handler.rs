use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// HS256 token signer and verifier.
///
/// Built from a process-wide secret. An empty secret yields a handler that refuses
/// to sign or verify anything, so a missing secret surfaces as
/// [`JwtError::SecretNotConfigured`] on first use instead of producing tokens
/// signed with an empty key.
pub struct JwtHandler {
    keys: Option<(EncodingKey, DecodingKey)>,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let keys = (!secret.is_empty()).then(|| {
            (
                EncodingKey::from_secret(secret),
                DecodingKey::from_secret(secret),
            )
        });

        Self {
            keys,
            algorithm: Algorithm::HS256,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Sign claims into a compact token.
    ///
    /// # Errors
    /// * `SecretNotConfigured` - Handler was built without a secret
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let (encoding_key, _) = self.keys.as_ref().ok_or(JwtError::SecretNotConfigured)?;

        encode(&Header::new(self.algorithm), claims, encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Verify signature and expiry of a token as of `now` (Unix timestamp).
    ///
    /// # Errors
    /// * `SecretNotConfigured` - Handler was built without a secret
    /// * `InvalidSignature` - Signature does not match header and payload
    /// * `DecodingFailed` - Token is malformed
    /// * `MissingClaim` - Token carries no `exp`
    /// * `TokenExpired` - `now` is past `exp`
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let (_, decoding_key) = self.keys.as_ref().ok_or(JwtError::SecretNotConfigured)?;

        // Expiry is checked below against the caller's clock.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::DecodingFailed(e.to_string()),
            })?
            .claims;

        if claims.exp.is_none() {
            return Err(JwtError::MissingClaim("exp".to_string()));
        }
        if claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}
