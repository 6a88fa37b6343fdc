//! Stateless session tokens.
//!
//! Tokens are HS256 JWTs signed with the process-wide `PORTAL_TOKEN_SECRET`.
//! Validity is entirely signature + expiry: there is no server-side session
//! table, and consequently no way to revoke a token before its 24-hour
//! expiry. That is an accepted limitation of the stateless design, not a
//! gap to patch - the only recovery path for a compromised token is
//! rotating the signing secret.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use branchboard_core::Role;

use super::Principal;

/// Token lifetime: 24 hours, fixed.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Errors from the token service.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signing failed. This is a server fault (bad key material), never a
    /// caller fault.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token did not verify: bad signature, malformed payload, or
    /// expired. Deliberately carries no detail - callers treat every
    /// variant of "invalid" identically (re-authenticate).
    #[error("invalid token")]
    Invalid,
}

/// The verified contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier (email).
    pub sub: String,
    /// Role at issuance.
    pub role: Role,
    /// Branch scope for `Branch` principals; `None` for the admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds (`iat` + 24h).
    pub exp: i64,
}

/// Issues and verifies session tokens.
///
/// Holds the derived signing/verifying keys; the secret itself is only
/// touched at construction.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry; the 24h window is generous enough without leeway.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for a principal, valid for 24 hours from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let iat = chrono::Utc::now().timestamp();
        self.encode_claims(&Claims {
            sub: principal.email.as_str().to_owned(),
            role: principal.role,
            branch: principal.branch.clone(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] on signature mismatch, malformed
    /// payload, or expiry. The distinction is logged nowhere and exposed
    /// nowhere; callers redirect to login either way.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }
}
