use jsonwebtoken::{Algorithm, EncodingKey, Header};
use thiserror::Error;

use crate::services::auth::token_issuer::SigninClaims;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("jwt encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Token-signing capability: `sign(claims, secret) -> token | error`.
///
/// The issuer only talks to this trait, so another algorithm can be dropped in
/// without touching the sign-in flow.
pub trait TokenSigner: Send + Sync {
    fn algorithm(&self) -> &'static str;

    fn sign(&self, claims: &SigninClaims, secret: &[u8]) -> Result<String, SignError>;
}

/// HMAC-SHA-256 JWT signer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hs256Signer;

impl TokenSigner for Hs256Signer {
    fn algorithm(&self) -> &'static str {
        "HS256"
    }

    fn sign(&self, claims: &SigninClaims, secret: &[u8]) -> Result<String, SignError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }
}
