use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::error;
use uuid::Uuid;

use crate::error::SigninError;
use crate::services::auth::jwt::TokenSigner;
use crate::services::auth::secret::SecretSource;

/// Claims embedded in every sign-in token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninClaims {
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Bearer token handed back to an authenticated caller. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Short SHA-256 fingerprint, safe to log in place of the token.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..8])
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedToken({})", self.fingerprint())
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    audience: String,
    ttl_seconds: u64,
    signer: Arc<dyn TokenSigner>,
    secrets: Arc<dyn SecretSource>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("algorithm", &self.signer.algorithm())
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(
        issuer: String,
        audience: String,
        ttl_seconds: u64,
        signer: Arc<dyn TokenSigner>,
        secrets: Arc<dyn SecretSource>,
    ) -> Self {
        Self {
            issuer,
            audience,
            ttl_seconds,
            signer,
            secrets,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a token that expires `ttl_seconds` from now.
    pub fn issue(&self) -> Result<SignedToken, SigninError> {
        self.issue_at(chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, now: i64) -> Result<SignedToken, SigninError> {
        let secret = self.secrets.signing_secret().ok_or_else(|| {
            error!("unable to sign the token: empty signing secret");
            SigninError::Configuration
        })?;

        let claims = self.claims_at(now);
        let token = self
            .signer
            .sign(&claims, secret.as_bytes())
            .map_err(|e| {
                error!(error = %e, algorithm = self.signer.algorithm(), "unable to sign the token");
                SigninError::Signing(e)
            })?;

        Ok(SignedToken(token))
    }

    fn claims_at(&self, now: i64) -> SigninClaims {
        SigninClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: now.saturating_add(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX)),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }
}
