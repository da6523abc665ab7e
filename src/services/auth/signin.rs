use tracing::{info, warn};

use crate::error::{AuthFailure, SigninError};
use crate::services::auth::{
    credentials::CredentialRequest,
    token_issuer::{SignedToken, TokenIssuer},
    validator::{CredentialCheck, CredentialValidator},
};

const REDACTED: &str = "<redacted>";

/// What the success log line is allowed to contain.
///
/// - `raw_token`: log the bearer token itself instead of its fingerprint
/// - `identifier`: include the caller's identifier for correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuanceLogPolicy {
    pub raw_token: bool,
    pub identifier: bool,
}

impl Default for IssuanceLogPolicy {
    fn default() -> Self {
        Self {
            raw_token: false,
            identifier: true,
        }
    }
}

/// Validate → issue for one already-extracted credential request.
///
/// - CredentialValidator decides whether the credential is good.
/// - TokenIssuer mints the bearer token.
///
/// Counting and response shaping stay in the handler.
#[derive(Clone, Debug)]
pub struct SigninService {
    validator: CredentialValidator,
    issuer: TokenIssuer,
    log_policy: IssuanceLogPolicy,
}

impl SigninService {
    pub fn new(
        validator: CredentialValidator,
        issuer: TokenIssuer,
        log_policy: IssuanceLogPolicy,
    ) -> Self {
        Self {
            validator,
            issuer,
            log_policy,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.validator.store_backend()
    }

    pub async fn sign_in(&self, request: &CredentialRequest) -> Result<SignedToken, SigninError> {
        let email = self.loggable_identifier(&request.identifier);

        match self
            .validator
            .validate(&request.identifier, &request.proof)
            .await
        {
            CredentialCheck::Valid => {}
            CredentialCheck::NotFound => {
                warn!(email, "User does not exist");
                return Err(SigninError::Unauthenticated(AuthFailure::UnknownUser));
            }
            CredentialCheck::InvalidProof => {
                warn!(email, "Password is wrong");
                return Err(SigninError::Unauthenticated(AuthFailure::IncorrectPassword));
            }
        }

        let token = self.issuer.issue()?;

        if self.log_policy.raw_token {
            info!(email, token = token.as_str(), "Token sign");
        } else {
            info!(email, token_fingerprint = %token.fingerprint(), "Token sign");
        }

        Ok(token)
    }

    fn loggable_identifier<'a>(&self, identifier: &'a str) -> &'a str {
        if self.log_policy.identifier {
            identifier
        } else {
            REDACTED
        }
    }
}
