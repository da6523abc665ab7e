/*
 * Responsibility
 * - sign-in failure taxonomy (malformed / unauthenticated / configuration / signing)
 * - IntoResponse: fixed status + fixed plaintext body, nothing else leaks
 * - which outcome counter a failure lands in
 */
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::jwt::SignError;
use crate::services::metrics::SigninOutcome;

/// Request headers the sign-in endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Email,
    Passwordhash,
}

impl RequiredField {
    pub fn header_name(&self) -> &'static str {
        match self {
            RequiredField::Email => "Email",
            RequiredField::Passwordhash => "Passwordhash",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

/// Why credentials were rejected. Both map to the same status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownUser,
    IncorrectPassword,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::UnknownUser => f.write_str("user does not exist"),
            AuthFailure::IncorrectPassword => f.write_str("incorrect password"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SigninError {
    #[error("{0} missing")]
    MalformedRequest(RequiredField),

    #[error("{0}")]
    Unauthenticated(AuthFailure),

    #[error("empty signing secret")]
    Configuration,

    #[error("unable to sign the token: {0}")]
    Signing(#[from] SignError),
}

impl SigninError {
    pub fn status(&self) -> StatusCode {
        match self {
            SigninError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            SigninError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SigninError::Configuration | SigninError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The only text a client ever sees for this failure.
    pub fn public_message(&self) -> &'static str {
        match self {
            SigninError::MalformedRequest(RequiredField::Email) => "Email Missing",
            SigninError::MalformedRequest(RequiredField::Passwordhash) => "Passwordhash Missing",
            SigninError::Unauthenticated(AuthFailure::UnknownUser) => "User Does not Exist",
            SigninError::Unauthenticated(AuthFailure::IncorrectPassword) => "Incorrect Password",
            SigninError::Configuration | SigninError::Signing(_) => "Internal Server Error",
        }
    }

    // Client faults count as `fail`, server faults as `error`.
    pub fn outcome(&self) -> SigninOutcome {
        match self {
            SigninError::MalformedRequest(_) | SigninError::Unauthenticated(_) => {
                SigninOutcome::Fail
            }
            SigninError::Configuration | SigninError::Signing(_) => SigninOutcome::Error,
        }
    }
}

impl IntoResponse for SigninError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
