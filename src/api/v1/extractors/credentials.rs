/*
 * Responsibility
 * - pull Email / Passwordhash out of the request headers
 * - missing, empty or non-text values → MalformedRequest naming the field
 * - multiple values: the first one wins
 *
 * Not an axum extractor on purpose: the handler has to count the request
 * before anything here can reject it.
 */
use axum::http::{HeaderMap, HeaderName};
use tracing::warn;

use crate::error::{RequiredField, SigninError};
use crate::services::auth::CredentialRequest;

// http normalises header names to lowercase, so "Email" and "email" are the same key.
static EMAIL: HeaderName = HeaderName::from_static("email");
static PASSWORDHASH: HeaderName = HeaderName::from_static("passwordhash");

pub fn extract_credentials(headers: &HeaderMap) -> Result<CredentialRequest, SigninError> {
    let identifier = required(headers, &EMAIL, RequiredField::Email)?;
    let proof = required(headers, &PASSWORDHASH, RequiredField::Passwordhash)?;

    Ok(CredentialRequest::new(identifier, proof))
}

fn required(
    headers: &HeaderMap,
    name: &HeaderName,
    field: RequiredField,
) -> Result<String, SigninError> {
    let value = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => Ok(v.to_string()),
        None => {
            warn!("{} was not found in the header", field.header_name());
            Err(SigninError::MalformedRequest(field))
        }
    }
}
