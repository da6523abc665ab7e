use std::fmt;

/// Identifier + proof pulled from an inbound sign-in request.
///
/// Both fields are non-empty once constructed by the extractor.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    pub identifier: String,
    /// Client-side hash of the password. Never a plaintext password.
    pub proof: String,
}

impl CredentialRequest {
    pub fn new(identifier: impl Into<String>, proof: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            proof: proof.into(),
        }
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}
