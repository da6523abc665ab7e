use std::{fmt, sync::Arc};

use tracing::warn;

use crate::repos::user_store::{UserRecord, UserStore};

const DECOY_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Result of checking a presented credential against the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Valid,
    InvalidProof,
    NotFound,
}

#[derive(Clone)]
pub struct CredentialValidator {
    store: Arc<dyn UserStore>,
    // Compared against when the identifier is unknown, so both rejections cost the same.
    decoy: UserRecord,
}

impl fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialValidator")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl CredentialValidator {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            decoy: UserRecord::new("", DECOY_HASH),
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Look the identifier up and compare the proof.
    ///
    /// A store failure is logged and reported as `NotFound`.
    pub async fn validate(&self, identifier: &str, proof: &str) -> CredentialCheck {
        let found = match self.store.find(identifier).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, backend = self.store.backend_name(), "user lookup failed");
                None
            }
        };

        match found {
            Some(record) if record.verify_proof(proof) => CredentialCheck::Valid,
            Some(_) => CredentialCheck::InvalidProof,
            None => {
                std::hint::black_box(self.decoy.verify_proof(proof));
                CredentialCheck::NotFound
            }
        }
    }
}
