//! User store interface used by the credential validator.
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::repos::error::{RepoError, RepoResult};

/// A stored credential: the identifier plus the proof hash the caller must present.
///
/// Read-only from the sign-in path. Key material is not printable via Debug.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "email")]
    pub identifier: String,
    pub password_hash: String,
}

impl UserRecord {
    pub fn new(identifier: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Compare a presented proof with the stored hash in constant time.
    ///
    /// Both sides are digested first so the comparison length never depends on the input.
    pub fn verify_proof(&self, proof: &str) -> bool {
        let presented = Sha256::digest(proof.as_bytes());
        let stored = Sha256::digest(self.password_hash.as_bytes());
        presented.as_slice().ct_eq(stored.as_slice()).into()
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Lookup-by-identifier. Matching is exact and case-sensitive.
///
/// - `Ok(Some(_))` record found
/// - `Ok(None)`    no such user
/// - `Err(_)`      backend failure (the validator treats it as "not found")
#[async_trait]
pub trait UserStore: Send + Sync {
    // Backend name (for logging/health).
    fn backend_name(&self) -> &'static str;

    async fn find(&self, identifier: &str) -> RepoResult<Option<UserRecord>>;
}

/// Process-local store, seeded once at startup.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new<I>(records: I) -> RepoResult<Self>
    where
        I: IntoIterator<Item = UserRecord>,
    {
        let mut users = HashMap::new();
        for record in records {
            if users.contains_key(&record.identifier) {
                return Err(RepoError::DuplicateUser(record.identifier));
            }
            users.insert(record.identifier.clone(), record);
        }
        Ok(Self { users })
    }

    /// Parse a JSON array of `{"email": ..., "password_hash": ...}` objects.
    pub fn from_json(raw: &str) -> RepoResult<Self> {
        let records: Vec<UserRecord> = serde_json::from_str(raw)?;
        Self::new(records)
    }

    pub async fn from_json_file(path: &Path) -> RepoResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find(&self, identifier: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.get(identifier).cloned())
    }
}
