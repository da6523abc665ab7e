/**
 * Responsibility
 * - what a user store can report to the layers above
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),

    #[error("users file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("users file malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate user record: {0}")]
    DuplicateUser(String),
}

pub type RepoResult<T> = Result<T, RepoError>;
