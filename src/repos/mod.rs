pub mod error;
pub mod user_repo;
pub mod user_store;

pub use user_repo::PgUserStore;
pub use user_store::{InMemoryUserStore, UserRecord, UserStore};
