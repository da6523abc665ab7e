/*
 * Responsibility
 * - public surface of v1 (re-export routes())
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
