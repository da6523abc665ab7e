/**
 * Responsibility
 *  - request → typed input for the v1 handlers
 */
mod credentials;

pub use credentials::extract_credentials;
