/*
 * Responsibility
 * - middleware public interface (re-export)
 */
pub mod http;
pub mod security_headers;
