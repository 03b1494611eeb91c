/*
 * Responsibility
 * - Public entry points for router-level middleware
 * - auth::bearer::apply(...), auth::permission::require(...), cors::apply(...), http::apply(...)
 */
pub mod auth;
pub mod cors;
pub mod http;
