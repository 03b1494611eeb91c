/*
 * Responsibility
 * - bearer: authentication (Authorization header → verified Credentials)
 * - permission: coarse authorization (one permission string per route)
 */
pub mod bearer;
pub mod permission;
