/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - verifier: TokenVerifier (read-only after startup)
 *   - messages: in-memory store behind the demo routes
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::v1::dto::messages::MessageResponse;
use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub messages: Arc<RwLock<Vec<MessageResponse>>>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self {
            verifier,
            messages: Arc::default(),
        }
    }
}
