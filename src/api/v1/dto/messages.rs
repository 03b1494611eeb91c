/*
 * Responsibility
 * - Messages request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_TEXT_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub text: String,
}

impl CreateMessageRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("text is required");
        }
        if self.text.chars().count() > MAX_TEXT_CHARS {
            return Err("text is too long");
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: usize,
    pub text: String,
    pub author: Option<String>, // `sub` of the token that created it
    pub created_at: DateTime<Utc>,
}
