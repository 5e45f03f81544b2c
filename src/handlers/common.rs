use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by delete endpoints (200 with a message, not 204).
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
