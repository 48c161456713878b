//! Domain Errors
//!
//! Error types for local validation and backend calls.

use thiserror::Error;

/// Message shown when the backend gives no usable explanation
pub const FALLBACK_ERROR_MESSAGE: &str = "The operation could not be completed. Please try again.";

/// Domain layer errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Backend error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Backend { status: u16, message: Option<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl DomainError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text suitable for a user-facing notification
    ///
    /// Backend errors use the server's message when it sent one; transport and
    /// decode failures fall back to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound { entity_type, id } => format!("{} {} not found", entity_type, id),
            Self::Backend {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Backend { .. } | Self::Transport(_) | Self::Decode(_) => {
                FALLBACK_ERROR_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_preferred() {
        let err = DomainError::Backend {
            status: 409,
            message: Some("Stock insuficiente".to_string()),
        };
        assert_eq!(err.user_message(), "Stock insuficiente");
    }

    #[test]
    fn test_fallback_message() {
        let blank = DomainError::Backend {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message(), FALLBACK_ERROR_MESSAGE);
        assert_eq!(
            DomainError::Transport("timed out".to_string()).user_message(),
            FALLBACK_ERROR_MESSAGE
        );
    }
}
