//! Error body - Backend error payload

use serde::Deserialize;

/// Error payload returned with a non-success status
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse a response body, accepting anything that is not JSON as no message
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Human-readable message, `message` taking precedence over `error`
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field() {
        let body = ErrorBody::parse(r#"{"message":"Posicion inexistente"}"#);
        assert_eq!(body.into_message().as_deref(), Some("Posicion inexistente"));
    }

    #[test]
    fn test_error_field_and_garbage() {
        let body = ErrorBody::parse(r#"{"error":"Stock insuficiente"}"#);
        assert_eq!(body.into_message().as_deref(), Some("Stock insuficiente"));
        assert!(ErrorBody::parse("<html>502</html>").into_message().is_none());
    }
}
