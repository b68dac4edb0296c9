//! JSON response envelope.
//!
//! Success: `{success: true, message, data}`.
//! Error: `{success: false, message, error, details?}`.

use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// Successful response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true.
    pub success: bool,
    /// Human readable message.
    pub message: String,
    /// Payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps `data` in a success envelope.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,
    /// Human readable message.
    pub message: String,
    /// Machine readable code.
    pub error: &'static str,
    /// Optional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            message: err.client_message(),
            error: err.error_code(),
            details: err.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::ok("OK", json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "message": "OK", "data": {"id": 1}}));
    }

    #[test]
    fn test_error_envelope_omits_empty_details() {
        let err = AppError::validation("MISSING_FIELDS", "Field wajib diisi");
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Field wajib diisi", "error": "MISSING_FIELDS"})
        );
    }

    #[test]
    fn test_error_envelope_hides_internal_detail() {
        let err = AppError::Database("syntax error at or near".into());
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("syntax"));
    }
}
