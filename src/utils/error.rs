use std::fmt;
use thiserror::Error;

/// 派送流程中可能逾時的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Credential,
    Delivery,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStage::Credential => write!(f, "Access token request"),
            DispatchStage::Delivery => write!(f, "Mail delivery"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Dispatch,
    Configuration,
    Internal,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingField { fields: Vec<String> },

    #[error("Invalid email format: {value}")]
    InvalidEmailFormat { value: String },

    #[error("Invalid request payload: {message}")]
    InvalidPayload { message: String },

    #[error("Failed to obtain access token: {message}")]
    CredentialError { message: String },

    #[error("Mail delivery failed: {message}")]
    DeliveryError { message: String },

    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: DispatchStage, seconds: u64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::MissingField { .. }
            | RelayError::InvalidEmailFormat { .. }
            | RelayError::InvalidPayload { .. } => ErrorCategory::Validation,
            RelayError::CredentialError { .. }
            | RelayError::DeliveryError { .. }
            | RelayError::Timeout { .. } => ErrorCategory::Dispatch,
            RelayError::ConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            RelayError::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// 呼叫端的輸入錯誤，訊息只描述呼叫端自己的資料，可原樣回傳
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let missing = RelayError::MissingField {
            fields: vec!["name".to_string(), "query".to_string()],
        };
        assert_eq!(missing.status_code(), 400);
        assert_eq!(missing.to_string(), "Missing required fields: name, query");

        let invalid = RelayError::InvalidEmailFormat {
            value: "plainaddress".to_string(),
        };
        assert!(invalid.is_client_error());
        assert_eq!(invalid.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_dispatch_errors_map_to_server_error() {
        let timeout = RelayError::Timeout {
            stage: DispatchStage::Credential,
            seconds: 10,
        };
        assert_eq!(timeout.status_code(), 500);
        assert_eq!(timeout.to_string(), "Access token request timed out after 10s");

        let delivery = RelayError::DeliveryError {
            message: "quota exceeded".to_string(),
        };
        assert_eq!(delivery.category(), ErrorCategory::Dispatch);
        assert!(!delivery.is_client_error());
    }
}
