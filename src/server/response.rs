use crate::core::DeliveryReceipt;
use crate::utils::error::RelayError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// (method, path, description)
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/", "Server information"),
    ("GET", "/health", "Health check"),
    ("POST", "/send-email", "Relay a support query to the operator mailbox"),
];

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSuccess {
    pub success: bool,
    pub message: &'static str,
    pub message_id: String,
    pub timestamp: String,
}

impl From<DeliveryReceipt> for SendSuccess {
    fn from(receipt: DeliveryReceipt) -> Self {
        Self {
            success: true,
            message: "Email sent successfully",
            message_id: receipt.message_id,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub success: bool,
    pub message: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

impl ServerInfo {
    pub fn new(environment: &'static str) -> Self {
        Self {
            success: true,
            message: "Support query relay is running",
            version: env!("CARGO_PKG_VERSION"),
            environment,
            endpoints: ENDPOINTS
                .iter()
                .map(|&(method, path, description)| EndpointInfo {
                    method,
                    path,
                    description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "OK",
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFound {
    pub success: bool,
    pub message: &'static str,
    pub available_endpoints: Vec<String>,
}

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, Json(self)).into_response()
    }
}

impl Default for NotFound {
    fn default() -> Self {
        Self {
            success: false,
            message: "Endpoint not found",
            available_endpoints: ENDPOINTS
                .iter()
                .map(|(method, path, _)| format!("{} {}", method, path))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 將 RelayError 對應成 HTTP 狀態與 JSON；派送錯誤細節只在開發模式回傳
#[derive(Debug)]
pub struct ApiError {
    pub error: RelayError,
    pub expose_details: bool,
}

impl ApiError {
    pub fn new(error: RelayError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let detail = self.expose_details.then(|| self.error.to_string());

        match &self.error {
            RelayError::MissingField { fields } => ErrorBody {
                success: false,
                message: "Name, email, and query are required",
                missing_fields: Some(fields.clone()),
                error: None,
            },
            RelayError::InvalidEmailFormat { .. } => ErrorBody {
                success: false,
                message: "Invalid email format",
                missing_fields: None,
                error: None,
            },
            RelayError::InvalidPayload { .. } => ErrorBody {
                success: false,
                message: "Invalid JSON body",
                missing_fields: None,
                error: detail,
            },
            _ => ErrorBody {
                success: false,
                message: "Failed to send email",
                missing_fields: None,
                error: detail,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.error.is_client_error() {
            tracing::warn!("Rejected submission: {}", self.error);
        } else {
            tracing::error!(
                "Failed to send email: {} (category: {:?})",
                self.error,
                self.error.category()
            );
        }

        (status, Json(self.body())).into_response()
    }
}
