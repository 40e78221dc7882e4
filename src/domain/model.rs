use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 請求 body 解出的原始表單，欄位可能缺漏、為空或型別不符
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub query: Option<Value>,
}

impl Submission {
    pub fn new(name: &str, email: &str, query: &str) -> Self {
        Self {
            name: Some(Value::String(name.to_string())),
            email: Some(Value::String(email.to_string())),
            query: Some(Value::String(query.to_string())),
        }
    }
}

/// Only constructed by the validator: every field trimmed and non-empty,
/// `email` syntactically well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSubmission {
    name: String,
    email: String,
    query: String,
}

impl NormalizedSubmission {
    pub(crate) fn new_unchecked(name: String, email: String, query: String) -> Self {
        Self { name, email, query }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl From<&NormalizedSubmission> for Submission {
    fn from(normalized: &NormalizedSubmission) -> Self {
        Submission::new(&normalized.name, &normalized.email, &normalized.query)
    }
}

/// 委派的 OAuth2 access token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// 到期前這段時間內視為已過期，避免送信途中失效
    pub const EXPIRY_SKEW_SECONDS: i64 = 60;

    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn expiring_in(token: impl Into<String>, seconds: i64) -> Self {
        Self::new(token, Some(Utc::now() + Duration::seconds(seconds)))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(Self::EXPIRY_SKEW_SECONDS) >= expires_at,
            None => true,
        }
    }
}

// token 不可出現在日誌
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
}
