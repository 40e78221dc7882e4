pub mod cli;
pub mod env;
pub mod toml_config;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_secret, validate_non_empty_string, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub use cli::CliArgs;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// 執行模式，決定派送錯誤細節是否回傳給呼叫端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn exposes_error_details(&self) -> bool {
        *self == Environment::Development
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            other => Err(RelayError::InvalidConfigValueError {
                field: "server.environment".to_string(),
                value: other.to_string(),
                reason: "Expected development or production".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// 連上後以 STARTTLS 升級 (587)
    #[default]
    StartTls,
    /// 直接 TLS (465)
    Tls,
    /// 明文，只供本機測試
    None,
}

impl FromStr for SmtpTls {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(SmtpTls::StartTls),
            "tls" => Ok(SmtpTls::Tls),
            "none" => Ok(SmtpTls::None),
            other => Err(RelayError::InvalidConfigValueError {
                field: "mail.smtp_tls".to_string(),
                value: other.to_string(),
                reason: "Expected starttls, tls or none".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// 寄件者兼收件者：營運方自己的信箱
    pub operator_address: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_tls: SmtpTls,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// client secret 與 refresh token 不寫進日誌
impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("refresh_token", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_cache_tokens")]
    pub cache_tokens: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            cache_tokens: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 空陣列或包含 "*" 表示允許任何來源
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// 啟動時建立一次，之後唯讀共享
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl RelayConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.timeout_seconds)
    }

    pub fn environment(&self) -> Environment {
        self.server.environment
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        // 驗證營運信箱
        validate_email("mail.operator_address", &self.mail.operator_address)?;
        validate_non_empty_string("mail.smtp_host", &self.mail.smtp_host)?;
        validate_range("mail.smtp_port", self.mail.smtp_port, 1, u16::MAX)?;

        // 驗證 OAuth 憑證
        validate_non_empty_string("oauth.client_id", &self.oauth.client_id)?;
        validate_non_empty_secret("oauth.client_secret", &self.oauth.client_secret)?;
        validate_non_empty_secret("oauth.refresh_token", &self.oauth.refresh_token)?;
        validate_url("oauth.redirect_uri", &self.oauth.redirect_uri)?;
        validate_url("oauth.token_uri", &self.oauth.token_uri)?;

        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_range("dispatch.timeout_seconds", self.dispatch.timeout_seconds, 1, 300)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_cache_tokens() -> bool {
    true
}

#[cfg(test)]
pub(crate) fn test_config() -> RelayConfig {
    RelayConfig {
        server: ServerConfig::default(),
        mail: MailConfig {
            operator_address: "support@relay.example".to_string(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_tls: SmtpTls::StartTls,
        },
        oauth: OAuthConfig {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "https://developers.google.com/oauthplayground".to_string(),
            refresh_token: "1//refresh".to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        },
        dispatch: DispatchConfig::default(),
        cors: CorsConfig::default(),
    }
}
