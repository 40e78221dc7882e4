use crate::config::{
    CorsConfig, DispatchConfig, Environment, MailConfig, OAuthConfig, RelayConfig, ServerConfig,
    SmtpTls, DEFAULT_PORT, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_TOKEN_URI,
};
use crate::utils::error::{RelayError, Result};
use std::str::FromStr;

impl RelayConfig {
    /// 從環境變數載入配置，存在 `.env` 時先讀入
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| RelayError::ConfigError {
                    message: format!("{} environment variable is required", key),
                })
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            server: ServerConfig {
                port: parse_or("PORT", optional("PORT"), DEFAULT_PORT)?,
                environment: optional("APP_ENV")
                    .map(|v| Environment::from_str(&v))
                    .transpose()?
                    .unwrap_or_default(),
            },
            mail: MailConfig {
                operator_address: required("GMAIL_USER")?,
                smtp_host: optional("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port: parse_or("SMTP_PORT", optional("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                smtp_tls: optional("SMTP_TLS")
                    .map(|v| SmtpTls::from_str(&v))
                    .transpose()?
                    .unwrap_or_default(),
            },
            oauth: OAuthConfig {
                client_id: required("CLIENT_ID")?,
                client_secret: required("CLIENT_SECRET")?,
                redirect_uri: required("REDIRECT_URI")?,
                refresh_token: required("REFRESH_TOKEN")?,
                token_uri: optional("TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            },
            dispatch: DispatchConfig {
                timeout_seconds: parse_or(
                    "DISPATCH_TIMEOUT_SECONDS",
                    optional("DISPATCH_TIMEOUT_SECONDS"),
                    DEFAULT_TIMEOUT_SECONDS,
                )?,
                cache_tokens: parse_bool("TOKEN_CACHE", optional("TOKEN_CACHE"), true)?,
            },
            cors: CorsConfig {
                allowed_origins: optional("CORS_ALLOWED_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(|origin| origin.trim().to_string())
                            .filter(|origin| !origin.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| RelayError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: "Not a valid number".to_string(),
            }),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(RelayError::InvalidConfigValueError {
                field: key.to_string(),
                value: v,
                reason: "Expected true or false".to_string(),
            }),
        },
    }
}
