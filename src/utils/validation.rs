use crate::utils::error::{RelayError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s]+$").expect("valid email pattern"))
}

/// 語法檢查：local@domain.tld，不做 RFC 完整驗證
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if !is_valid_email(value) {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a well-formed email address".to_string(),
        });
    }
    Ok(())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 秘密欄位（client secret、refresh token）錯誤訊息中不回顯原值
pub fn validate_non_empty_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.c d"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("oauth.token_uri", "https://oauth2.googleapis.com/token").is_ok());
        assert!(validate_url("oauth.redirect_uri", "http://localhost:3000/callback").is_ok());
        assert!(validate_url("oauth.token_uri", "").is_err());
        assert!(validate_url("oauth.token_uri", "invalid-url").is_err());
        assert!(validate_url("oauth.token_uri", "ftp://example.com").is_err());
    }

    #[test]
    fn test_secret_value_not_echoed() {
        let err = validate_non_empty_secret("oauth.client_secret", "   ").unwrap_err();
        match err {
            RelayError::InvalidConfigValueError { value, .. } => assert!(value.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("dispatch.timeout_seconds", 10u64, 1, 300).is_ok());
        assert!(validate_range("dispatch.timeout_seconds", 0u64, 1, 300).is_err());
        assert!(validate_range("dispatch.timeout_seconds", 301u64, 1, 300).is_err());
    }
}
