use crate::config::OAuthConfig;
use crate::core::{AccessToken, TokenProvider};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// OAuth2 refresh-token grant 用戶端
pub struct RefreshTokenProvider {
    config: OAuthConfig,
    client: Client,
}

impl RefreshTokenProvider {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<TokenErrorResponse>(body) {
            Ok(TokenErrorResponse {
                error,
                error_description: Some(description),
            }) => format!("{}: {}", error, description),
            Ok(TokenErrorResponse { error, .. }) => error,
            Err(_) => format!("Token endpoint returned {}", status),
        }
    }
}

#[async_trait]
impl TokenProvider for RefreshTokenProvider {
    async fn access_token(&self) -> Result<AccessToken> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "refresh_token"),
        ];

        tracing::debug!("Refreshing access token via {}", self.config.token_uri);
        let response = self
            .client
            .post(&self.config.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| RelayError::CredentialError {
                message: format!("Token endpoint request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::describe_failure(status, &body);
            tracing::warn!("Access token refresh rejected ({}): {}", status, message);
            return Err(RelayError::CredentialError { message });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| RelayError::CredentialError {
                    message: format!("Malformed token response: {}", e),
                })?;

        if token.access_token.is_empty() {
            return Err(RelayError::CredentialError {
                message: "Token endpoint returned an empty access token".to_string(),
            });
        }

        let expires_at = token
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));
        tracing::debug!("Access token refreshed, expires at {:?}", expires_at);

        Ok(AccessToken::new(token.access_token, expires_at))
    }
}
