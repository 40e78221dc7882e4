mod common;

use axum::http::StatusCode;
use common::*;
use httpmock::prelude::*;
use std::sync::Arc;
use support_relay::adapters::{CachedTokenProvider, RefreshTokenProvider};
use support_relay::config::OAuthConfig;
use support_relay::core::validator::validate;
use support_relay::core::{Submission, TokenProvider};
use support_relay::{Dispatcher, Environment};

const SUBMISSION: &str = r#"{"name": "Ana", "email": "ana@example.com", "query": "Help\nplease"}"#;

fn oauth_config(server: &MockServer) -> OAuthConfig {
    OAuthConfig {
        client_id: "client-123.apps.googleusercontent.com".to_string(),
        client_secret: "shh".to_string(),
        redirect_uri: "https://developers.google.com/oauthplayground".to_string(),
        refresh_token: "1//refresh".to_string(),
        token_uri: server.url("/token"),
    }
}

async fn token_endpoint(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .body_contains("grant_type=refresh_token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "access_token": "ya29.from-mock",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }));
        })
        .await
}

/// 完整流程：refresh token 換 access token，再交給傳輸層
#[tokio::test]
async fn test_refreshed_token_reaches_transport() {
    let server = MockServer::start_async().await;
    let token_mock = token_endpoint(&server).await;

    let transport = Arc::new(RecordingTransport::default());
    let tokens = Arc::new(RefreshTokenProvider::new(oauth_config(&server)));
    let app = router(tokens, transport.clone(), Environment::Production);

    let (status, body) = call(app, post_json("/send-email", SUBMISSION)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messageId"], "<msg-1@relay.example>");
    token_mock.assert_async().await;

    let sent = transport.sent();
    assert_eq!(sent[0].1, "ya29.from-mock");
    assert_eq!(sent[0].0.reply_to, "ana@example.com");
    assert!(sent[0].0.html_body.contains("Help<br>please"));
}

#[tokio::test]
async fn test_uncached_provider_refreshes_every_request() {
    let server = MockServer::start_async().await;
    let token_mock = token_endpoint(&server).await;

    let tokens = Arc::new(RefreshTokenProvider::new(oauth_config(&server)));
    let app = router(
        tokens,
        Arc::new(RecordingTransport::default()),
        Environment::Production,
    );

    for _ in 0..2 {
        let (status, _) = call(app.clone(), post_json("/send-email", SUBMISSION)).await;
        assert_eq!(status, StatusCode::OK);
    }

    token_mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_cached_provider_is_equivalent_with_fewer_refreshes() {
    let server = MockServer::start_async().await;
    let token_mock = token_endpoint(&server).await;

    let submission = validate(&serde_json::from_str::<Submission>(SUBMISSION).unwrap()).unwrap();

    let uncached_transport = Arc::new(RecordingTransport::default());
    let uncached = Dispatcher::new(
        Arc::new(RefreshTokenProvider::new(oauth_config(&server))),
        uncached_transport.clone(),
        OPERATOR,
    );

    let cached_transport = Arc::new(RecordingTransport::default());
    let cached = Dispatcher::new(
        Arc::new(CachedTokenProvider::new(RefreshTokenProvider::new(
            oauth_config(&server),
        ))),
        cached_transport.clone(),
        OPERATOR,
    );

    for _ in 0..3 {
        let a = uncached.dispatch(&submission).await.unwrap();
        let b = cached.dispatch(&submission).await.unwrap();
        assert_eq!(a, b);
    }

    assert_eq!(uncached_transport.sent(), cached_transport.sent());
    // 3 次未快取 + 1 次快取
    token_mock.assert_hits_async(4).await;
}

#[tokio::test]
async fn test_delivery_failure_invalidates_cached_token() {
    let server = MockServer::start_async().await;
    let token_mock = token_endpoint(&server).await;

    let tokens = Arc::new(CachedTokenProvider::new(RefreshTokenProvider::new(
        oauth_config(&server),
    )));
    let submission = validate(&serde_json::from_str::<Submission>(SUBMISSION).unwrap()).unwrap();

    let failing = Dispatcher::new(tokens.clone(), Arc::new(FailingTransport), OPERATOR);
    assert!(failing.dispatch(&submission).await.is_err());

    // 失敗後快取已清空，下一次必須重新換發
    tokens.access_token().await.unwrap();
    token_mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_unparseable_reply_to_never_touches_token_endpoint() {
    let server = MockServer::start_async().await;
    let token_mock = token_endpoint(&server).await;

    let transport = Arc::new(RecordingTransport::default());
    let app = router(
        Arc::new(CachedTokenProvider::new(RefreshTokenProvider::new(
            oauth_config(&server),
        ))),
        transport.clone(),
        Environment::Production,
    );

    for _ in 0..3 {
        let (status, body) = call(
            app.clone(),
            post_json(
                "/send-email",
                r#"{"name": "Bo", "email": "a@b.c@d", "query": "x"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid email format");
    }

    token_mock.assert_hits_async(0).await;
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_revoked_refresh_token_hidden_in_production() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "error": "invalid_grant",
                    "error_description": "Token has been expired or revoked."
                }));
        })
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let production = router(
        Arc::new(RefreshTokenProvider::new(oauth_config(&server))),
        transport.clone(),
        Environment::Production,
    );
    let (status, body) = call(production, post_json("/send-email", SUBMISSION)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body.get("error").is_none());
    assert!(transport.sent().is_empty());

    let development = router(
        Arc::new(RefreshTokenProvider::new(oauth_config(&server))),
        transport.clone(),
        Environment::Development,
    );
    let (status, body) = call(development, post_json("/send-email", SUBMISSION)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to obtain access token: invalid_grant: Token has been expired or revoked."
    );
}
