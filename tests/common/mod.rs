#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use support_relay::core::{
    AccessToken, DeliveryReceipt, MailTransport, OutboundMessage, TokenProvider,
};
use support_relay::{Dispatcher, Environment, RelayError};
use tower::ServiceExt;

pub const OPERATOR: &str = "support@relay.example";

#[derive(Default)]
pub struct StaticTokens {
    pub calls: AtomicUsize,
}

impl StaticTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for StaticTokens {
    async fn access_token(&self) -> support_relay::Result<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::expiring_in("ya29.static", 3600))
    }
}

pub struct FailingTokens;

#[async_trait]
impl TokenProvider for FailingTokens {
    async fn access_token(&self) -> support_relay::Result<AccessToken> {
        Err(RelayError::CredentialError {
            message: "invalid_grant: Token has been expired or revoked.".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(OutboundMessage, String)>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<(OutboundMessage, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(
        &self,
        message: &OutboundMessage,
        credential: &AccessToken,
    ) -> support_relay::Result<DeliveryReceipt> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((message.clone(), credential.token.clone()));
        Ok(DeliveryReceipt {
            message_id: format!("<msg-{}@relay.example>", sent.len()),
        })
    }
}

pub struct FailingTransport;

#[async_trait]
impl MailTransport for FailingTransport {
    async fn send(
        &self,
        _message: &OutboundMessage,
        _credential: &AccessToken,
    ) -> support_relay::Result<DeliveryReceipt> {
        Err(RelayError::DeliveryError {
            message: "454 4.7.0 Too many login attempts, please try again later".to_string(),
        })
    }
}

pub fn router(
    tokens: Arc<dyn TokenProvider>,
    transport: Arc<dyn MailTransport>,
    environment: Environment,
) -> Router {
    let dispatcher = Dispatcher::new(tokens, transport, OPERATOR);
    support_relay::server::router(support_relay::AppState::new(dispatcher, environment))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}
