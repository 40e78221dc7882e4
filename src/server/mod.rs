pub mod handlers;
pub mod response;
pub mod serve;

use crate::adapters::{CachedTokenProvider, RefreshTokenProvider, SmtpMailTransport};
use crate::config::{CorsConfig, Environment, RelayConfig};
use crate::core::dispatcher::Dispatcher;
use crate::core::TokenProvider;
use crate::utils::error::{RelayError, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use serve::{serve, shutdown_signal};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub environment: Environment,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, environment: Environment) -> Self {
        Self {
            dispatcher,
            environment,
        }
    }

    /// 依配置組裝真正的 OAuth 與 SMTP 實作
    pub fn from_config(config: &RelayConfig) -> Self {
        let refresh = RefreshTokenProvider::new(config.oauth.clone());
        let tokens: Arc<dyn TokenProvider> = if config.dispatch.cache_tokens {
            Arc::new(CachedTokenProvider::new(refresh))
        } else {
            Arc::new(refresh)
        };
        let transport = Arc::new(SmtpMailTransport::new(&config.mail, config.stage_timeout()));

        let dispatcher = Dispatcher::new(tokens, transport, config.mail.operator_address.clone())
            .with_stage_timeout(config.stage_timeout());

        Self::new(dispatcher, config.environment())
    }
}

/// 路由本身，不含中介層；未定義路徑與不支援的方法都回 404 與端點清單
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).fallback(handlers::not_found))
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route(
            "/send-email",
            post(handlers::send_email).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}

pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| RelayError::InvalidConfigValueError {
                field: "cors.allowed_origins".to_string(),
                value: origin.clone(),
                reason: "Not a valid origin header value".to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

pub fn app(state: AppState, cors: &CorsConfig) -> Result<Router> {
    Ok(router(state)
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http()))
}

pub fn app_from_config(config: &RelayConfig) -> Result<Router> {
    app(AppState::from_config(config), &config.cors)
}
