use crate::core::{AccessToken, TokenProvider};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// 依到期時間快取 access token；過期、無到期資訊或被 invalidate 時透明地重新換發
pub struct CachedTokenProvider<P: TokenProvider> {
    inner: P,
    cached: RwLock<Option<AccessToken>>,
}

impl<P: TokenProvider> CachedTokenProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cached: RwLock::new(None),
        }
    }

    fn usable(token: &Option<AccessToken>) -> Option<AccessToken> {
        token
            .as_ref()
            .filter(|t| !t.is_expired_at(Utc::now()))
            .cloned()
    }
}

#[async_trait]
impl<P: TokenProvider> TokenProvider for CachedTokenProvider<P> {
    async fn access_token(&self) -> Result<AccessToken> {
        if let Some(token) = Self::usable(&*self.cached.read().await) {
            tracing::debug!("Using cached access token");
            return Ok(token);
        }

        let mut cached = self.cached.write().await;
        // 等鎖期間可能已有其他請求換好了
        if let Some(token) = Self::usable(&cached) {
            return Ok(token);
        }

        let token = self.inner.access_token().await?;
        *cached = token.expires_at.is_some().then(|| token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        self.cached.write().await.take();
        self.inner.invalidate().await;
    }
}
