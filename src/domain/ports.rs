use crate::domain::model::{AccessToken, DeliveryReceipt, OutboundMessage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// OAuth2 token 來源：以長期的 refresh token 換取短期 access token
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken>;

    /// 丟棄任何快取的 token，下一次呼叫必須重新取得
    async fn invalidate(&self) {}
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn access_token(&self) -> Result<AccessToken> {
        (**self).access_token().await
    }

    async fn invalidate(&self) {
        (**self).invalidate().await
    }
}

/// 實際寄送郵件的外部傳輸層
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        message: &OutboundMessage,
        credential: &AccessToken,
    ) -> Result<DeliveryReceipt>;
}
