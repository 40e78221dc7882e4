use crate::core::compose::compose;
use crate::core::{DeliveryReceipt, MailTransport, NormalizedSubmission, TokenProvider};
use crate::utils::error::{DispatchStage, RelayError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// 取得 token、組信、寄送；單次嘗試，不重試
#[derive(Clone)]
pub struct Dispatcher {
    tokens: Arc<dyn TokenProvider>,
    transport: Arc<dyn MailTransport>,
    operator: String,
    stage_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        transport: Arc<dyn MailTransport>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            transport,
            operator: operator.into(),
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    pub fn with_stage_timeout(mut self, stage_timeout: Duration) -> Self {
        self.stage_timeout = stage_timeout;
        self
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub async fn dispatch(&self, submission: &NormalizedSubmission) -> Result<DeliveryReceipt> {
        tracing::debug!("Requesting access token");
        let credential = self
            .bounded(DispatchStage::Credential, self.tokens.access_token())
            .await?;

        let message = compose(submission, &self.operator);
        tracing::debug!(
            "Sending \"{}\" to {} (reply-to {})",
            message.subject,
            message.to,
            message.reply_to
        );

        match self
            .bounded(DispatchStage::Delivery, self.transport.send(&message, &credential))
            .await
        {
            Ok(receipt) => {
                tracing::info!("Mail accepted, message id {}", receipt.message_id);
                Ok(receipt)
            }
            Err(e) => {
                // token 可能已被撤銷，下一個請求要重新換發；輸入錯誤不動快取
                if Self::invalidates_credential(&e) {
                    self.tokens.invalidate().await;
                }
                Err(e)
            }
        }
    }

    fn invalidates_credential(error: &RelayError) -> bool {
        matches!(
            error,
            RelayError::DeliveryError { .. }
                | RelayError::Timeout {
                    stage: DispatchStage::Delivery,
                    ..
                }
        )
    }

    async fn bounded<T>(
        &self,
        stage: DispatchStage,
        future: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.stage_timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{} exceeded {:?}", stage, self.stage_timeout);
                Err(RelayError::Timeout {
                    stage,
                    seconds: self.stage_timeout.as_secs(),
                })
            }
        }
    }
}
