use crate::config::{MailConfig, SmtpTls};
use crate::core::{AccessToken, DeliveryReceipt, MailTransport, OutboundMessage};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use uuid::Uuid;

/// 以 XOAUTH2 驗證的 SMTP 傳輸；token 每次寄送都可能不同，因此每次建立連線
pub struct SmtpMailTransport {
    host: String,
    port: u16,
    tls: SmtpTls,
    user: String,
    timeout: Duration,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig, timeout: Duration) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            tls: config.smtp_tls,
            user: config.operator_address.clone(),
            timeout,
        }
    }

    fn mailbox(field: &str, address: &str) -> Result<Mailbox> {
        address.parse().map_err(|e| RelayError::DeliveryError {
            message: format!("Invalid {} address {}: {}", field, address, e),
        })
    }

    /// 回傳 lettre 訊息以及寫入 header 的 Message-ID
    pub fn build_message(&self, message: &OutboundMessage) -> Result<(Message, String)> {
        let reply_to: Mailbox =
            message
                .reply_to
                .parse()
                .map_err(|_| RelayError::InvalidEmailFormat {
                    value: message.reply_to.clone(),
                })?;

        let domain = message
            .from
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("localhost");
        let message_id = format!("<{}@{}>", Uuid::new_v4(), domain);

        let email = Message::builder()
            .from(Self::mailbox("from", &message.from)?)
            .to(Self::mailbox("to", &message.to)?)
            .reply_to(reply_to)
            .subject(&message.subject)
            .message_id(Some(message_id.clone()))
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| RelayError::DeliveryError {
                message: format!("Failed to build message: {}", e),
            })?;

        Ok((email, message_id))
    }

    fn transport(&self, credential: &AccessToken) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let relay_error = |e: lettre::transport::smtp::Error| RelayError::DeliveryError {
            message: e.to_string(),
        };

        let builder = match self.tls {
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            SmtpTls::Tls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host).map_err(relay_error)?
            }
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(relay_error)?,
        };

        Ok(builder
            .port(self.port)
            .credentials(Credentials::new(
                self.user.clone(),
                credential.token.clone(),
            ))
            .authentication(vec![Mechanism::Xoauth2])
            .timeout(Some(self.timeout))
            .build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(
        &self,
        message: &OutboundMessage,
        credential: &AccessToken,
    ) -> Result<DeliveryReceipt> {
        let (email, message_id) = self.build_message(message)?;
        let transport = self.transport(credential)?;

        let response = transport
            .send(email)
            .await
            .map_err(|e| RelayError::DeliveryError {
                message: e.to_string(),
            })?;

        tracing::debug!(
            "SMTP server {}:{} replied {}",
            self.host,
            self.port,
            response.code()
        );

        Ok(DeliveryReceipt { message_id })
    }
}
