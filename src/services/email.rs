use super::MailService;
use crate::config::EmailConfig;
use crate::core::error::AssistantError;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub sender: String,
    pub password: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn to_message(&self) -> Result<Message, AssistantError> {
        let from: Mailbox = self.sender.parse()?;
        let to: Mailbox = self.recipient.parse()?;

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .body(self.body.clone())?)
    }
}

/// SMTP over implicit TLS, authenticated with the sender's credentials.
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
        }
    }
}

#[async_trait]
impl MailService for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AssistantError> {
        let message = email.to_message()?;
        let credentials = Credentials::new(email.sender.clone(), email.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(credentials)
            .build();

        mailer.send(message).await?;
        tracing::info!(recipient = %email.recipient, "email sent");
        Ok(())
    }
}
