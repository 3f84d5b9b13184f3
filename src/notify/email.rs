//! SMTP email transport (async lettre).

use super::Transport;
use crate::config::SmtpConfig;
use crate::error::NotifyError;
use crate::types::Task;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

/// Sends task notifications over SMTP with STARTTLS.
pub struct EmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailTransport {
    /// Build a transport from SMTP settings. Fails if the relay host or the
    /// `from` address is malformed; no connection is made yet.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(format!("smtp relay {}: {e}", config.host)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Transport(format!("from address {}: {e}", config.from)))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl Transport for EmailTransport {
    async fn send(&self, task: &Task, message: &str) -> Result<(), NotifyError> {
        let to = task
            .email
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Transport(format!("recipient {}: {e}", task.email)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Task Notification")
            .body(format!("{message} - {}", task.title))
            .map_err(|e| NotifyError::Transport(format!("compose: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(format!("smtp send: {e}")))?;

        debug!(task_id = %task.id, to = %task.email, "sent email notification");
        Ok(())
    }
}
